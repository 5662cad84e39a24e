//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the REST client and
//! the coordinator. Environment variables are read by the binary only; the parsing helpers here
//! take `Option<String>` values so tests never depend on process-wide state.

use crate::constants::{DEFAULT_REST_BASE, DEFAULT_TIMEOUT_SECS};
use crate::{ClientError, ClientResult};
use omrs_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Basic-auth credentials for the REST backend.
#[derive(Clone)]
pub struct Credentials {
    username: NonEmptyText,
    password: String,
}

impl Credentials {
    pub fn new(username: NonEmptyText, password: String) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Appointments front-end configuration.
///
/// Consumed read-only. Unknown keys are ignored because the same file usually carries the
/// configuration of other front-end modules too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentsConfig {
    /// Whether to show the create appointment buttons.
    pub show_create_appointment_buttons: bool,
}

impl AppointmentsConfig {
    /// Parses the configuration from YAML text. JSON is valid YAML, so both formats work.
    ///
    /// Empty input yields the defaults.
    pub fn from_yaml_str(text: &str) -> ClientResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(ClientError::ConfigParse)
    }

    /// Loads the configuration from `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(ClientError::ConfigRead)?;
                Self::from_yaml_str(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Applies an optional environment override of `showCreateAppointmentButtons`.
    pub fn with_env_override(mut self, value: Option<String>) -> ClientResult<Self> {
        if let Some(flag) = flag_from_env_value(value)? {
            self.show_create_appointment_buttons = flag;
        }
        Ok(self)
    }
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    rest_base: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    appointments: AppointmentsConfig,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `rest_base` must be an absolute `http(s)` URL; a trailing `/` is added when missing so
    /// resource paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for a non-http base or a zero timeout.
    pub fn new(
        rest_base: &str,
        credentials: Option<Credentials>,
        timeout: Duration,
        appointments: AppointmentsConfig,
    ) -> ClientResult<Self> {
        let rest_base = rest_base.trim();
        if !(rest_base.starts_with("http://") || rest_base.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "REST base must start with http:// or https://, got: '{}'",
                rest_base
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::Config("timeout must be greater than zero".into()));
        }

        let rest_base = if rest_base.ends_with('/') {
            rest_base.to_string()
        } else {
            format!("{}/", rest_base)
        };

        Ok(Self {
            rest_base,
            credentials,
            timeout,
            appointments,
        })
    }

    pub fn rest_base(&self) -> &str {
        &self.rest_base
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn appointments(&self) -> AppointmentsConfig {
        self.appointments
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the REST base from an optional value, falling back to [`DEFAULT_REST_BASE`].
pub fn rest_base_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_REST_BASE.to_string())
}

/// Parse the request timeout (whole seconds) from an optional value.
pub fn timeout_from_env_value(value: Option<String>) -> ClientResult<Duration> {
    match non_blank(value) {
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                ClientError::Config(format!("timeout must be whole seconds, got: '{}'", v))
            }),
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    }
}

/// Build credentials from optional username/password values.
///
/// Both absent means anonymous access. A username without a password (or the reverse) is a
/// configuration mistake and is rejected rather than silently ignored.
pub fn credentials_from_env_values(
    username: Option<String>,
    password: Option<String>,
) -> ClientResult<Option<Credentials>> {
    match (non_blank(username), password.filter(|p| !p.is_empty())) {
        (Some(username), Some(password)) => Ok(Some(Credentials::new(
            NonEmptyText::new(username)?,
            password,
        ))),
        (None, None) => Ok(None),
        _ => Err(ClientError::Config(
            "username and password must be set together".into(),
        )),
    }
}

/// Parse an optional boolean flag. Accepts `true/false`, `1/0` and `yes/no` in any case.
pub fn flag_from_env_value(value: Option<String>) -> ClientResult<Option<bool>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => Err(ClientError::Config(format!(
            "expected a boolean flag, got: '{}'",
            value
        ))),
    }
}
