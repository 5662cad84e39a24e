use clap::{Parser, Subcommand};
use omrs_core::config::{
    credentials_from_env_values, rest_base_from_env_value, timeout_from_env_value,
};
use omrs_core::{
    AppointmentsConfig, ChannelNotifier, ClientConfig, IdentifierValue, PatientCoordinator,
    ResourceUuid, RestClient, SubLocationLookup,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "omrs")]
#[command(about = "OpenMRS patient and sub-location client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a patient with its encounters and print the merged record
    Load {
        /// Patient UUID
        patient: ResourceUuid,
        /// Fetch the patient a second time after the first load
        #[arg(long)]
        reload: bool,
    },
    /// Find a sub-location by its exact name
    FindLocation {
        /// Sub-location name
        name: String,
    },
    /// Search sub-locations by name (case-insensitive)
    SearchLocations {
        /// Text to search for
        text: String,
    },
    /// Add an identifier to a patient
    AddIdentifier {
        /// Patient UUID
        patient: ResourceUuid,
        /// Identifier value
        identifier: IdentifierValue,
        /// Identifier type UUID
        identifier_type: ResourceUuid,
        /// Location UUID
        location: ResourceUuid,
        /// Existing identifier UUID (optional)
        #[arg(long)]
        identifier_uuid: Option<ResourceUuid>,
    },
    /// Change the value of an existing patient identifier
    UpdateIdentifier {
        /// Patient UUID
        patient: ResourceUuid,
        /// Identifier UUID
        identifier_uuid: ResourceUuid,
        /// New identifier value
        identifier: IdentifierValue,
    },
    /// Print the resolved appointments configuration
    Config,
}

/// Entry point for the omrs CLI.
///
/// # Environment Variables
/// - `OMRS_REST_BASE`: REST base URL (default: "http://localhost:8080/openmrs/ws/rest/v1/")
/// - `OMRS_USERNAME` / `OMRS_PASSWORD`: basic auth credentials (optional, set both or neither)
/// - `OMRS_TIMEOUT_SECS`: request timeout in seconds (default: 30)
/// - `OMRS_APPOINTMENTS_CONFIG`: path to the appointments YAML/JSON configuration (optional)
/// - `OMRS_SHOW_CREATE_APPOINTMENT_BUTTONS`: overrides `showCreateAppointmentButtons`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("omrs=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'omrs --help' for commands");
        return Ok(());
    };

    let appointments_path = std::env::var("OMRS_APPOINTMENTS_CONFIG")
        .ok()
        .map(PathBuf::from);
    let appointments = AppointmentsConfig::load(appointments_path.as_deref())?
        .with_env_override(std::env::var("OMRS_SHOW_CREATE_APPOINTMENT_BUTTONS").ok())?;

    let cfg = ClientConfig::new(
        &rest_base_from_env_value(std::env::var("OMRS_REST_BASE").ok()),
        credentials_from_env_values(
            std::env::var("OMRS_USERNAME").ok(),
            std::env::var("OMRS_PASSWORD").ok(),
        )?,
        timeout_from_env_value(std::env::var("OMRS_TIMEOUT_SECS").ok())?,
        appointments,
    )?;
    tracing::debug!(rest_base = cfg.rest_base(), "resolved configuration");

    let client = RestClient::new(&cfg)?;
    let (notifier, mut notifications) = ChannelNotifier::new();
    let coordinator = PatientCoordinator::from_rest(client.clone(), Arc::new(notifier));

    match command {
        Commands::Load { patient, reload } => {
            let mut state = coordinator.load_patient(patient).await;
            if reload {
                if let Some(reloaded) = coordinator.reload().await {
                    state = reloaded;
                }
            }
            match state.patient() {
                Some(loaded) => {
                    println!("{}", serde_json::to_string_pretty(&loaded.merged_record())?)
                }
                None => anyhow::bail!("failed to load patient {}", patient),
            }
        }
        Commands::FindLocation { name } => {
            let lookup = SubLocationLookup::new(Arc::new(client));
            match lookup.find_by_name(&name).await? {
                Some(location) => println!("{}", serde_json::to_string_pretty(&location)?),
                None => println!("No sub-location named '{}'.", name),
            }
        }
        Commands::SearchLocations { text } => {
            let lookup = SubLocationLookup::new(Arc::new(client));
            let locations = lookup.search(&text).await?;
            if locations.is_empty() {
                println!("No sub-locations match '{}'.", text);
            } else {
                for location in locations {
                    println!(
                        "{}\t{}",
                        location.name,
                        location.uuid.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Commands::AddIdentifier {
            patient,
            identifier,
            identifier_type,
            location,
            identifier_uuid,
        } => {
            coordinator
                .create_identifier(patient, location, identifier, identifier_uuid, identifier_type)
                .await?;
        }
        Commands::UpdateIdentifier {
            patient,
            identifier_uuid,
            identifier,
        } => {
            coordinator
                .update_identifier(patient, identifier, identifier_uuid)
                .await?;
        }
        Commands::Config => {
            println!(
                "showCreateAppointmentButtons: {}",
                cfg.appointments().show_create_appointment_buttons
            );
        }
    }

    // Writes notify only on success; failures have already been logged.
    drop(coordinator);
    while let Some(notification) = notifications.recv().await {
        println!("{}: {}", notification.title, notification.description);
    }

    Ok(())
}
