//! Sub-location lookup over the address hierarchy.
//!
//! A pure read/filter pipeline: every query fetches fresh entries from the
//! [`SubLocationSource`], nothing is cached and no state is shared between calls.

use crate::resources::SubLocationSource;
use crate::ClientResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One address-hierarchy entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubLocation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_generated_id: Option<String>,
}

#[derive(Clone)]
pub struct SubLocationLookup {
    source: Arc<dyn SubLocationSource>,
}

impl SubLocationLookup {
    pub fn new(source: Arc<dyn SubLocationSource>) -> Self {
        Self { source }
    }

    /// Finds the entry called `name`.
    ///
    /// Tries the direct lookup first. If that fails for any reason, fetches the full list and
    /// returns the first entry whose name equals `name` exactly.
    ///
    /// # Errors
    ///
    /// Only a failure of the fallback list fetch is returned; a failed direct lookup is logged.
    pub async fn find_by_name(&self, name: &str) -> ClientResult<Option<SubLocation>> {
        match self.source.lookup(name).await {
            Ok(location) => Ok(Some(location)),
            Err(err) => {
                tracing::warn!(
                    name,
                    error = %err,
                    "direct sub-location lookup failed, scanning full list"
                );
                let locations = self.source.list().await?;
                Ok(find_exact(locations, name))
            }
        }
    }

    /// Entries whose name contains `text`, ignoring case. Empty `text` matches everything.
    pub async fn search(&self, text: &str) -> ClientResult<Vec<SubLocation>> {
        let locations = self.source.list().await?;
        Ok(filter_by_text(locations, text))
    }
}

fn find_exact(locations: Vec<SubLocation>, name: &str) -> Option<SubLocation> {
    locations.into_iter().find(|location| location.name == name)
}

fn filter_by_text(mut locations: Vec<SubLocation>, text: &str) -> Vec<SubLocation> {
    let needle = text.to_lowercase();
    locations.retain(|location| location.name.to_lowercase().contains(&needle));
    locations
}
