//! Shared application state for request handlers.

use crate::config::AppConfig;
use crate::metadata::{MetadataClient, MetadataError};

/// Shared application state, cloneable across handlers.
///
/// Holds the metadata client used by `/hello`. Nothing in here is mutated
/// after startup, so requests never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub metadata: MetadataClient,
}

impl AppState {
    /// Creates the application state, building the metadata client from `config`.
    pub fn new(config: &AppConfig) -> Result<Self, MetadataError> {
        Ok(Self {
            metadata: MetadataClient::new(&config.metadata)?,
        })
    }
}
