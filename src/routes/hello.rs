//! Availability-zone greeting.

use axum::extract::State;

use crate::error::AppError;
use crate::metadata::greeting;
use crate::state::AppState;

/// Fetch the availability zone and greet with it.
///
/// The request itself is ignored. Every call goes to the metadata service.
pub async fn hello(State(state): State<AppState>) -> Result<String, AppError> {
    let zone = state.metadata.fetch_availability_zone().await?;
    tracing::info!(zone = %zone, "Fetched availability zone");
    Ok(greeting(&zone))
}
