//! Health check endpoint for load balancers.
//!
//! Liveness only: it never touches the metadata service, so `/ping` stays
//! healthy while `/hello` is failing.

use crate::config::HEALTH_RESPONSE;

/// Health check handler, bound for every method.
pub async fn ping() -> &'static str {
    HEALTH_RESPONSE
}
