//! az-greeter: reports the availability zone of the host over HTTP.
//!
//! `/hello` looks the zone up in the instance metadata service on every
//! request; `/ping` is a static liveness check.

pub mod config;
pub mod error;
pub mod http;
pub mod metadata;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
