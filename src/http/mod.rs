//! HTTP server module.
//!
//! Serves plain HTTP (TLS is terminated in front of the service) with
//! graceful shutdown on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
