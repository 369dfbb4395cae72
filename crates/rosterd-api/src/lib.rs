//! rosterd HTTP API.
//!
//! Exposes the registration intake endpoint (`POST /save`) and the health
//! probes, plus the configuration loader and server lifecycle used by the
//! service binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server, AppState};
