//! HTTP request handlers for the rosterd API.
//!
//! Handlers follow a consistent pattern:
//! - Input validation before any database work
//! - Tracing spans for observability
//! - Fixed-body JSON responses; failure detail goes to the logs
//!
//! # Handler Organization
//!
//! - `save` - Registration intake endpoint
//! - `health` - Health check and readiness probes

pub mod health;
pub mod save;

// Re-export handlers for convenient access
pub use health::{health_check, liveness_check, readiness_check};
pub use save::save_registration;
