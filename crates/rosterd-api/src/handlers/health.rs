//! Health check handlers for service monitoring.
//!
//! Provides liveness, readiness, and health endpoints with database
//! connectivity checks for orchestration systems like Kubernetes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rosterd_core::{storage::Storage, Clock};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::server::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks
    pub checks: HealthChecks,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Database connectivity and basic query test
    pub database: ComponentHealth,
}

/// Health status for an individual component.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: ComponentStatus,
    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy
    Up,
    /// Component is experiencing issues
    Down,
}

/// Health service that encapsulates the clock dependency for testable
/// health checks.
pub struct HealthService {
    clock: Arc<dyn Clock>,
}

impl HealthService {
    /// Creates a new health service with the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Performs service health checks against all components.
    pub async fn health_check(&self, storage: &Storage) -> HealthResponse {
        debug!("Performing health check");

        let timestamp = self.clock.now();
        let database = self.check_database(storage).await;

        let overall_status = match database.status {
            ComponentStatus::Up => HealthStatus::Healthy,
            ComponentStatus::Down => HealthStatus::Unhealthy,
        };

        HealthResponse {
            status: overall_status,
            timestamp,
            checks: HealthChecks { database },
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Checks database connectivity with a lightweight query.
    async fn check_database(&self, storage: &Storage) -> ComponentHealth {
        let started = self.clock.now();
        let result = storage.health_check().await;
        let elapsed = self.clock.now() - started;
        let response_time_ms = u64::try_from(elapsed.num_milliseconds()).unwrap_or(0);

        match result {
            Ok(()) => {
                debug!("Database health check passed");
                ComponentHealth { status: ComponentStatus::Up, message: None, response_time_ms }
            },
            Err(e) => {
                error!(error = %e, "Database health check failed");
                ComponentHealth {
                    status: ComponentStatus::Down,
                    message: Some(format!("Database connection failed: {e}")),
                    response_time_ms,
                }
            },
        }
    }
}

/// Health check endpoint handler.
///
/// This endpoint is designed to be called frequently by orchestration
/// systems and load balancers, so it avoids expensive operations.
#[instrument(name = "health_check", skip(app_state))]
pub async fn health_check(State(app_state): State<AppState>) -> Response {
    let health_service = HealthService::new(app_state.clock.clone());
    let response = health_service.health_check(&app_state.storage).await;

    let status_code = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    debug!(
        status = ?response.status,
        db_status = ?response.checks.database.status,
        "Health check completed"
    );

    (status_code, Json(response)).into_response()
}

/// Readiness check endpoint for Kubernetes probes.
///
/// The service is ready exactly when its dependencies are reachable, so
/// this delegates to the health check.
#[instrument(name = "readiness_check", skip(app_state))]
pub async fn readiness_check(State(app_state): State<AppState>) -> Response {
    health_check(State(app_state)).await
}

/// Liveness check endpoint for Kubernetes probes.
///
/// Returns a simple response indicating the service process is alive.
/// Does not touch external dependencies, so it stays green during a
/// database outage.
#[instrument(name = "liveness_check", skip(app_state))]
pub async fn liveness_check(State(app_state): State<AppState>) -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": app_state.clock.now(),
        "service": "rosterd-api"
    });

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use rosterd_core::TestClock;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(serde_json::to_value(HealthStatus::Healthy).unwrap(), "healthy");
        assert_eq!(serde_json::to_value(HealthStatus::Unhealthy).unwrap(), "unhealthy");
        assert_eq!(serde_json::to_value(ComponentStatus::Up).unwrap(), "up");
        assert_eq!(serde_json::to_value(ComponentStatus::Down).unwrap(), "down");
    }

    #[test]
    fn absent_message_is_omitted_from_json() {
        let health =
            ComponentHealth { status: ComponentStatus::Up, message: None, response_time_ms: 3 };
        let json = serde_json::to_value(&health).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["status"], "up");
    }

    #[tokio::test]
    async fn liveness_reports_pinned_timestamp() {
        let clock = TestClock::new();
        let expected = clock.now();

        // Lazy pool: liveness must not touch the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/unused")
            .expect("lazy pool");
        let state = AppState { storage: Storage::new(pool), clock: Arc::new(clock) };

        let response = liveness_check(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "alive");
        assert_eq!(json["service"], "rosterd-api");
        assert_eq!(json["timestamp"], serde_json::to_value(expected).unwrap());
    }
}
