//! Registration intake handler with validation and persistence.
//!
//! Accepts sign-up form submissions, validates field presence, and persists
//! one row per submission. Every outcome carries a fixed message body;
//! internal failure detail stays in the logs.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rosterd_core::{CoreError, NewUser, RegistrationForm};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::server::AppState;

const MSG_SAVED: &str = "Data saved successfully";
const MSG_MISSING_FIELDS: &str = "Name and email are required";
const MSG_DATABASE_ERROR: &str = "Database error";

/// Response body returned by every `/save` outcome.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome description
    pub message: String,
}

/// Persists one registration submission.
///
/// Validates that all five form fields are present and non-empty, then
/// inserts a new row. Submissions are never deduplicated; posting the same
/// data twice stores two rows.
///
/// # Errors
///
/// Returns fixed-body JSON responses:
/// - 400: one or more required fields missing or empty
/// - 500: the insert failed, regardless of cause
#[instrument(name = "save_registration", skip(state, form))]
pub async fn save_registration(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> Response {
    info!("Processing registration submission");

    let user = match NewUser::from_form(form) {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Registration rejected during validation");
            return error_response(&e);
        },
    };

    match state.storage.users.create(&user).await {
        Ok(id) => {
            info!(user_id = %id, "Registration stored");
            message_response(StatusCode::OK, MSG_SAVED)
        },
        Err(e) => {
            error!(error = %e, "Failed to store registration");
            error_response(&e)
        },
    }
}

/// Maps a core error onto its fixed-message response.
///
/// Validation errors become the 400 with the fixed validation message;
/// every storage error class collapses to the same 500.
fn error_response(error: &CoreError) -> Response {
    if error.is_validation() {
        message_response(StatusCode::BAD_REQUEST, MSG_MISSING_FIELDS)
    } else {
        message_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_DATABASE_ERROR)
    }
}

/// Creates a fixed-message JSON response.
fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(MessageResponse { message: message.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_response_carries_status() {
        let response = message_response(StatusCode::BAD_REQUEST, MSG_MISSING_FIELDS);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = message_response(StatusCode::OK, MSG_SAVED);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn error_response_classifies_by_error_kind() {
        let response = error_response(&CoreError::MissingFields);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(&CoreError::Database("pool closed".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = error_response(&CoreError::ConstraintViolation("duplicate".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn message_body_serializes_to_expected_shape() {
        let body = MessageResponse { message: MSG_SAVED.to_string() };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Data saved successfully"}"#);
    }

    #[test]
    fn fixed_messages_are_stable() {
        assert_eq!(MSG_MISSING_FIELDS, "Name and email are required");
        assert_eq!(MSG_DATABASE_ERROR, "Database error");
    }
}
