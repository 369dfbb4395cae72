//! End-to-end tests for the registration intake flow.
//!
//! Exercises the full system from HTTP submission through database
//! persistence, covering acceptance, rejection, and duplicate handling.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rosterd_api::create_router;
use rosterd_testing::{FormBuilder, TestEnv};
use tower::ServiceExt;

fn submit(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/save")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

/// The golden path: a browser form submission lands in the users table.
///
/// Verifies acceptance, exact storage of submitted values, and that a
/// client retry stores a second row.
#[tokio::test]
async fn complete_submission_flow() -> Result<()> {
    let env = TestEnv::new().await?;
    let app = create_router(env.pool().clone());

    // Submit a complete registration
    let body = FormBuilder::with_defaults()
        .name("Grace Hopper")
        .age("37")
        .gender("female")
        .course("Compiler Construction")
        .email("grace@example.com")
        .build();

    let response = app.clone().oneshot(submit(&body)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // The row is stored exactly as submitted
    let row: (String, String, String) =
        sqlx::query_as("SELECT inputname, inputage, inputemail FROM users")
            .fetch_one(env.pool())
            .await?;
    assert_eq!(row.0, "Grace Hopper");
    assert_eq!(row.1, "37");
    assert_eq!(row.2, "grace@example.com");

    // A retry of the same submission stores a second row
    let response = app.oneshot(submit(&body)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(env.row_count().await?, 2);

    Ok(())
}

/// A rejected submission reports the fixed message and writes nothing.
#[tokio::test]
async fn rejected_submission_leaves_store_untouched() -> Result<()> {
    let env = TestEnv::new().await?;
    let app = create_router(env.pool().clone());

    let body = FormBuilder::with_defaults().omit_course().build();

    let response = app.oneshot(submit(&body)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["message"], "Name and email are required");

    assert_eq!(env.row_count().await?, 0);
    Ok(())
}

/// Mixed traffic: only accepted submissions reach the store.
#[tokio::test]
async fn interleaved_submissions_store_only_accepted() -> Result<()> {
    let env = TestEnv::new().await?;
    let app = create_router(env.pool().clone());

    let accepted = [
        FormBuilder::with_defaults().name("First Student").email("first@example.com").build(),
        FormBuilder::with_defaults().name("Second Student").email("second@example.com").build(),
    ];
    let rejected = [
        FormBuilder::with_defaults().omit_email().build(),
        FormBuilder::with_defaults().age("").build(),
    ];

    for body in &accepted {
        let response = app.clone().oneshot(submit(body)).await?;
        assert_eq!(response.status(), StatusCode::OK);
    }
    for body in &rejected {
        let response = app.clone().oneshot(submit(body)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(env.row_count().await?, 2);

    let names: Vec<(String,)> = sqlx::query_as("SELECT inputname FROM users ORDER BY id")
        .fetch_all(env.pool())
        .await?;
    assert_eq!(names[0].0, "First Student");
    assert_eq!(names[1].0, "Second Student");

    Ok(())
}
