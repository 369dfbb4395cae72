//! Integration tests for storage repositories.
//!
//! Exercises the users repository against a real database to verify SQL
//! correctness and data integrity.

use rosterd_core::models::{NewUser, UserId};
use rosterd_testing::TestEnv;

fn sample_user() -> NewUser {
    NewUser {
        name: "Ada Lovelace".to_string(),
        age: "28".to_string(),
        gender: "female".to_string(),
        course: "Mathematics".to_string(),
        email: "ada@example.com".to_string(),
    }
}

#[tokio::test]
async fn storage_health_check() {
    let env = TestEnv::new().await.unwrap();

    assert!(env.storage().health_check().await.is_ok());
}

#[tokio::test]
async fn create_returns_assigned_id_and_persists_values() {
    let env = TestEnv::new().await.unwrap();
    let user = sample_user();

    let id = env.storage().users.create(&user).await.unwrap();

    let record = env.storage().users.find_by_id(id).await.unwrap().expect("row should exist");
    assert_eq!(record.id, id);
    assert_eq!(record.name, user.name);
    assert_eq!(record.age, user.age);
    assert_eq!(record.gender, user.gender);
    assert_eq!(record.course, user.course);
    assert_eq!(record.email, user.email);
}

#[tokio::test]
async fn create_assigns_distinct_ids_for_identical_data() {
    let env = TestEnv::new().await.unwrap();
    let user = sample_user();

    let first = env.storage().users.create(&user).await.unwrap();
    let second = env.storage().users.create(&user).await.unwrap();

    assert_ne!(first, second);
    assert!(second.0 > first.0, "ids should be assigned in insertion order");
    assert_eq!(env.storage().users.count().await.unwrap(), 2);
}

#[tokio::test]
async fn find_by_id_returns_none_for_unknown_id() {
    let env = TestEnv::new().await.unwrap();

    let found = env.storage().users.find_by_id(UserId(9999)).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn created_at_is_assigned_by_database() {
    let env = TestEnv::new().await.unwrap();

    let id = env.storage().users.create(&sample_user()).await.unwrap();
    let record = env.storage().users.find_by_id(id).await.unwrap().expect("row should exist");

    // Allow for clock skew between the test host and the database
    let age = chrono::Utc::now() - record.created_at;
    assert!(age.num_seconds().abs() < 300, "created_at should be recent, got {}", record.created_at);
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let env = TestEnv::new().await.unwrap();

    let id = env.storage().users.create(&sample_user()).await.unwrap();

    // Re-running the DDL must not clobber existing data
    rosterd_core::storage::ensure_schema(env.pool()).await.unwrap();

    assert_eq!(env.storage().users.count().await.unwrap(), 1);
    assert!(env.storage().users.find_by_id(id).await.unwrap().is_some());
}
