mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{id_of, Credential, TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn first_admin_bootstraps_anonymously() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/admins",
            &Credential::Anonymous,
            json!({"email": "first@example.com", "full_name": "First Admin", "password": "pw-1"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "first@example.com");
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());

    // The door closes once an admin exists
    let (status, body) = app
        .post(
            "/api/admins",
            &Credential::Anonymous,
            json!({"email": "second@example.com", "full_name": "Second", "password": "pw-2"}),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
    Ok(())
}

#[tokio::test]
async fn authenticated_admin_creates_more_admins() -> Result<()> {
    let app = TestApp::new();
    let session = app.admin("root@example.com").await?;

    let created = app
        .create(
            "/api/admins",
            &session.credential,
            json!({"email": "colleague@example.com", "full_name": "Colleague", "password": "pw"}),
        )
        .await?;
    let id = id_of(&created)?;

    let (status, body) = app.get("/api/admins", &session.credential).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![session.admin_id, id]);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = TestApp::new();
    let session = app.admin("root@example.com").await?;

    let (status, body) = app
        .post(
            "/api/admins",
            &session.credential,
            json!({"email": "root@example.com", "full_name": "Again", "password": "pw"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["error"], "Admin with this email already exists");
    Ok(())
}

#[tokio::test]
async fn invalid_admin_payload_reports_fields() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/admins",
            &Credential::Anonymous,
            json!({"email": "not-an-email", "full_name": "  ", "password": "pw"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");
    assert!(body["field_errors"].get("email").is_some());
    assert!(body["field_errors"].get("full_name").is_some());
    Ok(())
}

#[tokio::test]
async fn password_change_applies_to_login() -> Result<()> {
    let app = TestApp::new();
    let session = app.admin("root@example.com").await?;

    let (status, body) = app
        .put(
            &format!("/api/admins/{}", session.admin_id),
            &session.credential,
            json!({"full_name": "Renamed", "password": "new-password"}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Renamed");

    let (status, _) = app
        .post(
            "/api/auth/login",
            &Credential::Anonymous,
            json!({"email": "root@example.com", "password": PASSWORD}),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/login",
            &Credential::Anonymous,
            json!({"email": "root@example.com", "password": "new-password"}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn admin_with_departments_cannot_be_deleted() -> Result<()> {
    let app = TestApp::new();
    let keeper = app.admin("keeper@example.com").await?;
    let owner = app.admin("owner@example.com").await?;

    let department = app
        .create("/api/departments", &owner.credential, json!({"name": "Sales"}))
        .await?;

    let path = format!("/api/admins/{}", owner.admin_id);
    let (status, body) = app.delete(&path, &keeper.credential).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot delete admin with assigned departments");

    let (status, _) = app
        .delete(
            &format!("/api/departments/{}", id_of(&department)?),
            &owner.credential,
        )
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.delete(&path, &keeper.credential).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app.get(&path, &keeper.credential).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Admin not found");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_malformed() -> Result<()> {
    let app = TestApp::new();
    let session = app.admin("root@example.com").await?;

    let (status, body) = app.get("/api/admins/abc", &session.credential).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");
    Ok(())
}

#[tokio::test]
async fn empty_password_keeps_the_current_one() -> Result<()> {
    let app = TestApp::new();
    let session = app.admin("root@example.com").await?;

    let (status, body) = app
        .put(
            &format!("/api/admins/{}", session.admin_id),
            &session.credential,
            json!({"full_name": "Still Root", "password": ""}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Still Root");

    let (status, _) = app
        .post(
            "/api/auth/login",
            &Credential::Anonymous,
            json!({"email": "root@example.com", "password": PASSWORD}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
