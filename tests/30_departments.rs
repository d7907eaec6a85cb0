mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn department_lifecycle() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;

    let created = app
        .create("/api/departments", cred, json!({"name": "Support"}))
        .await?;
    let id = id_of(&created)?;
    assert_eq!(created["name"], "Support");
    assert_eq!(created["admin_id"], owner.admin_id);
    assert_eq!(created["admin_name"], "Admin owner@example.com");
    assert_eq!(created["employees_count"], 0);

    let path = format!("/api/departments/{}", id);
    let (status, body) = app.put(&path, cred, json!({"name": "Customer Care"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Customer Care");

    let (status, body) = app.get("/api/departments", cred).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id);

    let (status, _) = app.delete(&path, cred).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&path, cred).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Department not found");
    Ok(())
}

#[tokio::test]
async fn employees_count_spans_jobs() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;

    let chain = app.chain(&owner, "Ops").await?;
    let second_job = app
        .create(
            "/api/jobs",
            cred,
            json!({"name": "Night shift", "department_id": chain.department_id}),
        )
        .await?;
    app.create(
        "/api/users",
        cred,
        json!({"name": "Nadia", "job_id": second_job["id"]}),
    )
    .await?;

    let (status, body) = app
        .get(&format!("/api/departments/{}", chain.department_id), cred)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employees_count"], 2);
    Ok(())
}

#[tokio::test]
async fn department_names_are_unique() -> Result<()> {
    let app = TestApp::new();
    let first = app.admin("first@example.com").await?;
    let second = app.admin("second@example.com").await?;

    app.create("/api/departments", &first.credential, json!({"name": "Sales"}))
        .await?;

    let (status, body) = app
        .post("/api/departments", &second.credential, json!({"name": "Sales"}))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Department with this name already exists");
    Ok(())
}

#[tokio::test]
async fn blank_name_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;

    let (status, body) = app
        .post("/api/departments", &owner.credential, json!({"name": "   "}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"].get("name").is_some());

    let (status, body) = app
        .post("/api/departments", &owner.credential, json!({"title": "Sales"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");
    Ok(())
}
