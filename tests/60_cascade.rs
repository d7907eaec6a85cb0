mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn deleting_user_removes_tasks_and_statistics() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;
    let metric = app.metric(&owner, "Calls").await?;

    let task = app
        .create(
            "/api/tasks",
            cred,
            json!({"user_id": chain.user_id, "date": "2024-01-10", "description": "Report"}),
        )
        .await?;
    let statistic = app
        .create(
            "/api/statistics",
            cred,
            json!({"date": "2024-01-10", "user_id": chain.user_id, "metric_id": metric, "value": 5}),
        )
        .await?;

    let (status, _) = app
        .delete(&format!("/api/users/{}", chain.user_id), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/tasks/{}", id_of(&task)?), cred)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .get(&format!("/api/statistics/{}", id_of(&statistic)?), cred)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/tasks", cred).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn deleting_metric_detaches_tasks() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;
    let metric = app.metric(&owner, "Calls").await?;

    let task = app
        .create(
            "/api/tasks",
            cred,
            json!({"user_id": chain.user_id, "date": "2024-01-10", "description": "Dial", "metric_id": metric}),
        )
        .await?;
    app.create(
        "/api/statistics",
        cred,
        json!({"date": "2024-01-10", "user_id": chain.user_id, "metric_id": metric, "value": 5}),
    )
    .await?;

    let (status, _) = app.delete(&format!("/api/metrics/{}", metric), cred).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .get(&format!("/api/tasks/{}", id_of(&task)?), cred)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["metric_id"].is_null());

    let (_, body) = app.get("/api/statistics", cred).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn deleting_job_removes_its_users() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;
    let metric = app.metric(&owner, "Calls").await?;

    app.create(
        "/api/statistics",
        cred,
        json!({"date": "2024-01-10", "user_id": chain.user_id, "metric_id": metric, "value": 5}),
    )
    .await?;

    let (status, _) = app
        .delete(&format!("/api/jobs/{}", chain.job_id), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/users/{}", chain.user_id), cred)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get("/api/statistics", cred).await?;
    assert_eq!(body["data"], json!([]));

    let (_, body) = app
        .get(&format!("/api/departments/{}", chain.department_id), cred)
        .await?;
    assert_eq!(body["data"]["employees_count"], 0);
    Ok(())
}

#[tokio::test]
async fn deleting_staffed_department_cascades() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;

    let task = app
        .create(
            "/api/tasks",
            cred,
            json!({"user_id": chain.user_id, "date": "2024-01-11", "description": "Report"}),
        )
        .await?;

    let (status, _) = app
        .delete(&format!("/api/departments/{}", chain.department_id), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for path in [
        format!("/api/jobs/{}", chain.job_id),
        format!("/api/users/{}", chain.user_id),
        format!("/api/tasks/{}", id_of(&task)?),
    ] {
        let (status, _) = app.get(&path, cred).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
    }

    // Nothing left to block the owner's removal
    let keeper = app.admin("keeper@example.com").await?;
    let (status, _) = app
        .delete(&format!("/api/admins/{}", owner.admin_id), &keeper.credential)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn deleting_department_removes_empty_jobs() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;

    let department = app
        .create("/api/departments", cred, json!({"name": "Temp"}))
        .await?;
    let job = app
        .create(
            "/api/jobs",
            cred,
            json!({"name": "Placeholder", "department_id": department["id"]}),
        )
        .await?;

    let (status, _) = app
        .delete(&format!("/api/departments/{}", id_of(&department)?), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/jobs/{}", id_of(&job)?), cred).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_reviewer_detaches_jobs() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;

    let reviewer = app
        .create(
            "/api/reviewers",
            cred,
            json!({"name": "Quality", "description": "Rates calls"}),
        )
        .await?;
    let department = app
        .create("/api/departments", cred, json!({"name": "Calls"}))
        .await?;
    let job = app
        .create(
            "/api/jobs",
            cred,
            json!({"name": "Operator", "department_id": department["id"], "reviewer_id": reviewer["id"]}),
        )
        .await?;
    assert_eq!(job["reviewer_id"], reviewer["id"]);

    let (status, _) = app
        .delete(&format!("/api/reviewers/{}", id_of(&reviewer)?), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get(&format!("/api/jobs/{}", id_of(&job)?), cred).await?;
    assert!(body["data"]["reviewer_id"].is_null());
    Ok(())
}
