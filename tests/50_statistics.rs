mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn one_statistic_per_date_user_and_metric() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;
    let metric = app.metric(&owner, "Calls").await?;

    let row = json!({"date": "2024-05-02", "user_id": chain.user_id, "metric_id": metric, "value": 12});
    let first = app.create("/api/statistics", cred, row.clone()).await?;

    let (status, body) = app.post("/api/statistics", cred, row.clone()).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Statistic for this date, user and metric already exists"
    );

    // Another day is fine
    app.create(
        "/api/statistics",
        cred,
        json!({"date": "2024-05-03", "user_id": chain.user_id, "metric_id": metric, "value": 3}),
    )
    .await?;

    let (status, _) = app
        .delete(&format!("/api/statistics/{}", id_of(&first)?), cred)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let again = app.create("/api/statistics", cred, row).await?;
    assert_eq!(again["value"], 12);
    Ok(())
}

#[tokio::test]
async fn update_into_existing_tuple_conflicts() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let cred = &owner.credential;
    let chain = app.chain(&owner, "Main").await?;
    let metric = app.metric(&owner, "Calls").await?;

    app.create(
        "/api/statistics",
        cred,
        json!({"date": "2024-05-02", "user_id": chain.user_id, "metric_id": metric, "value": 1}),
    )
    .await?;
    let other = app
        .create(
            "/api/statistics",
            cred,
            json!({"date": "2024-05-03", "user_id": chain.user_id, "metric_id": metric, "value": 2}),
        )
        .await?;

    let path = format!("/api/statistics/{}", id_of(&other)?);
    let (status, _) = app
        .put(
            &path,
            cred,
            json!({"date": "2024-05-02", "user_id": chain.user_id, "metric_id": metric, "value": 2}),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .put(
            &path,
            cred,
            json!({"date": "2024-05-03", "user_id": chain.user_id, "metric_id": metric, "value": 9}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], 9);
    Ok(())
}

#[tokio::test]
async fn statistic_requires_existing_metric() -> Result<()> {
    let app = TestApp::new();
    let owner = app.admin("owner@example.com").await?;
    let chain = app.chain(&owner, "Main").await?;

    let (status, body) = app
        .post(
            "/api/statistics",
            &owner.credential,
            json!({"date": "2024-05-02", "user_id": chain.user_id, "metric_id": 77, "value": 1}),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Metric not found");

    let (status, body) = app
        .post(
            "/api/statistics",
            &owner.credential,
            json!({"date": "yesterday", "user_id": chain.user_id, "metric_id": 77, "value": 1}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");
    Ok(())
}
