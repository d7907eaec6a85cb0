#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use daily_crm::app::{router, AppState};
use daily_crm::auth::{hash_password, issue_token, AuthMode};
use daily_crm::config::AppConfig;
use daily_crm::database::models::NewAdmin;
use daily_crm::database::MemoryStore;
use daily_crm::services::ReviewerGenerator;

pub const PASSWORD: &str = "correct-horse";

/// How a request identifies its admin
#[derive(Debug, Clone)]
pub enum Credential {
    Anonymous,
    Bearer(String),
    AdminId(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub admin_id: i64,
    pub email: String,
    pub credential: Credential,
}

/// Department → job → user created under one admin
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    pub department_id: i64,
    pub job_id: i64,
    pub user_id: i64,
}

/// Router over a fresh in-memory store, driven with `oneshot`
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_mode(mode: AuthMode) -> Self {
        let mut config = AppConfig::development();
        config.security.auth_mode = mode;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::from_state(AppState::new(config, Arc::new(MemoryStore::new())))
    }

    pub fn with_generator(generator: ReviewerGenerator) -> Self {
        let state = AppState::new(AppConfig::development(), Arc::new(MemoryStore::new()))
            .with_reviewer_generator(generator);
        Self::from_state(state)
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            router: router(state.clone()),
            state,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        builder = match credential {
            Credential::Anonymous => builder,
            Credential::Bearer(token) => {
                builder.header(header::AUTHORIZATION, format!("Bearer {}", token))
            }
            Credential::AdminId(id) => builder.header("X-Admin-Id", id.as_str()),
        };

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str, credential: &Credential) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, credential, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        credential: &Credential,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, credential, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        credential: &Credential,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, credential, Some(body)).await
    }

    pub async fn delete(&self, path: &str, credential: &Credential) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, credential, None).await
    }

    /// POST that must answer 201; returns the `data` payload
    pub async fn create(&self, path: &str, credential: &Credential, body: Value) -> Result<Value> {
        let (status, response) = self.post(path, credential, body).await?;
        anyhow::ensure!(
            status == StatusCode::CREATED,
            "POST {} returned {}: {}",
            path,
            status,
            response
        );
        Ok(response["data"].clone())
    }

    /// Admin inserted straight into the store, with a credential for the current auth mode
    pub async fn admin(&self, email: &str) -> Result<Session> {
        let admin = self
            .state
            .store
            .insert_admin(NewAdmin {
                email: email.to_string(),
                full_name: format!("Admin {}", email),
                password_hash: hash_password(PASSWORD),
            })
            .await?;

        let credential = match self.state.config.security.auth_mode {
            AuthMode::Bearer => Credential::Bearer(
                issue_token(&self.state.config.security, admin.id, &admin.email)?.access_token,
            ),
            AuthMode::Header => Credential::AdminId(admin.id.to_string()),
        };

        Ok(Session {
            admin_id: admin.id,
            email: admin.email,
            credential,
        })
    }

    pub async fn chain(&self, session: &Session, label: &str) -> Result<Chain> {
        let cred = &session.credential;
        let department = self
            .create("/api/departments", cred, json!({ "name": format!("{} dept", label) }))
            .await?;
        let job = self
            .create(
                "/api/jobs",
                cred,
                json!({ "name": format!("{} job", label), "department_id": department["id"] }),
            )
            .await?;
        let user = self
            .create(
                "/api/users",
                cred,
                json!({ "name": format!("{} user", label), "job_id": job["id"] }),
            )
            .await?;

        Ok(Chain {
            department_id: id_of(&department)?,
            job_id: id_of(&job)?,
            user_id: id_of(&user)?,
        })
    }

    pub async fn metric(&self, session: &Session, name: &str) -> Result<i64> {
        let metric = self
            .create(
                "/api/metrics",
                &session.credential,
                json!({ "name": name, "cost": 10 }),
            )
            .await?;
        id_of(&metric)
    }
}

pub fn id_of(value: &Value) -> Result<i64> {
    value["id"]
        .as_i64()
        .with_context(|| format!("no numeric id in {}", value))
}
