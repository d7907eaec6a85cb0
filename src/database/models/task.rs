use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub metric_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskInput {
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub metric_id: Option<i64>,
}
