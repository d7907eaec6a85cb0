use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
    pub reviewer_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub department_id: i64,
    #[serde(default)]
    pub reviewer_id: Option<i64>,
}
