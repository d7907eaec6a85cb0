use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub admin_id: i64,
}

/// Department with its owner's name and a head count across all of its jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DepartmentSummary {
    pub id: i64,
    pub name: String,
    pub admin_id: i64,
    pub admin_name: String,
    pub employees_count: i64,
}

/// Create and replace payload; the owner always comes from the caller
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DepartmentInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}
