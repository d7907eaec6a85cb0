use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

/// An employee holding a job. Not a login identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub job_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub job_id: i64,
}
