use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MetricInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub cost: i64,
}
