use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

/// One scored dimension of a reviewer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReviewerMetric {
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub value: i64,
    #[validate(custom(function = "not_blank"))]
    pub json_name: String,
    #[validate(custom(function = "not_blank"))]
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reviewer {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub metrics: Option<Json<Vec<ReviewerMetric>>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewerInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub description: String,
    #[serde(default)]
    #[validate(nested)]
    pub metrics: Option<Vec<ReviewerMetric>>,
}

impl ReviewerInput {
    pub fn metrics_json(&self) -> Option<Json<Vec<ReviewerMetric>>> {
        self.metrics.clone().map(Json)
    }
}

/// Input for generating a reviewer profile; nothing is stored
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewerDescriptionRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}
