use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A numeric observation, unique per (date, user, metric)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Statistic {
    pub id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub metric_id: i64,
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatisticInput {
    pub date: NaiveDate,
    pub user_id: i64,
    pub metric_id: i64,
    pub value: i64,
}
