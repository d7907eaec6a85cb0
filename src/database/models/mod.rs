pub mod admin;
pub mod department;
pub mod job;
pub mod metric;
pub mod reviewer;
pub mod statistic;
pub mod task;
pub mod user;

pub use admin::{Admin, AdminChanges, AdminCreate, AdminUpdate, AdminView, NewAdmin};
pub use department::{Department, DepartmentInput, DepartmentSummary};
pub use job::{Job, JobInput};
pub use metric::{Metric, MetricInput};
pub use reviewer::{Reviewer, ReviewerDescriptionRequest, ReviewerInput, ReviewerMetric};
pub use statistic::{Statistic, StatisticInput};
pub use task::{Task, TaskInput};
pub use user::{User, UserInput};

use validator::ValidationError;

/// Rejects strings that are empty once trimmed
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
