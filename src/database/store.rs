// database/store.rs - persistence port shared by the PostgreSQL and in-memory adapters
use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::*;

pub type StoreResult<T> = Result<T, DatabaseError>;

/// A row that sits somewhere below a department in the ownership chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Department(i64),
    Job(i64),
    User(i64),
    Task(i64),
    Statistic(i64),
}

impl EntityRef {
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Department(_) => "Department",
            EntityRef::Job(_) => "Job",
            EntityRef::User(_) => "User",
            EntityRef::Task(_) => "Task",
            EntityRef::Statistic(_) => "Statistic",
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            EntityRef::Department(id)
            | EntityRef::Job(id)
            | EntityRef::User(id)
            | EntityRef::Task(id)
            | EntityRef::Statistic(id) => id,
        }
    }
}

/// Every persistence operation the handlers need.
///
/// Lists come back in ascending id order. `update_*` return `None` and
/// `delete_*` return `false` when the row does not exist. Unique and
/// foreign-key violations surface as [`DatabaseError::Conflict`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> StoreResult<()>;

    /// Admin id at the top of the chain, `None` if any link is missing
    async fn owner_of(&self, entity: EntityRef) -> StoreResult<Option<i64>>;

    // Admins
    async fn count_admins(&self) -> StoreResult<i64>;
    async fn list_admins(&self) -> StoreResult<Vec<Admin>>;
    async fn get_admin(&self, id: i64) -> StoreResult<Option<Admin>>;
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;
    async fn insert_admin(&self, admin: NewAdmin) -> StoreResult<Admin>;
    async fn update_admin(&self, id: i64, changes: AdminChanges) -> StoreResult<Option<Admin>>;
    async fn delete_admin(&self, id: i64) -> StoreResult<bool>;
    async fn count_departments_of(&self, admin_id: i64) -> StoreResult<i64>;

    // Departments
    async fn list_departments(&self, admin_id: i64) -> StoreResult<Vec<DepartmentSummary>>;
    async fn department_summary(&self, id: i64) -> StoreResult<Option<DepartmentSummary>>;
    async fn insert_department(
        &self,
        admin_id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Department>;
    async fn update_department(
        &self,
        id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Option<Department>>;
    async fn delete_department(&self, id: i64) -> StoreResult<bool>;

    // Jobs
    async fn list_jobs(&self, admin_id: i64) -> StoreResult<Vec<Job>>;
    async fn get_job(&self, id: i64) -> StoreResult<Option<Job>>;
    async fn insert_job(&self, input: &JobInput) -> StoreResult<Job>;
    async fn update_job(&self, id: i64, input: &JobInput) -> StoreResult<Option<Job>>;
    async fn delete_job(&self, id: i64) -> StoreResult<bool>;

    // Users
    async fn list_users(&self, admin_id: i64) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn insert_user(&self, input: &UserInput) -> StoreResult<User>;
    async fn update_user(&self, id: i64, input: &UserInput) -> StoreResult<Option<User>>;
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;

    // Metrics
    async fn list_metrics(&self) -> StoreResult<Vec<Metric>>;
    async fn get_metric(&self, id: i64) -> StoreResult<Option<Metric>>;
    async fn insert_metric(&self, input: &MetricInput) -> StoreResult<Metric>;
    async fn update_metric(&self, id: i64, input: &MetricInput) -> StoreResult<Option<Metric>>;
    async fn delete_metric(&self, id: i64) -> StoreResult<bool>;

    // Reviewers
    async fn list_reviewers(&self) -> StoreResult<Vec<Reviewer>>;
    async fn get_reviewer(&self, id: i64) -> StoreResult<Option<Reviewer>>;
    async fn insert_reviewer(&self, input: &ReviewerInput) -> StoreResult<Reviewer>;
    async fn update_reviewer(
        &self,
        id: i64,
        input: &ReviewerInput,
    ) -> StoreResult<Option<Reviewer>>;
    async fn delete_reviewer(&self, id: i64) -> StoreResult<bool>;

    // Tasks
    async fn list_tasks(&self, admin_id: i64) -> StoreResult<Vec<Task>>;
    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>>;
    async fn insert_task(&self, input: &TaskInput) -> StoreResult<Task>;
    async fn update_task(&self, id: i64, input: &TaskInput) -> StoreResult<Option<Task>>;
    async fn delete_task(&self, id: i64) -> StoreResult<bool>;

    // Statistics
    async fn list_statistics(&self, admin_id: i64) -> StoreResult<Vec<Statistic>>;
    async fn get_statistic(&self, id: i64) -> StoreResult<Option<Statistic>>;
    async fn insert_statistic(&self, input: &StatisticInput) -> StoreResult<Statistic>;
    async fn update_statistic(
        &self,
        id: i64,
        input: &StatisticInput,
    ) -> StoreResult<Option<Statistic>>;
    async fn delete_statistic(&self, id: i64) -> StoreResult<bool>;
}
