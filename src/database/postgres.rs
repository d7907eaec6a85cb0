// database/postgres.rs - Store backed by PostgreSQL through sqlx
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::*;
use super::store::{EntityRef, Store, StoreResult};

const ADMIN_COLUMNS: &str = "id, email, full_name, password_hash";
const JOB_COLUMNS: &str = "j.id, j.name, j.department_id, j.reviewer_id";
const USER_COLUMNS: &str = "u.id, u.name, u.job_id";
const TASK_COLUMNS: &str = "t.id, t.user_id, t.date, t.description, t.metric_id";
const STATISTIC_COLUMNS: &str = "s.id, s.date, s.user_id, s.metric_id, s.value";

const DEPARTMENT_SUMMARY: &str = r#"
    SELECT d.id, d.name, d.admin_id, a.full_name AS admin_name,
           COUNT(u.id) AS employees_count
    FROM departments d
    JOIN admins a ON a.id = d.admin_id
    LEFT JOIN jobs j ON j.department_id = d.id
    LEFT JOIN users u ON u.job_id = j.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn delete_by_id(&self, table: &'static str, id: i64) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn owner_of(&self, entity: EntityRef) -> StoreResult<Option<i64>> {
        let sql = match entity {
            EntityRef::Department(_) => "SELECT d.admin_id FROM departments d WHERE d.id = $1",
            EntityRef::Job(_) => {
                "SELECT d.admin_id FROM jobs j
                 JOIN departments d ON d.id = j.department_id
                 WHERE j.id = $1"
            }
            EntityRef::User(_) => {
                "SELECT d.admin_id FROM users u
                 JOIN jobs j ON j.id = u.job_id
                 JOIN departments d ON d.id = j.department_id
                 WHERE u.id = $1"
            }
            EntityRef::Task(_) => {
                "SELECT d.admin_id FROM tasks t
                 JOIN users u ON u.id = t.user_id
                 JOIN jobs j ON j.id = u.job_id
                 JOIN departments d ON d.id = j.department_id
                 WHERE t.id = $1"
            }
            EntityRef::Statistic(_) => {
                "SELECT d.admin_id FROM statistics s
                 JOIN users u ON u.id = s.user_id
                 JOIN jobs j ON j.id = u.job_id
                 JOIN departments d ON d.id = j.department_id
                 WHERE s.id = $1"
            }
        };

        let owner = sqlx::query_scalar::<_, i64>(sql)
            .bind(entity.id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    // Admins

    async fn count_admins(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_admins(&self) -> StoreResult<Vec<Admin>> {
        let sql = format!("SELECT {} FROM admins ORDER BY id", ADMIN_COLUMNS);
        Ok(sqlx::query_as::<_, Admin>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_admin(&self, id: i64) -> StoreResult<Option<Admin>> {
        let sql = format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let sql = format!("SELECT {} FROM admins WHERE email = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_admin(&self, admin: NewAdmin) -> StoreResult<Admin> {
        let sql = format!(
            "INSERT INTO admins (email, full_name, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            ADMIN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(admin.email)
            .bind(admin.full_name)
            .bind(admin.password_hash)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_admin(&self, id: i64, changes: AdminChanges) -> StoreResult<Option<Admin>> {
        let sql = format!(
            "UPDATE admins SET
                full_name = COALESCE($2, full_name),
                password_hash = COALESCE($3, password_hash)
             WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .bind(changes.full_name)
            .bind(changes.password_hash)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_admin(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("admins", id).await
    }

    async fn count_departments_of(&self, admin_id: i64) -> StoreResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments WHERE admin_id = $1")
                .bind(admin_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // Departments

    async fn list_departments(&self, admin_id: i64) -> StoreResult<Vec<DepartmentSummary>> {
        let sql = format!(
            "{} WHERE d.admin_id = $1 GROUP BY d.id, a.full_name ORDER BY d.id",
            DEPARTMENT_SUMMARY
        );
        Ok(sqlx::query_as::<_, DepartmentSummary>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn department_summary(&self, id: i64) -> StoreResult<Option<DepartmentSummary>> {
        let sql = format!(
            "{} WHERE d.id = $1 GROUP BY d.id, a.full_name",
            DEPARTMENT_SUMMARY
        );
        Ok(sqlx::query_as::<_, DepartmentSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_department(
        &self,
        admin_id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Department> {
        Ok(sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, admin_id) VALUES ($1, $2)
             RETURNING id, name, admin_id",
        )
        .bind(&input.name)
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_department(
        &self,
        id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Option<Department>> {
        Ok(sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2 WHERE id = $1 RETURNING id, name, admin_id",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_department(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("departments", id).await
    }

    // Jobs

    async fn list_jobs(&self, admin_id: i64) -> StoreResult<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs j
             JOIN departments d ON d.id = j.department_id
             WHERE d.admin_id = $1 ORDER BY j.id",
            JOB_COLUMNS
        );
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_job(&self, id: i64) -> StoreResult<Option<Job>> {
        let sql = format!("SELECT {} FROM jobs j WHERE j.id = $1", JOB_COLUMNS);
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_job(&self, input: &JobInput) -> StoreResult<Job> {
        Ok(sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (name, department_id, reviewer_id) VALUES ($1, $2, $3)
             RETURNING id, name, department_id, reviewer_id",
        )
        .bind(&input.name)
        .bind(input.department_id)
        .bind(input.reviewer_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_job(&self, id: i64, input: &JobInput) -> StoreResult<Option<Job>> {
        Ok(sqlx::query_as::<_, Job>(
            "UPDATE jobs SET name = $2, department_id = $3, reviewer_id = $4
             WHERE id = $1 RETURNING id, name, department_id, reviewer_id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.department_id)
        .bind(input.reviewer_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_job(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("jobs", id).await
    }

    // Users

    async fn list_users(&self, admin_id: i64) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users u
             JOIN jobs j ON j.id = u.job_id
             JOIN departments d ON d.id = j.department_id
             WHERE d.admin_id = $1 ORDER BY u.id",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, input: &UserInput) -> StoreResult<User> {
        Ok(sqlx::query_as::<_, User>(
            "INSERT INTO users (name, job_id) VALUES ($1, $2) RETURNING id, name, job_id",
        )
        .bind(&input.name)
        .bind(input.job_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_user(&self, id: i64, input: &UserInput) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, job_id = $3 WHERE id = $1 RETURNING id, name, job_id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("users", id).await
    }

    // Metrics

    async fn list_metrics(&self) -> StoreResult<Vec<Metric>> {
        Ok(
            sqlx::query_as::<_, Metric>("SELECT id, name, cost FROM metrics ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_metric(&self, id: i64) -> StoreResult<Option<Metric>> {
        Ok(
            sqlx::query_as::<_, Metric>("SELECT id, name, cost FROM metrics WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_metric(&self, input: &MetricInput) -> StoreResult<Metric> {
        Ok(sqlx::query_as::<_, Metric>(
            "INSERT INTO metrics (name, cost) VALUES ($1, $2) RETURNING id, name, cost",
        )
        .bind(&input.name)
        .bind(input.cost)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_metric(&self, id: i64, input: &MetricInput) -> StoreResult<Option<Metric>> {
        Ok(sqlx::query_as::<_, Metric>(
            "UPDATE metrics SET name = $2, cost = $3 WHERE id = $1 RETURNING id, name, cost",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.cost)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_metric(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("metrics", id).await
    }

    // Reviewers

    async fn list_reviewers(&self) -> StoreResult<Vec<Reviewer>> {
        Ok(sqlx::query_as::<_, Reviewer>(
            "SELECT id, name, description, metrics FROM reviewers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_reviewer(&self, id: i64) -> StoreResult<Option<Reviewer>> {
        Ok(sqlx::query_as::<_, Reviewer>(
            "SELECT id, name, description, metrics FROM reviewers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_reviewer(&self, input: &ReviewerInput) -> StoreResult<Reviewer> {
        Ok(sqlx::query_as::<_, Reviewer>(
            "INSERT INTO reviewers (name, description, metrics) VALUES ($1, $2, $3)
             RETURNING id, name, description, metrics",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.metrics_json())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_reviewer(
        &self,
        id: i64,
        input: &ReviewerInput,
    ) -> StoreResult<Option<Reviewer>> {
        Ok(sqlx::query_as::<_, Reviewer>(
            "UPDATE reviewers SET name = $2, description = $3, metrics = $4
             WHERE id = $1 RETURNING id, name, description, metrics",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.metrics_json())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_reviewer(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("reviewers", id).await
    }

    // Tasks

    async fn list_tasks(&self, admin_id: i64) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks t
             JOIN users u ON u.id = t.user_id
             JOIN jobs j ON j.id = u.job_id
             JOIN departments d ON d.id = j.department_id
             WHERE d.admin_id = $1 ORDER BY t.id",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks t WHERE t.id = $1", TASK_COLUMNS);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_task(&self, input: &TaskInput) -> StoreResult<Task> {
        Ok(sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, date, description, metric_id) VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, date, description, metric_id",
        )
        .bind(input.user_id)
        .bind(input.date)
        .bind(&input.description)
        .bind(input.metric_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_task(&self, id: i64, input: &TaskInput) -> StoreResult<Option<Task>> {
        Ok(sqlx::query_as::<_, Task>(
            "UPDATE tasks SET user_id = $2, date = $3, description = $4, metric_id = $5
             WHERE id = $1 RETURNING id, user_id, date, description, metric_id",
        )
        .bind(id)
        .bind(input.user_id)
        .bind(input.date)
        .bind(&input.description)
        .bind(input.metric_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("tasks", id).await
    }

    // Statistics

    async fn list_statistics(&self, admin_id: i64) -> StoreResult<Vec<Statistic>> {
        let sql = format!(
            "SELECT {} FROM statistics s
             JOIN users u ON u.id = s.user_id
             JOIN jobs j ON j.id = u.job_id
             JOIN departments d ON d.id = j.department_id
             WHERE d.admin_id = $1 ORDER BY s.id",
            STATISTIC_COLUMNS
        );
        Ok(sqlx::query_as::<_, Statistic>(&sql)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_statistic(&self, id: i64) -> StoreResult<Option<Statistic>> {
        let sql = format!(
            "SELECT {} FROM statistics s WHERE s.id = $1",
            STATISTIC_COLUMNS
        );
        Ok(sqlx::query_as::<_, Statistic>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_statistic(&self, input: &StatisticInput) -> StoreResult<Statistic> {
        Ok(sqlx::query_as::<_, Statistic>(
            "INSERT INTO statistics (date, user_id, metric_id, value) VALUES ($1, $2, $3, $4)
             RETURNING id, date, user_id, metric_id, value",
        )
        .bind(input.date)
        .bind(input.user_id)
        .bind(input.metric_id)
        .bind(input.value)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_statistic(
        &self,
        id: i64,
        input: &StatisticInput,
    ) -> StoreResult<Option<Statistic>> {
        Ok(sqlx::query_as::<_, Statistic>(
            "UPDATE statistics SET date = $2, user_id = $3, metric_id = $4, value = $5
             WHERE id = $1 RETURNING id, date, user_id, metric_id, value",
        )
        .bind(id)
        .bind(input.date)
        .bind(input.user_id)
        .bind(input.metric_id)
        .bind(input.value)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_statistic(&self, id: i64) -> StoreResult<bool> {
        self.delete_by_id("statistics", id).await
    }
}
