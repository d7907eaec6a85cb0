// database/memory.rs - in-process Store with the same constraint semantics as the schema
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::*;
use super::schema::*;
use super::store::{EntityRef, Store, StoreResult};

/// Rows keyed by id plus the last id handed out, like a BIGSERIAL
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    admins: Table<Admin>,
    departments: Table<Department>,
    jobs: Table<Job>,
    users: Table<User>,
    metrics: Table<Metric>,
    reviewers: Table<Reviewer>,
    tasks: Table<Task>,
    statistics: Table<Statistic>,
}

fn conflict_unique(constraint: &str) -> DatabaseError {
    DatabaseError::Conflict(unique_violation_message(constraint))
}

fn conflict_fk(constraint: &str) -> DatabaseError {
    DatabaseError::Conflict(foreign_key_violation_message(constraint))
}

impl Tables {
    fn department_owner(&self, department_id: i64) -> Option<i64> {
        self.departments.rows.get(&department_id).map(|d| d.admin_id)
    }

    fn job_owner(&self, job_id: i64) -> Option<i64> {
        let job = self.jobs.rows.get(&job_id)?;
        self.department_owner(job.department_id)
    }

    fn user_owner(&self, user_id: i64) -> Option<i64> {
        let user = self.users.rows.get(&user_id)?;
        self.job_owner(user.job_id)
    }

    fn summarize(&self, department: &Department) -> Option<DepartmentSummary> {
        let admin = self.admins.rows.get(&department.admin_id)?;
        let employees_count = self
            .users
            .rows
            .values()
            .filter(|u| {
                self.jobs
                    .rows
                    .get(&u.job_id)
                    .is_some_and(|j| j.department_id == department.id)
            })
            .count() as i64;

        Some(DepartmentSummary {
            id: department.id,
            name: department.name.clone(),
            admin_id: department.admin_id,
            admin_name: admin.full_name.clone(),
            employees_count,
        })
    }

    fn check_department(&self, id: Option<i64>, name: &str, admin_id: i64) -> StoreResult<()> {
        if self
            .departments
            .rows
            .values()
            .any(|d| d.name == name && Some(d.id) != id)
        {
            return Err(conflict_unique(UQ_DEPARTMENTS_NAME));
        }
        if !self.admins.contains(admin_id) {
            return Err(conflict_fk(FK_DEPARTMENTS_ADMIN));
        }
        Ok(())
    }

    fn check_job(&self, input: &JobInput) -> StoreResult<()> {
        if !self.departments.contains(input.department_id) {
            return Err(conflict_fk(FK_JOBS_DEPARTMENT));
        }
        if let Some(reviewer_id) = input.reviewer_id {
            if !self.reviewers.contains(reviewer_id) {
                return Err(conflict_fk(FK_JOBS_REVIEWER));
            }
        }
        Ok(())
    }

    fn check_user(&self, input: &UserInput) -> StoreResult<()> {
        if !self.jobs.contains(input.job_id) {
            return Err(conflict_fk(FK_USERS_JOB));
        }
        Ok(())
    }

    fn check_metric(&self, id: Option<i64>, input: &MetricInput) -> StoreResult<()> {
        if self
            .metrics
            .rows
            .values()
            .any(|m| m.name == input.name && Some(m.id) != id)
        {
            return Err(conflict_unique(UQ_METRICS_NAME));
        }
        Ok(())
    }

    fn check_task(&self, input: &TaskInput) -> StoreResult<()> {
        if !self.users.contains(input.user_id) {
            return Err(conflict_fk(FK_TASKS_USER));
        }
        if let Some(metric_id) = input.metric_id {
            if !self.metrics.contains(metric_id) {
                return Err(conflict_fk(FK_TASKS_METRIC));
            }
        }
        Ok(())
    }

    fn check_statistic(&self, id: Option<i64>, input: &StatisticInput) -> StoreResult<()> {
        if self.statistics.rows.values().any(|s| {
            s.date == input.date
                && s.user_id == input.user_id
                && s.metric_id == input.metric_id
                && Some(s.id) != id
        }) {
            return Err(conflict_unique(UQ_STATISTICS_DATE_USER_METRIC));
        }
        if !self.users.contains(input.user_id) {
            return Err(conflict_fk(FK_STATISTICS_USER));
        }
        if !self.metrics.contains(input.metric_id) {
            return Err(conflict_fk(FK_STATISTICS_METRIC));
        }
        Ok(())
    }

    fn remove_user(&mut self, id: i64) -> bool {
        self.tasks.rows.retain(|_, t| t.user_id != id);
        self.statistics.rows.retain(|_, s| s.user_id != id);
        self.users.rows.remove(&id).is_some()
    }

    /// Job plus its users, and through them their tasks and statistics
    fn remove_job(&mut self, id: i64) -> bool {
        let user_ids: Vec<i64> = self
            .users
            .rows
            .values()
            .filter(|u| u.job_id == id)
            .map(|u| u.id)
            .collect();
        for user_id in user_ids {
            self.remove_user(user_id);
        }
        self.jobs.rows.remove(&id).is_some()
    }
}

/// Tables live behind a single lock, so every operation is atomic
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn owner_of(&self, entity: EntityRef) -> StoreResult<Option<i64>> {
        let t = self.tables.read().await;
        let owner = match entity {
            EntityRef::Department(id) => t.department_owner(id),
            EntityRef::Job(id) => t.job_owner(id),
            EntityRef::User(id) => t.user_owner(id),
            EntityRef::Task(id) => t.tasks.rows.get(&id).and_then(|x| t.user_owner(x.user_id)),
            EntityRef::Statistic(id) => t
                .statistics
                .rows
                .get(&id)
                .and_then(|x| t.user_owner(x.user_id)),
        };
        Ok(owner)
    }

    // Admins

    async fn count_admins(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.admins.rows.len() as i64)
    }

    async fn list_admins(&self) -> StoreResult<Vec<Admin>> {
        Ok(self.tables.read().await.admins.all())
    }

    async fn get_admin(&self, id: i64) -> StoreResult<Option<Admin>> {
        Ok(self.tables.read().await.admins.get(id))
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let t = self.tables.read().await;
        Ok(t.admins.rows.values().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, admin: NewAdmin) -> StoreResult<Admin> {
        let mut t = self.tables.write().await;
        if t.admins.rows.values().any(|a| a.email == admin.email) {
            return Err(conflict_unique(UQ_ADMINS_EMAIL));
        }
        let row = Admin {
            id: t.admins.next_id(),
            email: admin.email,
            full_name: admin.full_name,
            password_hash: admin.password_hash,
        };
        t.admins.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_admin(&self, id: i64, changes: AdminChanges) -> StoreResult<Option<Admin>> {
        let mut t = self.tables.write().await;
        let Some(row) = t.admins.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(full_name) = changes.full_name {
            row.full_name = full_name;
        }
        if let Some(password_hash) = changes.password_hash {
            row.password_hash = password_hash;
        }
        Ok(Some(row.clone()))
    }

    async fn delete_admin(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.departments.rows.values().any(|d| d.admin_id == id) {
            return Err(conflict_fk(FK_DEPARTMENTS_ADMIN));
        }
        Ok(t.admins.rows.remove(&id).is_some())
    }

    async fn count_departments_of(&self, admin_id: i64) -> StoreResult<i64> {
        let t = self.tables.read().await;
        Ok(t.departments
            .rows
            .values()
            .filter(|d| d.admin_id == admin_id)
            .count() as i64)
    }

    // Departments

    async fn list_departments(&self, admin_id: i64) -> StoreResult<Vec<DepartmentSummary>> {
        let t = self.tables.read().await;
        Ok(t.departments
            .rows
            .values()
            .filter(|d| d.admin_id == admin_id)
            .filter_map(|d| t.summarize(d))
            .collect())
    }

    async fn department_summary(&self, id: i64) -> StoreResult<Option<DepartmentSummary>> {
        let t = self.tables.read().await;
        Ok(t.departments.rows.get(&id).and_then(|d| t.summarize(d)))
    }

    async fn insert_department(
        &self,
        admin_id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Department> {
        let mut t = self.tables.write().await;
        t.check_department(None, &input.name, admin_id)?;
        let row = Department {
            id: t.departments.next_id(),
            name: input.name.clone(),
            admin_id,
        };
        t.departments.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_department(
        &self,
        id: i64,
        input: &DepartmentInput,
    ) -> StoreResult<Option<Department>> {
        let mut t = self.tables.write().await;
        let Some(admin_id) = t.department_owner(id) else {
            return Ok(None);
        };
        t.check_department(Some(id), &input.name, admin_id)?;
        let row = Department {
            id,
            name: input.name.clone(),
            admin_id,
        };
        t.departments.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_department(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if !t.departments.contains(id) {
            return Ok(false);
        }
        let job_ids: Vec<i64> = t
            .jobs
            .rows
            .values()
            .filter(|j| j.department_id == id)
            .map(|j| j.id)
            .collect();
        for job_id in job_ids {
            t.remove_job(job_id);
        }
        Ok(t.departments.rows.remove(&id).is_some())
    }

    // Jobs

    async fn list_jobs(&self, admin_id: i64) -> StoreResult<Vec<Job>> {
        let t = self.tables.read().await;
        Ok(t.jobs
            .rows
            .values()
            .filter(|j| t.department_owner(j.department_id) == Some(admin_id))
            .cloned()
            .collect())
    }

    async fn get_job(&self, id: i64) -> StoreResult<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(id))
    }

    async fn insert_job(&self, input: &JobInput) -> StoreResult<Job> {
        let mut t = self.tables.write().await;
        t.check_job(input)?;
        let row = Job {
            id: t.jobs.next_id(),
            name: input.name.clone(),
            department_id: input.department_id,
            reviewer_id: input.reviewer_id,
        };
        t.jobs.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: i64, input: &JobInput) -> StoreResult<Option<Job>> {
        let mut t = self.tables.write().await;
        if !t.jobs.contains(id) {
            return Ok(None);
        }
        t.check_job(input)?;
        let row = Job {
            id,
            name: input.name.clone(),
            department_id: input.department_id,
            reviewer_id: input.reviewer_id,
        };
        t.jobs.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_job(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_job(id))
    }

    // Users

    async fn list_users(&self, admin_id: i64) -> StoreResult<Vec<User>> {
        let t = self.tables.read().await;
        Ok(t.users
            .rows
            .values()
            .filter(|u| t.job_owner(u.job_id) == Some(admin_id))
            .cloned()
            .collect())
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id))
    }

    async fn insert_user(&self, input: &UserInput) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        t.check_user(input)?;
        let row = User {
            id: t.users.next_id(),
            name: input.name.clone(),
            job_id: input.job_id,
        };
        t.users.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_user(&self, id: i64, input: &UserInput) -> StoreResult<Option<User>> {
        let mut t = self.tables.write().await;
        if !t.users.contains(id) {
            return Ok(None);
        }
        t.check_user(input)?;
        let row = User {
            id,
            name: input.name.clone(),
            job_id: input.job_id,
        };
        t.users.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_user(id))
    }

    // Metrics

    async fn list_metrics(&self) -> StoreResult<Vec<Metric>> {
        Ok(self.tables.read().await.metrics.all())
    }

    async fn get_metric(&self, id: i64) -> StoreResult<Option<Metric>> {
        Ok(self.tables.read().await.metrics.get(id))
    }

    async fn insert_metric(&self, input: &MetricInput) -> StoreResult<Metric> {
        let mut t = self.tables.write().await;
        t.check_metric(None, input)?;
        let row = Metric {
            id: t.metrics.next_id(),
            name: input.name.clone(),
            cost: input.cost,
        };
        t.metrics.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_metric(&self, id: i64, input: &MetricInput) -> StoreResult<Option<Metric>> {
        let mut t = self.tables.write().await;
        if !t.metrics.contains(id) {
            return Ok(None);
        }
        t.check_metric(Some(id), input)?;
        let row = Metric {
            id,
            name: input.name.clone(),
            cost: input.cost,
        };
        t.metrics.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_metric(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.metrics.rows.remove(&id).is_none() {
            return Ok(false);
        }
        for task in t.tasks.rows.values_mut() {
            if task.metric_id == Some(id) {
                task.metric_id = None;
            }
        }
        t.statistics.rows.retain(|_, s| s.metric_id != id);
        Ok(true)
    }

    // Reviewers

    async fn list_reviewers(&self) -> StoreResult<Vec<Reviewer>> {
        Ok(self.tables.read().await.reviewers.all())
    }

    async fn get_reviewer(&self, id: i64) -> StoreResult<Option<Reviewer>> {
        Ok(self.tables.read().await.reviewers.get(id))
    }

    async fn insert_reviewer(&self, input: &ReviewerInput) -> StoreResult<Reviewer> {
        let mut t = self.tables.write().await;
        let row = Reviewer {
            id: t.reviewers.next_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            metrics: input.metrics_json(),
        };
        t.reviewers.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_reviewer(
        &self,
        id: i64,
        input: &ReviewerInput,
    ) -> StoreResult<Option<Reviewer>> {
        let mut t = self.tables.write().await;
        if !t.reviewers.contains(id) {
            return Ok(None);
        }
        let row = Reviewer {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            metrics: input.metrics_json(),
        };
        t.reviewers.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_reviewer(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.reviewers.rows.remove(&id).is_none() {
            return Ok(false);
        }
        for job in t.jobs.rows.values_mut() {
            if job.reviewer_id == Some(id) {
                job.reviewer_id = None;
            }
        }
        Ok(true)
    }

    // Tasks

    async fn list_tasks(&self, admin_id: i64) -> StoreResult<Vec<Task>> {
        let t = self.tables.read().await;
        Ok(t.tasks
            .rows
            .values()
            .filter(|x| t.user_owner(x.user_id) == Some(admin_id))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(id))
    }

    async fn insert_task(&self, input: &TaskInput) -> StoreResult<Task> {
        let mut t = self.tables.write().await;
        t.check_task(input)?;
        let row = Task {
            id: t.tasks.next_id(),
            user_id: input.user_id,
            date: input.date,
            description: input.description.clone(),
            metric_id: input.metric_id,
        };
        t.tasks.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_task(&self, id: i64, input: &TaskInput) -> StoreResult<Option<Task>> {
        let mut t = self.tables.write().await;
        if !t.tasks.contains(id) {
            return Ok(None);
        }
        t.check_task(input)?;
        let row = Task {
            id,
            user_id: input.user_id,
            date: input.date,
            description: input.description.clone(),
            metric_id: input.metric_id,
        };
        t.tasks.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.rows.remove(&id).is_some())
    }

    // Statistics

    async fn list_statistics(&self, admin_id: i64) -> StoreResult<Vec<Statistic>> {
        let t = self.tables.read().await;
        Ok(t.statistics
            .rows
            .values()
            .filter(|s| t.user_owner(s.user_id) == Some(admin_id))
            .cloned()
            .collect())
    }

    async fn get_statistic(&self, id: i64) -> StoreResult<Option<Statistic>> {
        Ok(self.tables.read().await.statistics.get(id))
    }

    async fn insert_statistic(&self, input: &StatisticInput) -> StoreResult<Statistic> {
        let mut t = self.tables.write().await;
        t.check_statistic(None, input)?;
        let row = Statistic {
            id: t.statistics.next_id(),
            date: input.date,
            user_id: input.user_id,
            metric_id: input.metric_id,
            value: input.value,
        };
        t.statistics.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_statistic(
        &self,
        id: i64,
        input: &StatisticInput,
    ) -> StoreResult<Option<Statistic>> {
        let mut t = self.tables.write().await;
        if !t.statistics.contains(id) {
            return Ok(None);
        }
        t.check_statistic(Some(id), input)?;
        let row = Statistic {
            id,
            date: input.date,
            user_id: input.user_id,
            metric_id: input.metric_id,
            value: input.value,
        };
        t.statistics.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_statistic(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.statistics.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn seeded() -> (MemoryStore, Admin, Job, User, Metric) {
        let store = MemoryStore::new();
        let admin = store
            .insert_admin(NewAdmin {
                email: "owner@example.com".into(),
                full_name: "Owner".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap();
        let department = store
            .insert_department(admin.id, &DepartmentInput { name: "Ops".into() })
            .await
            .unwrap();
        let job = store
            .insert_job(&JobInput {
                name: "Operator".into(),
                department_id: department.id,
                reviewer_id: None,
            })
            .await
            .unwrap();
        let user = store
            .insert_user(&UserInput {
                name: "Ivan".into(),
                job_id: job.id,
            })
            .await
            .unwrap();
        let metric = store
            .insert_metric(&MetricInput {
                name: "Calls".into(),
                cost: 3,
            })
            .await
            .unwrap();
        (store, admin, job, user, metric)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn owner_walks_the_chain() {
        let (store, admin, job, user, metric) = seeded().await;
        let task = store
            .insert_task(&TaskInput {
                user_id: user.id,
                date: day(1),
                description: "call back".into(),
                metric_id: Some(metric.id),
            })
            .await
            .unwrap();

        assert_eq!(store.owner_of(EntityRef::Job(job.id)).await.unwrap(), Some(admin.id));
        assert_eq!(store.owner_of(EntityRef::User(user.id)).await.unwrap(), Some(admin.id));
        assert_eq!(store.owner_of(EntityRef::Task(task.id)).await.unwrap(), Some(admin.id));
        assert_eq!(store.owner_of(EntityRef::Task(999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (store, ..) = seeded().await;
        let first = store
            .insert_metric(&MetricInput { name: "A".into(), cost: 1 })
            .await
            .unwrap();
        store.delete_metric(first.id).await.unwrap();
        let second = store
            .insert_metric(&MetricInput { name: "B".into(), cost: 1 })
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn job_delete_takes_its_users_along() {
        let (store, admin, job, user, metric) = seeded().await;
        store
            .insert_statistic(&StatisticInput {
                date: day(2),
                user_id: user.id,
                metric_id: metric.id,
                value: 1,
            })
            .await
            .unwrap();

        assert!(store.delete_job(job.id).await.unwrap());
        assert!(store.get_user(user.id).await.unwrap().is_none());
        assert!(store.list_statistics(admin.id).await.unwrap().is_empty());
        assert!(!store.delete_job(job.id).await.unwrap());
    }

    #[tokio::test]
    async fn department_delete_cascades_down_the_chain() {
        let (store, admin, job, user, _) = seeded().await;
        let department_id = job.department_id;
        let task = store
            .insert_task(&TaskInput {
                user_id: user.id,
                date: day(3),
                description: "report".into(),
                metric_id: None,
            })
            .await
            .unwrap();

        assert!(store.delete_department(department_id).await.unwrap());
        assert!(store.get_job(job.id).await.unwrap().is_none());
        assert!(store.get_user(user.id).await.unwrap().is_none());
        assert!(store.get_task(task.id).await.unwrap().is_none());
        assert_eq!(store.count_departments_of(admin.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reviewer_delete_clears_job_reference() {
        let (store, _, job, _, _) = seeded().await;
        let reviewer = store
            .insert_reviewer(&ReviewerInput {
                name: "Strict".into(),
                description: String::new(),
                metrics: None,
            })
            .await
            .unwrap();
        store
            .update_job(
                job.id,
                &JobInput {
                    name: job.name.clone(),
                    department_id: job.department_id,
                    reviewer_id: Some(reviewer.id),
                },
            )
            .await
            .unwrap();

        store.delete_reviewer(reviewer.id).await.unwrap();
        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.reviewer_id, None);
    }

    #[tokio::test]
    async fn statistic_update_may_keep_its_own_tuple() {
        let (store, _, _, user, metric) = seeded().await;
        let input = StatisticInput {
            date: day(2),
            user_id: user.id,
            metric_id: metric.id,
            value: 5,
        };
        let stat = store.insert_statistic(&input).await.unwrap();

        let updated = store
            .update_statistic(stat.id, &StatisticInput { value: 9, ..input.clone() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, 9);
        assert!(store.insert_statistic(&input).await.is_err());
    }
}
