// database/schema.rs - relational schema and the constraint names it declares

pub const UQ_ADMINS_EMAIL: &str = "uq_admins_email";
pub const UQ_DEPARTMENTS_NAME: &str = "uq_departments_name";
pub const UQ_METRICS_NAME: &str = "uq_metrics_name";
pub const UQ_STATISTICS_DATE_USER_METRIC: &str = "uq_statistics_date_user_metric";

pub const FK_DEPARTMENTS_ADMIN: &str = "fk_departments_admin";
pub const FK_JOBS_DEPARTMENT: &str = "fk_jobs_department";
pub const FK_JOBS_REVIEWER: &str = "fk_jobs_reviewer";
pub const FK_USERS_JOB: &str = "fk_users_job";
pub const FK_TASKS_USER: &str = "fk_tasks_user";
pub const FK_TASKS_METRIC: &str = "fk_tasks_metric";
pub const FK_STATISTICS_USER: &str = "fk_statistics_user";
pub const FK_STATISTICS_METRIC: &str = "fk_statistics_metric";

/// Version 1: every table with its delete policy
pub const INITIAL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id            BIGSERIAL PRIMARY KEY,
    email         TEXT NOT NULL,
    full_name     TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    CONSTRAINT uq_admins_email UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS departments (
    id       BIGSERIAL PRIMARY KEY,
    name     TEXT NOT NULL,
    admin_id BIGINT NOT NULL,
    CONSTRAINT uq_departments_name UNIQUE (name),
    CONSTRAINT fk_departments_admin FOREIGN KEY (admin_id)
        REFERENCES admins (id) ON DELETE RESTRICT
);

CREATE TABLE IF NOT EXISTS reviewers (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    metrics     JSONB
);

CREATE TABLE IF NOT EXISTS jobs (
    id            BIGSERIAL PRIMARY KEY,
    name          TEXT NOT NULL,
    department_id BIGINT NOT NULL,
    reviewer_id   BIGINT,
    CONSTRAINT fk_jobs_department FOREIGN KEY (department_id)
        REFERENCES departments (id) ON DELETE CASCADE,
    CONSTRAINT fk_jobs_reviewer FOREIGN KEY (reviewer_id)
        REFERENCES reviewers (id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS users (
    id     BIGSERIAL PRIMARY KEY,
    name   TEXT NOT NULL,
    job_id BIGINT NOT NULL,
    CONSTRAINT fk_users_job FOREIGN KEY (job_id)
        REFERENCES jobs (id) ON DELETE RESTRICT
);

CREATE TABLE IF NOT EXISTS metrics (
    id   BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    cost BIGINT NOT NULL,
    CONSTRAINT uq_metrics_name UNIQUE (name)
);

CREATE TABLE IF NOT EXISTS tasks (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT NOT NULL,
    date        DATE NOT NULL,
    description TEXT NOT NULL,
    metric_id   BIGINT,
    CONSTRAINT fk_tasks_user FOREIGN KEY (user_id)
        REFERENCES users (id) ON DELETE CASCADE,
    CONSTRAINT fk_tasks_metric FOREIGN KEY (metric_id)
        REFERENCES metrics (id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS statistics (
    id        BIGSERIAL PRIMARY KEY,
    date      DATE NOT NULL,
    user_id   BIGINT NOT NULL,
    metric_id BIGINT NOT NULL,
    value     BIGINT NOT NULL,
    CONSTRAINT uq_statistics_date_user_metric UNIQUE (date, user_id, metric_id),
    CONSTRAINT fk_statistics_user FOREIGN KEY (user_id)
        REFERENCES users (id) ON DELETE CASCADE,
    CONSTRAINT fk_statistics_metric FOREIGN KEY (metric_id)
        REFERENCES metrics (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_departments_admin_id ON departments (admin_id);
CREATE INDEX IF NOT EXISTS idx_jobs_department_id ON jobs (department_id);
CREATE INDEX IF NOT EXISTS idx_users_job_id ON users (job_id);
CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks (user_id);
CREATE INDEX IF NOT EXISTS idx_statistics_user_id ON statistics (user_id);
"#;

/// Users go with their job instead of blocking its delete
pub const CASCADE_USERS_ON_JOB_DELETE: &str = r#"
ALTER TABLE users DROP CONSTRAINT IF EXISTS fk_users_job;
ALTER TABLE users ADD CONSTRAINT fk_users_job FOREIGN KEY (job_id)
    REFERENCES jobs (id) ON DELETE CASCADE;
"#;

/// Client-facing message for a violated unique constraint
pub fn unique_violation_message(constraint: &str) -> String {
    match constraint {
        UQ_ADMINS_EMAIL => "Admin with this email already exists".to_string(),
        UQ_DEPARTMENTS_NAME => "Department with this name already exists".to_string(),
        UQ_METRICS_NAME => "Metric with this name already exists".to_string(),
        UQ_STATISTICS_DATE_USER_METRIC => {
            "Statistic for this date, user and metric already exists".to_string()
        }
        other => format!("Duplicate value violates {}", other),
    }
}

/// Client-facing message for a violated foreign key.
///
/// Only `fk_departments_admin` (RESTRICT) can fail on delete; the rest fail
/// when a write points at a row that no longer exists.
pub fn foreign_key_violation_message(constraint: &str) -> String {
    match constraint {
        FK_DEPARTMENTS_ADMIN => "Cannot delete admin with assigned departments".to_string(),
        FK_USERS_JOB => "Referenced job does not exist".to_string(),
        FK_JOBS_DEPARTMENT => "Referenced department does not exist".to_string(),
        FK_JOBS_REVIEWER => "Referenced reviewer does not exist".to_string(),
        FK_TASKS_USER | FK_STATISTICS_USER => "Referenced user does not exist".to_string(),
        FK_TASKS_METRIC | FK_STATISTICS_METRIC => {
            "Referenced metric does not exist".to_string()
        }
        other => format!("Reference violates {}", other),
    }
}
