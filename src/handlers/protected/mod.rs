// handlers/protected/mod.rs - Protected handlers (authenticated admin required)
//
// Department, job, user, task and statistic rows are visible only to the admin
// owning the department above them; anything else is reported as not found.
// Admins, metrics and reviewers are global but still need an authenticated admin.

pub mod admins;
pub mod departments;
pub mod jobs;
pub mod metrics;
pub mod reviewers;
pub mod statistics;
pub mod tasks;
pub mod users;
