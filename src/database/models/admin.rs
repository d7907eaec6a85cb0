use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::not_blank;

/// Stored admin row. Never serialized directly: see [`AdminView`].
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Admin as returned over the API, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminView {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

impl From<Admin> for AdminView {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            full_name: admin.full_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminCreate {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Partial update; absent fields keep their stored value, and so does an
/// empty password
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUpdate {
    #[validate(custom(function = "not_blank"))]
    pub full_name: Option<String>,
    pub password: Option<String>,
}

impl AdminUpdate {
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
}
