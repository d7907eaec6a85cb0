pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{CurrentAdmin, MaybeAdmin};
pub use extract::{EntityId, ValidJson};
pub use response::{ApiResponse, ApiResult};
