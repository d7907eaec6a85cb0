pub mod gigachat;
pub mod reviewer;
pub mod scope;

pub use gigachat::{ChatClient, ChatCompletion, GigaChatClient, UpstreamError};
pub use reviewer::{ReviewerGenerator, StructuredReviewer};
pub use scope::{ensure_owned, require_metric, require_reviewer};
