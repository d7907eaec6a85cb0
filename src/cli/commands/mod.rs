pub mod admin;
pub mod migrate;
pub mod reviewer;
pub mod serve;
pub mod token;
