// handlers/mod.rs - HTTP handlers grouped by access tier
//
// Public (no credentials) → Protected (an authenticated admin, scoped to what it owns)

pub mod public;
pub mod protected;
