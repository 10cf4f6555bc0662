//! API handlers.

pub mod health;
pub mod plan_changes;
