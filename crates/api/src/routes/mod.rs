//! HTTP route handlers.

pub mod articles;
pub mod health;
pub mod metrics;
pub mod purchase;
