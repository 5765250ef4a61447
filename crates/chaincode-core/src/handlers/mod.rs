//! Handlers for the chaincode operations.
//!
//! Each handler owns one operation: the liveness check and the order
//! store/read pair.

pub mod health;
pub mod order;

pub use health::HealthHandler;
pub use order::OrderHandler;
