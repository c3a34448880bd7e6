//! Shared types for the order management system.

pub mod types;

pub use types::{CustomerId, OrderId, OrderItemId, ProductId};
