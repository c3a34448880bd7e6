//! Domain layer for the order management system.
//!
//! This crate provides the core domain model:
//! - Self-validating value objects (`Address`, `Money`)
//! - Entities and aggregate roots (`Customer`, `Order` with its owned
//!   `OrderItem` children, `Product`) that enforce their invariants on
//!   construction and mutation
//! - A synchronous in-process event dispatcher that lets entities announce
//!   state transitions without coupling to the code that reacts to them

pub mod customer;
pub mod error;
pub mod event;
pub mod order;
pub mod product;
pub mod value_objects;

pub use customer::{
    Customer, CustomerCreatedData, CustomerEvent, CustomerSnapshot, LogCustomerAddressChanged,
    LogCustomerCreated,
};
pub use error::{DomainError, HandlerError, ValidationError};
pub use event::{DomainEvent, EventDispatcher, EventEnvelope, EventHandler, EventId};
pub use order::{Order, OrderItem};
pub use product::Product;
pub use value_objects::{Address, Money};
