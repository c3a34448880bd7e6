//! Persistence layer for the order management system.
//!
//! Repositories translate aggregates to and from persisted rows, preserving
//! the aggregates' invariants across process restarts. The interesting part
//! is the order repository's update reconciliation: the in-memory aggregate
//! does not track removed items, so an update atomically replaces every
//! persisted item row and rewrites the denormalized total inside a single
//! transaction.
//!
//! Two interchangeable backends implement the same port traits: an
//! in-memory one for tests and a PostgreSQL one for real storage.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod rows;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository};
pub use postgres::{
    PgCustomerRepository, PgOrderRepository, PgProductRepository, run_migrations,
};
pub use repository::{CustomerRepository, OrderRepository, ProductRepository};
