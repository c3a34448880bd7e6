use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Order, Product};

use crate::Result;

/// Persistence port for the Order aggregate.
///
/// Implementations must be thread-safe (Send + Sync) and safely composable
/// with concurrent callers operating on different order ids. Concurrent
/// writes to the *same* id are not coordinated: the last committed
/// transaction wins.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists the order row and all item rows in one atomic unit.
    ///
    /// Fails with `Conflict` when the order id is already persisted.
    async fn create(&self, order: &Order) -> Result<()>;

    /// Reconciles the persisted aggregate with `order` by replacing the
    /// child set wholesale.
    ///
    /// The in-memory aggregate does not track removed items, so within a
    /// single transaction the repository deletes every persisted item row
    /// for this order, inserts the current in-memory item set, and rewrites
    /// the denormalized total. A failure at any step rolls the transaction
    /// back: no caller ever observes a partially-replaced item set.
    ///
    /// Fails with `NotFound` when the order id was never persisted.
    async fn update(&self, order: &Order) -> Result<()>;

    /// Loads the order row and its item rows and rebuilds the aggregate
    /// through its validating constructor.
    ///
    /// Item prices are the persisted snapshots, never re-fetched from the
    /// product catalog. Fails with `NotFound` on a miss and with
    /// `Validation` when the stored rows violate the aggregate's invariants.
    async fn find(&self, id: &OrderId) -> Result<Order>;

    /// Loads every order, in insertion order, each rebuilt the same way as
    /// [`find`](OrderRepository::find).
    async fn find_all(&self) -> Result<Vec<Order>>;
}

/// Persistence port for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persists a new customer. Fails with `Conflict` on a duplicate id.
    async fn create(&self, customer: &Customer) -> Result<()>;

    /// Rewrites the persisted row from the in-memory state.
    /// Fails with `NotFound` when the customer was never persisted.
    async fn update(&self, customer: &Customer) -> Result<()>;

    /// Loads a customer, re-validating invariants on the way out.
    async fn find(&self, id: &CustomerId) -> Result<Customer>;

    /// Loads every customer, in insertion order.
    async fn find_all(&self) -> Result<Vec<Customer>>;
}

/// Persistence port for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists a new product. Fails with `Conflict` on a duplicate id.
    async fn create(&self, product: &Product) -> Result<()>;

    /// Rewrites the persisted row from the in-memory state.
    /// Fails with `NotFound` when the product was never persisted.
    async fn update(&self, product: &Product) -> Result<()>;

    /// Loads a product, re-validating invariants on the way out.
    async fn find(&self, id: &ProductId) -> Result<Product>;

    /// Loads every product, in insertion order.
    async fn find_all(&self) -> Result<Vec<Product>>;
}
