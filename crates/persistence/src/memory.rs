//! In-memory repository implementations for testing.
//!
//! These store the same flat rows as the PostgreSQL backend and provide the
//! same interface and error behavior. Each repository keeps its tables
//! behind one `RwLock`, so an update's delete+insert+total rewrite happens
//! under a single write guard and is atomic from any reader's point of view.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Order, Product};
use tokio::sync::RwLock;

use crate::{
    RepositoryError, Result,
    repository::{CustomerRepository, OrderRepository, ProductRepository},
    rows::{self, CustomerRow, OrderItemRow, OrderRow, ProductRow},
};

#[derive(Default)]
struct OrderTables {
    /// Order rows in insertion order.
    orders: Vec<OrderRow>,
    /// Item rows in insertion order.
    order_items: Vec<OrderItemRow>,
}

/// In-memory order repository.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    tables: Arc<RwLock<OrderTables>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted order rows.
    pub async fn order_row_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the number of persisted item rows across all orders.
    pub async fn item_row_count(&self) -> usize {
        self.tables.read().await.order_items.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables.orders.iter().any(|row| row.id == order.id().as_str()) {
            return Err(RepositoryError::Conflict {
                entity: "order",
                id: order.id().to_string(),
            });
        }

        tables.orders.push(OrderRow::from_order(order));
        for item in order.items() {
            tables
                .order_items
                .push(OrderItemRow::from_item(order.id().as_str(), item));
        }
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let mut tables = self.tables.write().await;
        let id = order.id().as_str();

        if !tables.orders.iter().any(|row| row.id == id) {
            return Err(RepositoryError::NotFound {
                entity: "order",
                id: order.id().to_string(),
            });
        }

        // Replace-all-children under the same write guard: delete, insert,
        // rewrite the denormalized total.
        tables.order_items.retain(|item| item.order_id != id);
        for item in order.items() {
            tables.order_items.push(OrderItemRow::from_item(id, item));
        }
        if let Some(row) = tables.orders.iter_mut().find(|row| row.id == id) {
            row.total = order.total().cents();
        }
        Ok(())
    }

    async fn find(&self, id: &OrderId) -> Result<Order> {
        let tables = self.tables.read().await;

        let order_row = tables
            .orders
            .iter()
            .find(|row| row.id == id.as_str())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "order",
                id: id.to_string(),
            })?;

        let items: Vec<OrderItemRow> = tables
            .order_items
            .iter()
            .filter(|item| item.order_id == id.as_str())
            .cloned()
            .collect();

        Ok(rows::order_from_rows(order_row, &items)?)
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;

        let mut orders = Vec::with_capacity(tables.orders.len());
        for order_row in &tables.orders {
            let items: Vec<OrderItemRow> = tables
                .order_items
                .iter()
                .filter(|item| item.order_id == order_row.id)
                .cloned()
                .collect();
            orders.push(rows::order_from_rows(order_row, &items)?);
        }
        Ok(orders)
    }
}

/// In-memory customer repository.
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<Vec<CustomerRow>>>,
}

impl InMemoryCustomerRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write().await;

        if customers.iter().any(|row| row.id == customer.id().as_str()) {
            return Err(RepositoryError::Conflict {
                entity: "customer",
                id: customer.id().to_string(),
            });
        }

        customers.push(CustomerRow::from_customer(customer));
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write().await;

        let Some(row) = customers
            .iter_mut()
            .find(|row| row.id == customer.id().as_str())
        else {
            return Err(RepositoryError::NotFound {
                entity: "customer",
                id: customer.id().to_string(),
            });
        };

        *row = CustomerRow::from_customer(customer);
        Ok(())
    }

    async fn find(&self, id: &CustomerId) -> Result<Customer> {
        let customers = self.customers.read().await;

        let row = customers
            .iter()
            .find(|row| row.id == id.as_str())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "customer",
                id: id.to_string(),
            })?;

        Ok(rows::customer_from_row(row)?)
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        customers
            .iter()
            .map(|row| rows::customer_from_row(row).map_err(RepositoryError::from))
            .collect()
    }
}

/// In-memory product repository.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<ProductRow>>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> Result<()> {
        let mut products = self.products.write().await;

        if products.iter().any(|row| row.id == product.id().as_str()) {
            return Err(RepositoryError::Conflict {
                entity: "product",
                id: product.id().to_string(),
            });
        }

        products.push(ProductRow::from_product(product));
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<()> {
        let mut products = self.products.write().await;

        let Some(row) = products
            .iter_mut()
            .find(|row| row.id == product.id().as_str())
        else {
            return Err(RepositoryError::NotFound {
                entity: "product",
                id: product.id().to_string(),
            });
        };

        *row = ProductRow::from_product(product);
        Ok(())
    }

    async fn find(&self, id: &ProductId) -> Result<Product> {
        let products = self.products.read().await;

        let row = products
            .iter()
            .find(|row| row.id == id.as_str())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "product",
                id: id.to_string(),
            })?;

        Ok(rows::product_from_row(row)?)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        products
            .iter()
            .map(|row| rows::product_from_row(row).map_err(RepositoryError::from))
            .collect()
    }
}
