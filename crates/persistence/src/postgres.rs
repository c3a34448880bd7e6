//! PostgreSQL-backed repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Order, Product};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    RepositoryError, Result,
    repository::{CustomerRepository, OrderRepository, ProductRepository},
    rows::{self, CustomerRow, OrderItemRow, OrderRow, ProductRow},
};

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL-backed order repository.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_order(row: PgRow) -> Result<OrderRow> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            total: row.try_get("total")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<OrderItemRow> {
        Ok(OrderItemRow {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn create(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = OrderRow::from_order(order);
        sqlx::query("INSERT INTO orders (id, customer_id, total) VALUES ($1, $2, $3)")
            .bind(&row.id)
            .bind(&row.customer_id)
            .bind(row.total)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict {
                        entity: "order",
                        id: row.id.clone(),
                    };
                }
                RepositoryError::Persistence(e)
            })?;

        for item in order.items() {
            let item_row = OrderItemRow::from_item(order.id().as_str(), item);
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, name, price, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&item_row.id)
            .bind(&item_row.order_id)
            .bind(&item_row.product_id)
            .bind(&item_row.name)
            .bind(item_row.price)
            .bind(item_row.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        metrics::counter!("orders_persisted_total").increment(1);
        Ok(())
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn update(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Lock the root row; a missing id fails before any child rows are
        // touched, and concurrent replacements of the same order serialize.
        let existing = sqlx::query("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order.id().as_str())
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "order",
                id: order.id().to_string(),
            });
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order.id().as_str())
            .execute(&mut *tx)
            .await?;

        for item in order.items() {
            let item_row = OrderItemRow::from_item(order.id().as_str(), item);
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, name, price, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&item_row.id)
            .bind(&item_row.order_id)
            .bind(&item_row.product_id)
            .bind(&item_row.name)
            .bind(item_row.price)
            .bind(item_row.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE orders SET total = $1 WHERE id = $2")
            .bind(order.total().cents())
            .bind(order.id().as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        metrics::counter!("orders_reconciled_total").increment(1);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &OrderId) -> Result<Order> {
        let order_row = sqlx::query("SELECT id, customer_id, total FROM orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_order)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "order",
                id: id.to_string(),
            })?;

        let items = sqlx::query(
            "SELECT id, order_id, product_id, name, price, quantity \
             FROM order_items WHERE order_id = $1 ORDER BY seq",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_item)
        .collect::<Result<Vec<_>>>()?;

        Ok(rows::order_from_rows(&order_row, &items)?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Order>> {
        let order_rows = sqlx::query("SELECT id, customer_id, total FROM orders ORDER BY seq")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Self::row_to_order)
            .collect::<Result<Vec<_>>>()?;

        let item_rows = sqlx::query(
            "SELECT id, order_id, product_id, name, price, quantity \
             FROM order_items ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_item)
        .collect::<Result<Vec<_>>>()?;

        let mut items_by_order: HashMap<String, Vec<OrderItemRow>> = HashMap::new();
        for item in item_rows {
            items_by_order
                .entry(item.order_id.clone())
                .or_default()
                .push(item);
        }

        let mut orders = Vec::with_capacity(order_rows.len());
        for order_row in &order_rows {
            let items = items_by_order.remove(&order_row.id).unwrap_or_default();
            orders.push(rows::order_from_rows(order_row, &items)?);
        }
        Ok(orders)
    }
}

/// PostgreSQL-backed customer repository.
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_customer(row: PgRow) -> Result<CustomerRow> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            zip: row.try_get("zip")?,
            city: row.try_get("city")?,
            active: row.try_get("active")?,
            reward_points: row.try_get("reward_points")?,
        })
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id()))]
    async fn create(&self, customer: &Customer) -> Result<()> {
        let row = CustomerRow::from_customer(customer);
        sqlx::query(
            "INSERT INTO customers (id, name, street, number, zip, city, active, reward_points) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.street)
        .bind(row.number)
        .bind(&row.zip)
        .bind(&row.city)
        .bind(row.active)
        .bind(row.reward_points)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict {
                    entity: "customer",
                    id: row.id.clone(),
                };
            }
            RepositoryError::Persistence(e)
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id()))]
    async fn update(&self, customer: &Customer) -> Result<()> {
        let row = CustomerRow::from_customer(customer);
        let updated = sqlx::query(
            "UPDATE customers SET name = $2, street = $3, number = $4, zip = $5, city = $6, \
             active = $7, reward_points = $8 WHERE id = $1",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.street)
        .bind(row.number)
        .bind(&row.zip)
        .bind(&row.city)
        .bind(row.active)
        .bind(row.reward_points)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                entity: "customer",
                id: row.id,
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &CustomerId) -> Result<Customer> {
        let row = sqlx::query(
            "SELECT id, name, street, number, zip, city, active, reward_points \
             FROM customers WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Self::row_to_customer)
        .transpose()?
        .ok_or_else(|| RepositoryError::NotFound {
            entity: "customer",
            id: id.to_string(),
        })?;

        Ok(rows::customer_from_row(&row)?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Customer>> {
        let customer_rows = sqlx::query(
            "SELECT id, name, street, number, zip, city, active, reward_points \
             FROM customers ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_customer)
        .collect::<Result<Vec<_>>>()?;

        let mut customers = Vec::with_capacity(customer_rows.len());
        for row in &customer_rows {
            customers.push(rows::customer_from_row(row)?);
        }
        Ok(customers)
    }
}

/// PostgreSQL-backed product repository.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Creates a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: PgRow) -> Result<ProductRow> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
        })
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    async fn create(&self, product: &Product) -> Result<()> {
        let row = ProductRow::from_product(product);
        sqlx::query("INSERT INTO products (id, name, price) VALUES ($1, $2, $3)")
            .bind(&row.id)
            .bind(&row.name)
            .bind(row.price)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict {
                        entity: "product",
                        id: row.id.clone(),
                    };
                }
                RepositoryError::Persistence(e)
            })?;
        Ok(())
    }

    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    async fn update(&self, product: &Product) -> Result<()> {
        let row = ProductRow::from_product(product);
        let updated = sqlx::query("UPDATE products SET name = $2, price = $3 WHERE id = $1")
            .bind(&row.id)
            .bind(&row.name)
            .bind(row.price)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                entity: "product",
                id: row.id,
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: &ProductId) -> Result<Product> {
        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_product)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "product",
                id: id.to_string(),
            })?;

        Ok(rows::product_from_row(&row)?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Product>> {
        let product_rows = sqlx::query("SELECT id, name, price FROM products ORDER BY seq")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Self::row_to_product)
            .collect::<Result<Vec<_>>>()?;

        let mut products = Vec::with_capacity(product_rows.len());
        for row in &product_rows {
            products.push(rows::product_from_row(row)?);
        }
        Ok(products)
    }
}
