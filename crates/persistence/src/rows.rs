//! Row shapes for the storage contract and aggregate ↔ row mapping.
//!
//! Both backends persist the same flat rows and share the mapping functions
//! below. Reads rebuild aggregates through their validating constructors, so
//! a corrupted row set fails with a validation error rather than producing a
//! broken aggregate.

use domain::{Address, Customer, Money, Order, OrderItem, Product, ValidationError};

/// Persisted order row.
///
/// `total` is denormalized from the in-memory aggregate at write time for
/// read efficiency; it is never trusted as the source of truth, and every
/// reconstruction recomputes the total from the item rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: String,
    pub customer_id: String,
    pub total: i64,
}

/// Persisted order item row, owned by its order via `order_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRow {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
}

/// Persisted customer row. Address columns are null until an address is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub street: Option<String>,
    pub number: Option<i32>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub reward_points: i64,
}

/// Persisted product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: i64,
}

impl OrderRow {
    /// Maps an order aggregate to its row, computing the denormalized total.
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            total: order.total().cents(),
        }
    }
}

impl OrderItemRow {
    /// Maps one owned item to its row.
    pub fn from_item(order_id: &str, item: &OrderItem) -> Self {
        Self {
            id: item.id().to_string(),
            order_id: order_id.to_string(),
            product_id: item.product_id().to_string(),
            name: item.name().to_string(),
            price: item.price().cents(),
            quantity: item.quantity() as i32,
        }
    }
}

impl CustomerRow {
    /// Maps a customer aggregate to its row.
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            street: customer.address().map(|a| a.street().to_string()),
            number: customer.address().map(Address::number),
            zip: customer.address().map(|a| a.zip().to_string()),
            city: customer.address().map(|a| a.city().to_string()),
            active: customer.is_active(),
            reward_points: customer.reward_points() as i64,
        }
    }
}

impl ProductRow {
    /// Maps a product to its row.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            price: product.price().cents(),
        }
    }
}

/// Rebuilds an order aggregate from its rows.
///
/// Item rows must already be in insertion order. Reconstruction re-validates
/// every invariant, so an order row with zero item rows fails with
/// `Items are required`.
pub fn order_from_rows(
    order: &OrderRow,
    items: &[OrderItemRow],
) -> std::result::Result<Order, ValidationError> {
    let mut rebuilt = Vec::with_capacity(items.len());
    for row in items {
        let quantity =
            u32::try_from(row.quantity).map_err(|_| ValidationError::QuantityNotPositive)?;
        rebuilt.push(OrderItem::new(
            row.id.as_str(),
            row.name.as_str(),
            Money::from_cents(row.price),
            row.product_id.as_str(),
            quantity,
        )?);
    }
    Order::new(order.id.as_str(), order.customer_id.as_str(), rebuilt)
}

/// Rebuilds a customer from its row, re-running invariant validation.
///
/// The address is rebuilt only when every address column is present; a
/// partially-null address is treated as corrupt and fails through the
/// address constructor.
pub fn customer_from_row(row: &CustomerRow) -> std::result::Result<Customer, ValidationError> {
    let address = match (&row.street, row.number, &row.zip, &row.city) {
        (None, None, None, None) => None,
        (street, number, zip, city) => Some(Address::new(
            street.as_deref().unwrap_or_default(),
            number.unwrap_or_default(),
            zip.as_deref().unwrap_or_default(),
            city.as_deref().unwrap_or_default(),
        )?),
    };
    let reward_points =
        u64::try_from(row.reward_points).map_err(|_| ValidationError::NegativeRewardPoints)?;
    Customer::from_stored(
        row.id.as_str(),
        row.name.as_str(),
        address,
        row.active,
        reward_points,
    )
}

/// Rebuilds a product from its row, re-running invariant validation.
pub fn product_from_row(row: &ProductRow) -> std::result::Result<Product, ValidationError> {
    Product::new(
        row.id.as_str(),
        row.name.as_str(),
        Money::from_cents(row.price),
    )
}
