//! Order aggregate implementation.

use common::{CustomerId, OrderId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::Money;

use super::item::OrderItem;

/// Order aggregate root.
///
/// Owns its line items exclusively: items cannot outlive or be shared
/// outside their order, so the collection is only exposed as a slice.
/// Invariants: id and customer id are non-empty and the order carries at
/// least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates a new order, taking ownership of `items`.
    pub fn new(
        id: impl Into<OrderId>,
        customer_id: impl Into<CustomerId>,
        items: Vec<OrderItem>,
    ) -> Result<Self, ValidationError> {
        let order = Self {
            id: id.into(),
            customer_id: customer_id.into(),
            items,
        };
        order.validate()?;
        Ok(order)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if self.customer_id.is_empty() {
            return Err(ValidationError::CustomerIdRequired);
        }
        if self.items.is_empty() {
            return Err(ValidationError::ItemsRequired);
        }
        Ok(())
    }

    /// Appends an item and re-validates the aggregate.
    pub fn add_item(&mut self, item: OrderItem) -> Result<(), ValidationError> {
        self.items.push(item);
        self.validate()
    }

    /// Returns the sum of item subtotals.
    ///
    /// Recomputed from the items on every call; never cached or stored
    /// independently of them.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// Returns the order ID.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Returns the ID of the customer who placed the order.
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Returns the owned line items, in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price_cents: i64, quantity: u32) -> OrderItem {
        OrderItem::new(
            id,
            format!("Product {id}"),
            Money::from_cents(price_cents),
            "123",
            quantity,
        )
        .unwrap()
    }

    #[test]
    fn empty_id_is_rejected() {
        let result = Order::new("", "123", vec![item("1", 1000, 2)]);
        assert!(matches!(result, Err(ValidationError::IdRequired)));
    }

    #[test]
    fn empty_customer_id_is_rejected() {
        let result = Order::new("123", "", vec![item("1", 1000, 2)]);
        assert!(matches!(result, Err(ValidationError::CustomerIdRequired)));
    }

    #[test]
    fn zero_items_is_rejected() {
        let result = Order::new("123", "123", Vec::new());
        assert!(matches!(result, Err(ValidationError::ItemsRequired)));
    }

    #[test]
    fn total_sums_item_subtotals() {
        let order = Order::new("123", "123", vec![item("1", 1000, 2), item("2", 500, 3)]).unwrap();
        assert_eq!(order.total().cents(), 3500);
    }

    #[test]
    fn add_item_increases_total_immediately() {
        let mut order = Order::new("123", "123", vec![item("1", 1000, 2)]).unwrap();
        assert_eq!(order.total().cents(), 2000);

        order.add_item(item("2", 2000, 5)).unwrap();

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total().cents(), 12000);
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut order = Order::new("123", "123", vec![item("1", 1000, 2)]).unwrap();
        order.add_item(item("2", 2000, 5)).unwrap();

        assert_eq!(order.items()[0].id().as_str(), "1");
        assert_eq!(order.items()[1].id().as_str(), "2");
    }

    #[test]
    fn serialization_roundtrip() {
        let order = Order::new("123", "123", vec![item("1", 1000, 2)]).unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, order);
        assert_eq!(deserialized.total().cents(), 2000);
    }
}
