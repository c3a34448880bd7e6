use common::{OrderItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::Money;

/// A line item owned exclusively by an [`Order`](super::Order).
///
/// `price` is a snapshot taken when the item entered the order, not a live
/// reference to the product; `product_id` is a plain reference, not an
/// ownership link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    name: String,
    price: Money,
    product_id: ProductId,
    quantity: u32,
}

impl OrderItem {
    /// Creates a new order item.
    ///
    /// Fails on an empty id or name, a negative price, or a zero quantity.
    pub fn new(
        id: impl Into<OrderItemId>,
        name: impl Into<String>,
        price: Money,
        product_id: impl Into<ProductId>,
        quantity: u32,
    ) -> Result<Self, ValidationError> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            price,
            product_id: product_id.into(),
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if self.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.price.is_negative() {
            return Err(ValidationError::NegativePrice);
        }
        if self.quantity == 0 {
            return Err(ValidationError::QuantityNotPositive);
        }
        Ok(())
    }

    /// Returns the item ID.
    pub fn id(&self) -> &OrderItemId {
        &self.id
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price snapshot.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the referenced product's ID.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        let result = OrderItem::new("", "Product 1", Money::from_cents(1000), "123", 2);
        assert!(matches!(result, Err(ValidationError::IdRequired)));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = OrderItem::new("1", "", Money::from_cents(1000), "123", 2);
        assert!(matches!(result, Err(ValidationError::NameRequired)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = OrderItem::new("1", "Product 1", Money::from_cents(-1), "123", 2);
        assert!(matches!(result, Err(ValidationError::NegativePrice)));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = OrderItem::new("1", "Product 1", Money::from_cents(1000), "123", 0);
        assert!(matches!(result, Err(ValidationError::QuantityNotPositive)));
    }

    #[test]
    fn zero_price_is_allowed() {
        let item = OrderItem::new("1", "Giveaway", Money::zero(), "123", 1).unwrap();
        assert_eq!(item.subtotal().cents(), 0);
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        let item = OrderItem::new("1", "Product 1", Money::from_cents(1000), "123", 2).unwrap();
        assert_eq!(item.subtotal().cents(), 2000);
    }
}
