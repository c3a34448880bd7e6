//! Product entity.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::Money;

/// A product in the catalog. Atomic, no children.
///
/// Orders snapshot the product's name and price into their items; they never
/// hold a live reference to a `Product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
}

impl Product {
    /// Creates a new product, failing on an empty id or name or a negative
    /// price.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Self, ValidationError> {
        let product = Self {
            id: id.into(),
            name: name.into(),
            price,
        };
        product.validate()?;
        Ok(product)
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
        Ok(())
    }

    /// Renames the product and re-validates.
    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = name.into();
        self.validate()
    }

    /// Reprices the product and re-validates.
    pub fn change_price(&mut self, price: Money) -> Result<(), ValidationError> {
        self.price = price;
        self.validate()
    }

    /// Returns the product ID.
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current price.
    pub fn price(&self) -> Money {
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        let result = Product::new("", "Product 1", Money::from_cents(1000));
        assert!(matches!(result, Err(ValidationError::IdRequired)));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = Product::new("123", "", Money::from_cents(1000));
        assert!(matches!(result, Err(ValidationError::NameRequired)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = Product::new("123", "Product 1", Money::from_cents(-100));
        assert!(matches!(result, Err(ValidationError::NegativePrice)));
    }

    #[test]
    fn zero_price_is_allowed() {
        let product = Product::new("123", "Sample", Money::zero()).unwrap();
        assert_eq!(product.price().cents(), 0);
    }

    #[test]
    fn change_name() {
        let mut product = Product::new("123", "Product 1", Money::from_cents(1000)).unwrap();

        product.change_name("Product 2").unwrap();
        assert_eq!(product.name(), "Product 2");

        let result = product.change_name("");
        assert!(matches!(result, Err(ValidationError::NameRequired)));
    }

    #[test]
    fn change_price() {
        let mut product = Product::new("123", "Product 1", Money::from_cents(1000)).unwrap();

        product.change_price(Money::from_cents(1500)).unwrap();
        assert_eq!(product.price().cents(), 1500);

        let result = product.change_price(Money::from_cents(-1));
        assert!(matches!(result, Err(ValidationError::NegativePrice)));
    }
}
