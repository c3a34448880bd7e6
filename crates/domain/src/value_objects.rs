//! Value objects for the order management domain.

use std::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Money amount represented in cents to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * quantity as i64,
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), std::ops::Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dollars = (self.cents / 100).abs();
        let rem = (self.cents % 100).abs();
        if self.cents < 0 {
            write!(f, "-${dollars}.{rem:02}")
        } else {
            write!(f, "${dollars}.{rem:02}")
        }
    }
}

/// A customer's postal address.
///
/// Immutable once constructed; replacing a customer's address means
/// constructing a new value. Validation happens in the constructor, so an
/// `Address` in hand is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    street: String,
    number: i32,
    zip: String,
    city: String,
}

impl Address {
    /// Creates a new address, failing when street, zip, or city is empty.
    pub fn new(
        street: impl Into<String>,
        number: i32,
        zip: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let address = Self {
            street: street.into(),
            number,
            zip: zip.into(),
            city: city.into(),
        };
        address.validate()?;
        Ok(address)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.street.is_empty() {
            return Err(ValidationError::StreetRequired);
        }
        if self.zip.is_empty() {
            return Err(ValidationError::ZipRequired);
        }
        if self.city.is_empty() {
            return Err(ValidationError::CityRequired);
        }
        Ok(())
    }

    /// Returns the street name.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Returns the street number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Returns the zip code.
    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// Returns the city name.
    pub fn city(&self) -> &str {
        &self.city
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.number, self.zip, self.city)
    }
}
