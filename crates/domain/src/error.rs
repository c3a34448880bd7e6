//! Domain error types.

use thiserror::Error;

/// An entity invariant was violated during construction or mutation.
///
/// Validation failures are always synchronous, surface to the immediate
/// caller, and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entity identifier is empty.
    #[error("Id is required")]
    IdRequired,

    /// Entity name is empty.
    #[error("Name is required")]
    NameRequired,

    /// Order references no customer.
    #[error("CustomerId is required")]
    CustomerIdRequired,

    /// An order must carry at least one item.
    #[error("Items are required")]
    ItemsRequired,

    /// A customer cannot be activated without an address.
    #[error("Address is mandatory to activate a customer")]
    AddressMandatory,

    /// Address street is empty.
    #[error("Street is required")]
    StreetRequired,

    /// Address zip code is empty.
    #[error("Zip is required")]
    ZipRequired,

    /// Address city is empty.
    #[error("City is required")]
    CityRequired,

    /// Prices are never negative.
    #[error("Price must be greater than or equal to zero")]
    NegativePrice,

    /// Item quantities are strictly positive.
    #[error("Quantity must be greater than zero")]
    QuantityNotPositive,

    /// The reward point balance is never negative.
    #[error("Reward points must not be negative")]
    NegativeRewardPoints,
}

/// Error raised by an event handler.
///
/// Handlers are side-effect-only observers; whatever error a handler raises
/// propagates unwrapped to the caller of the operation that emitted the
/// event, and delivery to the remaining handlers is aborted.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An entity invariant was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An event handler failed while observing a state transition.
    ///
    /// Handlers already invoked before the failure are not undone.
    #[error("event handler failed: {0}")]
    Handler(HandlerError),
}
