//! Customer domain events.

use common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;
use crate::value_objects::Address;

/// Events emitted by the customer aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerEvent {
    /// A customer was created.
    CustomerCreated(CustomerCreatedData),

    /// A customer's address was changed.
    ///
    /// Carries the full customer state so handlers can read the new address.
    CustomerAddressChanged(CustomerSnapshot),
}

impl DomainEvent for CustomerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::CustomerCreated(_) => "CustomerCreated",
            CustomerEvent::CustomerAddressChanged(_) => "CustomerAddressChanged",
        }
    }
}

/// Data for the CustomerCreated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCreatedData {
    /// The new customer's ID.
    pub id: CustomerId,

    /// The new customer's name.
    pub name: String,
}

/// Point-in-time copy of a customer's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub name: String,
    pub address: Option<Address>,
    pub active: bool,
    pub reward_points: u64,
}

// Convenience constructors
impl CustomerEvent {
    /// Creates a CustomerCreated event.
    pub fn created(id: CustomerId, name: impl Into<String>) -> Self {
        CustomerEvent::CustomerCreated(CustomerCreatedData {
            id,
            name: name.into(),
        })
    }

    /// Creates a CustomerAddressChanged event.
    pub fn address_changed(snapshot: CustomerSnapshot) -> Self {
        CustomerEvent::CustomerAddressChanged(snapshot)
    }
}
