//! Customer aggregate implementation.

use common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ValidationError};
use crate::event::{EventDispatcher, EventEnvelope};
use crate::value_objects::Address;

use super::events::{CustomerEvent, CustomerSnapshot};

/// Customer aggregate root.
///
/// Invariants: id and name are non-empty at all times, and activation
/// requires an address. Every constructor and mutator that could violate an
/// invariant re-runs validation and fails fast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    address: Option<Address>,
    active: bool,
    reward_points: u64,
}

impl Customer {
    /// Creates a new inactive customer with no address and zero reward
    /// points.
    ///
    /// Emits exactly one `CustomerCreated` notification per registered
    /// handler, in registration order, before returning. A handler failure
    /// propagates and the customer is not constructed.
    pub fn new(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        events: &EventDispatcher<CustomerEvent>,
    ) -> Result<Self, DomainError> {
        let customer = Self {
            id: id.into(),
            name: name.into(),
            address: None,
            active: false,
            reward_points: 0,
        };
        customer.validate()?;

        let created = CustomerEvent::created(customer.id.clone(), customer.name.clone());
        events
            .notify(&EventEnvelope::new(created))
            .map_err(DomainError::Handler)?;

        Ok(customer)
    }

    /// Rebuilds a customer from persisted state.
    ///
    /// Re-runs invariant validation so corrupted storage fails loudly;
    /// emits nothing.
    pub fn from_stored(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        address: Option<Address>,
        active: bool,
        reward_points: u64,
    ) -> Result<Self, ValidationError> {
        let customer = Self {
            id: id.into(),
            name: name.into(),
            address,
            active,
            reward_points,
        };
        customer.validate()?;
        Ok(customer)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::IdRequired);
        }
        if self.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        Ok(())
    }

    /// Renames the customer and re-validates.
    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = name.into();
        self.validate()
    }

    /// Sets the address without announcing the change.
    pub fn set_address(&mut self, address: Address) {
        self.address = Some(address);
    }

    /// Sets the address and emits one `CustomerAddressChanged` notification
    /// per registered handler, carrying the full new customer state.
    pub fn change_address(
        &mut self,
        address: Address,
        events: &EventDispatcher<CustomerEvent>,
    ) -> Result<(), DomainError> {
        self.address = Some(address);

        let changed = CustomerEvent::address_changed(self.snapshot());
        events
            .notify(&EventEnvelope::new(changed))
            .map_err(DomainError::Handler)
    }

    /// Activates the customer. Fails when no address has been set.
    pub fn activate(&mut self) -> Result<(), ValidationError> {
        if self.address.is_none() {
            return Err(ValidationError::AddressMandatory);
        }
        self.active = true;
        Ok(())
    }

    /// Deactivates the customer.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Adds reward points. The balance only grows; there is no upper bound.
    pub fn add_reward_points(&mut self, points: u64) {
        self.reward_points += points;
    }

    /// Returns the customer ID.
    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    /// Returns the customer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the address, if one has been set.
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Returns true if the customer is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the reward point balance.
    pub fn reward_points(&self) -> u64 {
        self.reward_points
    }

    /// Returns a point-in-time copy of the customer's state.
    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            active: self.active,
            reward_points: self.reward_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::error::HandlerError;
    use crate::event::EventHandler;

    use super::*;

    fn dispatcher() -> EventDispatcher<CustomerEvent> {
        EventDispatcher::new()
    }

    /// Records every delivered event for later assertions.
    struct Recording {
        label: &'static str,
        seen: Arc<Mutex<Vec<(String, CustomerEvent)>>>,
    }

    impl EventHandler<CustomerEvent> for Recording {
        fn handle(&self, event: &EventEnvelope<CustomerEvent>) -> Result<(), HandlerError> {
            self.seen
                .lock()
                .unwrap()
                .push((self.label.to_string(), event.payload.clone()));
            Ok(())
        }
    }

    fn recording(
        label: &'static str,
        seen: &Arc<Mutex<Vec<(String, CustomerEvent)>>>,
    ) -> Arc<dyn EventHandler<CustomerEvent>> {
        Arc::new(Recording {
            label,
            seen: Arc::clone(seen),
        })
    }

    struct Failing;

    impl EventHandler<CustomerEvent> for Failing {
        fn handle(&self, _event: &EventEnvelope<CustomerEvent>) -> Result<(), HandlerError> {
            Err("observer failure".into())
        }
    }

    #[test]
    fn empty_id_is_rejected() {
        let events = dispatcher();
        let result = Customer::new("", "John", &events);
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::IdRequired))
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let events = dispatcher();
        let result = Customer::new("123", "", &events);
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::NameRequired))
        ));
    }

    #[test]
    fn change_name() {
        let events = dispatcher();
        let mut customer = Customer::new("123", "John", &events).unwrap();

        customer.change_name("Jane").unwrap();

        assert_eq!(customer.name(), "Jane");
    }

    #[test]
    fn change_name_to_empty_fails() {
        let events = dispatcher();
        let mut customer = Customer::new("123", "John", &events).unwrap();

        let result = customer.change_name("");

        assert!(matches!(result, Err(ValidationError::NameRequired)));
    }

    #[test]
    fn activate_with_address() {
        let events = dispatcher();
        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();
        customer.set_address(Address::new("Street 1", 123, "13330-250", "São Paulo").unwrap());

        customer.activate().unwrap();

        assert!(customer.is_active());
    }

    #[test]
    fn activate_without_address_fails() {
        let events = dispatcher();
        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();

        let result = customer.activate();

        assert!(matches!(result, Err(ValidationError::AddressMandatory)));
        assert!(!customer.is_active());
    }

    #[test]
    fn deactivate() {
        let events = dispatcher();
        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();

        customer.deactivate();

        assert!(!customer.is_active());
    }

    #[test]
    fn reward_points_accumulate() {
        let events = dispatcher();
        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();
        assert_eq!(customer.reward_points(), 0);

        customer.add_reward_points(10);
        assert_eq!(customer.reward_points(), 10);

        customer.add_reward_points(10);
        assert_eq!(customer.reward_points(), 20);
    }

    #[test]
    fn construction_notifies_created_handlers_in_order() {
        let events = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        events.register("CustomerCreated", recording("first", &seen));
        events.register("CustomerCreated", recording("second", &seen));

        Customer::new("1", "Customer 1", &events).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
        for (_, event) in seen.iter() {
            match event {
                CustomerEvent::CustomerCreated(data) => {
                    assert_eq!(data.id.as_str(), "1");
                    assert_eq!(data.name, "Customer 1");
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn construction_does_not_notify_address_changed_handlers() {
        let events = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        events.register("CustomerAddressChanged", recording("addr", &seen));

        Customer::new("1", "Customer 1", &events).unwrap();

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn change_address_notifies_with_new_address() {
        let events = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        events.register("CustomerAddressChanged", recording("addr", &seen));

        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();
        customer
            .change_address(
                Address::new("Street 1", 123, "13330-250", "São Paulo").unwrap(),
                &events,
            )
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        match &seen[0].1 {
            CustomerEvent::CustomerAddressChanged(snapshot) => {
                assert_eq!(snapshot.id.as_str(), "1");
                assert_eq!(snapshot.name, "Customer 1");
                let address = snapshot.address.as_ref().unwrap();
                assert_eq!(address.street(), "Street 1");
                assert_eq!(address.number(), 123);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn handler_failure_aborts_construction() {
        let events = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        events.register("CustomerCreated", Arc::new(Failing));
        events.register("CustomerCreated", recording("after", &seen));

        let result = Customer::new("1", "Customer 1", &events);

        assert!(matches!(result, Err(DomainError::Handler(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn set_address_is_silent() {
        let events = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        events.register("CustomerAddressChanged", recording("addr", &seen));

        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();
        customer.set_address(Address::new("Street 1", 1, "Zipcode 1", "City 1").unwrap());

        assert!(seen.lock().unwrap().is_empty());
        assert!(customer.address().is_some());
    }

    #[test]
    fn from_stored_revalidates() {
        let result = Customer::from_stored("", "John", None, false, 0);
        assert!(matches!(result, Err(ValidationError::IdRequired)));

        let customer = Customer::from_stored(
            "1",
            "Customer 1",
            Some(Address::new("Street 1", 1, "Zipcode 1", "City 1").unwrap()),
            true,
            25,
        )
        .unwrap();
        assert!(customer.is_active());
        assert_eq!(customer.reward_points(), 25);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let events = dispatcher();
        let mut customer = Customer::new("1", "Customer 1", &events).unwrap();
        customer.add_reward_points(5);

        let snapshot = customer.snapshot();

        assert_eq!(snapshot.id.as_str(), "1");
        assert_eq!(snapshot.name, "Customer 1");
        assert_eq!(snapshot.reward_points, 5);
        assert!(snapshot.address.is_none());
        assert!(!snapshot.active);
    }
}
