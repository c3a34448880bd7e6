//! Stock observers for customer events.

use tracing::info;

use crate::error::HandlerError;
use crate::event::{EventEnvelope, EventHandler};

use super::events::CustomerEvent;

/// Logs every customer creation.
#[derive(Debug, Default)]
pub struct LogCustomerCreated;

impl EventHandler<CustomerEvent> for LogCustomerCreated {
    fn handle(&self, event: &EventEnvelope<CustomerEvent>) -> Result<(), HandlerError> {
        if let CustomerEvent::CustomerCreated(data) = &event.payload {
            info!(customer_id = %data.id, name = %data.name, "customer created");
        }
        Ok(())
    }
}

/// Logs the new address when a customer moves.
#[derive(Debug, Default)]
pub struct LogCustomerAddressChanged;

impl EventHandler<CustomerEvent> for LogCustomerAddressChanged {
    fn handle(&self, event: &EventEnvelope<CustomerEvent>) -> Result<(), HandlerError> {
        if let CustomerEvent::CustomerAddressChanged(snapshot) = &event.payload {
            let address = snapshot
                .address
                .as_ref()
                .ok_or("address changed event carried no address")?;
            info!(
                customer_id = %snapshot.id,
                name = %snapshot.name,
                address = %address,
                "customer address changed",
            );
        }
        Ok(())
    }
}
