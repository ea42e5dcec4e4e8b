use pos_core::{Customer, CustomerId};
use serde::Deserialize;
use tracing::info;

use crate::traits::{Clock, Ledger};
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCustomer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Changes to a customer's contact details.
///
/// `None` leaves a field as it is; an empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn merge(current: Option<String>, update: Option<String>) -> Option<String> {
    match update {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value),
        None => current,
    }
}

pub struct CustomerOperation<L, C> {
    ledger: L,
    clock: C,
}

impl<L, C> CustomerOperation<L, C>
where
    L: Ledger,
    C: Clock,
{
    pub fn new(ledger: L, clock: C) -> Self {
        Self { ledger, clock }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::AlreadyExists`] if the id is taken.
    pub fn register(&self, new: NewCustomer) -> Result<Customer> {
        let customer = Customer {
            id: new.id,
            name: new.name.trim().to_string(),
            phone: merge(None, new.phone),
            email: merge(None, new.email),
            registered_at: self.clock.now(),
        };

        self.ledger.transaction(|session| {
            if session.find_customer(&customer.id)?.is_some() {
                return Err(OperationError::AlreadyExists {
                    kind: "customer",
                    id: customer.id.to_string(),
                });
            }
            session.insert_customer(&customer)?;
            Ok(())
        })?;

        info!(customer = %customer.id, "customer registered");
        Ok(customer)
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownCustomer`] if no such customer exists.
    pub fn customer(&self, id: &CustomerId) -> Result<Customer> {
        self.ledger.read(|session| {
            session
                .find_customer(id)?
                .ok_or_else(|| OperationError::UnknownCustomer(id.clone()))
        })
    }

    /// # Errors
    ///
    /// Returns an error if the customers cannot be read.
    pub fn customers(&self) -> Result<Vec<Customer>> {
        self.ledger.read(|session| session.list_customers())
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownCustomer`] if no such customer exists.
    pub fn update_contact(&self, id: &CustomerId, update: ContactUpdate) -> Result<Customer> {
        self.ledger.transaction(|session| {
            let current = session
                .find_customer(id)?
                .ok_or_else(|| OperationError::UnknownCustomer(id.clone()))?;
            let phone = merge(current.phone, update.phone);
            let email = merge(current.email, update.email);

            session.update_customer_contact(id, phone.as_deref(), email.as_deref())?;
            Ok(Customer {
                phone,
                email,
                ..current
            })
        })
    }
}
