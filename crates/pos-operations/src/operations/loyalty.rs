use pos_core::{CardNumber, CustomerId, LoyaltyCard, validate_discount_bps};
use tracing::info;

use crate::traits::{Clock, Ledger};
use crate::{OperationError, Result};

pub struct LoyaltyOperation<L, C> {
    ledger: L,
    clock: C,
}

impl<L, C> LoyaltyOperation<L, C>
where
    L: Ledger,
    C: Clock,
{
    pub fn new(ledger: L, clock: C) -> Self {
        Self { ledger, clock }
    }

    /// Issues a card to a customer who has no active card yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount rate is over 100%, the customer is
    /// unknown, already holds an active card, or the card number is taken.
    pub fn issue(
        &self,
        number: CardNumber,
        customer: CustomerId,
        discount_bps: u32,
    ) -> Result<LoyaltyCard> {
        let card = LoyaltyCard {
            number,
            customer_id: customer,
            discount_bps: validate_discount_bps(discount_bps)?,
            points: 0,
            issued_at: self.clock.now(),
            active: true,
        };

        self.ledger.transaction(|session| {
            if session.find_customer(&card.customer_id)?.is_none() {
                return Err(OperationError::UnknownCustomer(card.customer_id.clone()));
            }
            if session
                .find_active_card_for_customer(&card.customer_id)?
                .is_some()
            {
                return Err(OperationError::DuplicateActiveCard(
                    card.customer_id.clone(),
                ));
            }
            if session.find_card(&card.number)?.is_some() {
                return Err(OperationError::AlreadyExists {
                    kind: "loyalty card",
                    id: card.number.to_string(),
                });
            }
            session.insert_card(&card)?;
            Ok(())
        })?;

        info!(card = %card.number, customer = %card.customer_id, "loyalty card issued");
        Ok(card)
    }

    /// # Errors
    ///
    /// Returns [`OperationError::CardNotFound`] if no such card exists.
    pub fn card(&self, number: &CardNumber) -> Result<LoyaltyCard> {
        self.ledger.read(|session| {
            session
                .find_card(number)?
                .ok_or_else(|| OperationError::CardNotFound(number.clone()))
        })
    }

    /// # Errors
    ///
    /// Returns [`OperationError::CardNotFound`] or, for a card that is already
    /// inactive, [`OperationError::CardInactive`].
    pub fn deactivate(&self, number: &CardNumber) -> Result<LoyaltyCard> {
        let card = self.ledger.transaction(|session| {
            let card = session
                .find_card(number)?
                .ok_or_else(|| OperationError::CardNotFound(number.clone()))?;
            if session.deactivate_card(number)? == 0 {
                return Err(OperationError::CardInactive(number.clone()));
            }
            Ok(LoyaltyCard {
                active: false,
                ..card
            })
        })?;

        info!(card = %number, "loyalty card deactivated");
        Ok(card)
    }
}
