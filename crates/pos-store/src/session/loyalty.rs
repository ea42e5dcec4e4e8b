use diesel::prelude::*;
use pos_core::{CardNumber, CustomerId, LoyaltyCard};

use super::Session;
use crate::Result;
use crate::models::LoyaltyCardRow;
use crate::schema::loyalty_cards;

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the customer
    /// already holds an active card.
    pub fn insert_loyalty_card(&mut self, card: &LoyaltyCard) -> Result<usize> {
        let row = LoyaltyCardRow::try_from(card)?;
        Ok(diesel::insert_into(loyalty_cards::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_loyalty_card(&mut self, number: &CardNumber) -> Result<Option<LoyaltyCard>> {
        let row: Option<LoyaltyCardRow> = loyalty_cards::table
            .find(number.as_str())
            .select(LoyaltyCardRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(LoyaltyCard::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_active_card_for_customer(
        &mut self,
        customer: &CustomerId,
    ) -> Result<Option<LoyaltyCard>> {
        let row: Option<LoyaltyCardRow> = loyalty_cards::table
            .filter(loyalty_cards::customer_id.eq(customer.as_str()))
            .filter(loyalty_cards::active.eq(true))
            .select(LoyaltyCardRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(LoyaltyCard::try_from).transpose()
    }

    /// Returns 0 when the card does not exist or is already inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn deactivate_loyalty_card(&mut self, number: &CardNumber) -> Result<usize> {
        Ok(diesel::update(
            loyalty_cards::table
                .filter(loyalty_cards::card_number.eq(number.as_str()))
                .filter(loyalty_cards::active.eq(true)),
        )
        .set(loyalty_cards::active.eq(false))
        .execute(self.conn())?)
    }

    /// Adds `points` to an active card. Returns 0 for unknown or inactive cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn add_loyalty_points(&mut self, number: &CardNumber, points: i64) -> Result<usize> {
        Ok(diesel::update(
            loyalty_cards::table
                .filter(loyalty_cards::card_number.eq(number.as_str()))
                .filter(loyalty_cards::active.eq(true)),
        )
        .set(loyalty_cards::points.eq(loyalty_cards::points + points))
        .execute(self.conn())?)
    }
}
