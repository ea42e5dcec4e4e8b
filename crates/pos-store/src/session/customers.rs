use diesel::prelude::*;
use pos_core::{Customer, CustomerId};

use super::Session;
use crate::Result;
use crate::models::CustomerRow;
use crate::schema::customers;

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails, for example on a duplicate id.
    pub fn insert_customer(&mut self, customer: &Customer) -> Result<usize> {
        let row = CustomerRow::from(customer);
        Ok(diesel::insert_into(customers::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>> {
        let row: Option<CustomerRow> = customers::table
            .find(id.as_str())
            .select(CustomerRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(Customer::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_customers(&mut self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = customers::table
            .order((customers::name.asc(), customers::id.asc()))
            .select(CustomerRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Replaces both contact fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_customer_contact(
        &mut self,
        id: &CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<usize> {
        Ok(diesel::update(customers::table.find(id.as_str()))
            .set((customers::phone.eq(phone), customers::email.eq(email)))
            .execute(self.conn())?)
    }
}
