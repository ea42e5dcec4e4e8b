use diesel::dsl::sum;
use diesel::prelude::*;
use pos_core::{OrderId, ReturnRecord};

use super::Session;
use crate::models::{ReturnRow, to_db_count};
use crate::schema::returns;
use crate::{Result, StoreError};

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails, for example when the order line
    /// does not exist.
    pub fn insert_return(&mut self, record: &ReturnRecord) -> Result<()> {
        let row = ReturnRow::try_from(record)?;
        diesel::insert_into(returns::table)
            .values(&row)
            .execute(self.conn())?;
        Ok(())
    }

    /// Total quantity already returned against one order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn returned_quantity(&mut self, order: &OrderId, line_no: u32) -> Result<u32> {
        let total: Option<i64> = returns::table
            .filter(returns::order_id.eq(order.as_str()))
            .filter(returns::line_no.eq(to_db_count(line_no)?))
            .select(sum(returns::quantity))
            .first(self.conn())?;

        let total = total.unwrap_or(0);
        u32::try_from(total).map_err(|_| StoreError::OutOfRange {
            table: "returns",
            column: "quantity",
            value: total,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_returns(&mut self, order: &OrderId) -> Result<Vec<ReturnRecord>> {
        let rows: Vec<ReturnRow> = returns::table
            .filter(returns::order_id.eq(order.as_str()))
            .order((returns::returned_at.asc(), returns::id.asc()))
            .select(ReturnRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(ReturnRecord::try_from).collect()
    }
}
