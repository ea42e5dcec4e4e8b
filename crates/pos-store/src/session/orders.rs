use diesel::prelude::*;
use pos_core::{CustomerId, Order, OrderHeader, OrderId, OrderLine};

use super::Session;
use crate::Result;
use crate::models::{OrderLineRow, OrderRow};
use crate::schema::{order_lines, orders};

impl Session<'_> {
    /// Inserts an order header unless one with the same id already exists.
    ///
    /// Returns the number of rows written (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails, for example on a foreign key
    /// violation.
    pub fn insert_order_header(&mut self, header: &OrderHeader) -> Result<usize> {
        let row = OrderRow::from(header);
        Ok(diesel::insert_or_ignore_into(orders::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// Inserts an order line unless the `(order_id, line_no)` slot is taken.
    ///
    /// Returns the number of rows written (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn insert_order_line(&mut self, line: &OrderLine) -> Result<usize> {
        let row = OrderLineRow::try_from(line)?;
        Ok(diesel::insert_or_ignore_into(order_lines::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn find_order(&mut self, id: &OrderId) -> Result<Option<Order>> {
        let row: Option<OrderRow> = orders::table
            .find(id.as_str())
            .select(OrderRow::as_select())
            .first(self.conn())
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let header = OrderHeader::try_from(row)?;
        let lines = self.order_lines(id)?;
        Ok(Some(Order { header, lines }))
    }

    fn order_lines(&mut self, id: &OrderId) -> Result<Vec<OrderLine>> {
        let rows: Vec<OrderLineRow> = order_lines::table
            .filter(order_lines::order_id.eq(id.as_str()))
            .order(order_lines::line_no.asc())
            .select(OrderLineRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(OrderLine::try_from).collect()
    }

    /// Most recent order headers first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_orders(&mut self, limit: u32) -> Result<Vec<OrderHeader>> {
        let rows: Vec<OrderRow> = orders::table
            .order((orders::issued_at.desc(), orders::id.asc()))
            .limit(i64::from(limit))
            .select(OrderRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(OrderHeader::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_orders_for_customer(&mut self, customer: &CustomerId) -> Result<Vec<OrderHeader>> {
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::customer_id.eq(customer.as_str()))
            .order((orders::issued_at.desc(), orders::id.asc()))
            .select(OrderRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(OrderHeader::try_from).collect()
    }

    #[cfg(test)]
    pub(crate) fn count_orders(&mut self) -> Result<u64> {
        let count: i64 = orders::table.count().get_result(self.conn())?;
        Ok(count.unsigned_abs())
    }

    #[cfg(test)]
    pub(crate) fn count_order_lines(&mut self) -> Result<u64> {
        let count: i64 = order_lines::table.count().get_result(self.conn())?;
        Ok(count.unsigned_abs())
    }
}
