use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pos_core::{PurchaseOrder, PurchaseOrderId, PurchaseOrderLine, PurchaseOrderStatus};

use super::Session;
use crate::Result;
use crate::models::{PurchaseOrderLineRow, PurchaseOrderRow, to_db_time};
use crate::schema::{purchase_order_lines, purchase_orders};

impl Session<'_> {
    /// Inserts the purchase order header and all of its lines.
    ///
    /// Run this inside [`Database::transaction`](crate::Database::transaction)
    /// to keep the header and lines together.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<()> {
        let header = PurchaseOrderRow::from(order);
        diesel::insert_into(purchase_orders::table)
            .values(&header)
            .execute(self.conn())?;

        for line in &order.lines {
            let row = PurchaseOrderLineRow::new(&order.id, line)?;
            diesel::insert_into(purchase_order_lines::table)
                .values(&row)
                .execute(self.conn())?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn find_purchase_order(&mut self, id: &PurchaseOrderId) -> Result<Option<PurchaseOrder>> {
        let row: Option<PurchaseOrderRow> = purchase_orders::table
            .find(id.as_str())
            .select(PurchaseOrderRow::as_select())
            .first(self.conn())
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let lines = self.purchase_order_lines(id)?;
        row.into_domain(lines).map(Some)
    }

    fn purchase_order_lines(&mut self, id: &PurchaseOrderId) -> Result<Vec<PurchaseOrderLine>> {
        let rows: Vec<PurchaseOrderLineRow> = purchase_order_lines::table
            .filter(purchase_order_lines::purchase_order_id.eq(id.as_str()))
            .order(purchase_order_lines::line_no.asc())
            .select(PurchaseOrderLineRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(PurchaseOrderLine::try_from).collect()
    }

    /// Purchase orders newest first, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_purchase_orders(
        &mut self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>> {
        let rows: Vec<PurchaseOrderRow> = match status {
            Some(status) => purchase_orders::table
                .filter(purchase_orders::status.eq(status.as_str()))
                .order((purchase_orders::created_at.desc(), purchase_orders::id.asc()))
                .select(PurchaseOrderRow::as_select())
                .load(self.conn())?,
            None => purchase_orders::table
                .order((purchase_orders::created_at.desc(), purchase_orders::id.asc()))
                .select(PurchaseOrderRow::as_select())
                .load(self.conn())?,
        };

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let id = PurchaseOrderId::new(row.id.clone())
                .map_err(crate::models::corrupt("purchase_orders"))?;
            let lines = self.purchase_order_lines(&id)?;
            orders.push(row.into_domain(lines)?);
        }
        Ok(orders)
    }

    /// Flips an open purchase order to received.
    ///
    /// Returns the number of rows updated; 0 means the order is missing or
    /// was not open.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_purchase_order_received(
        &mut self,
        id: &PurchaseOrderId,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        Ok(diesel::update(
            purchase_orders::table
                .filter(purchase_orders::id.eq(id.as_str()))
                .filter(purchase_orders::status.eq(PurchaseOrderStatus::Open.as_str())),
        )
        .set((
            purchase_orders::status.eq(PurchaseOrderStatus::Received.as_str()),
            purchase_orders::received_at.eq(Some(to_db_time(at))),
        ))
        .execute(self.conn())?)
    }
}

#[cfg(test)]
mod tests {
    use pos_core::{
        Money, PurchaseOrder, PurchaseOrderId, PurchaseOrderLine, PurchaseOrderStatus, StockId,
    };

    use crate::database::tests::fixed_time;
    use crate::session::orders::tests::seeded_db;

    fn sample_purchase_order(id: &str) -> anyhow::Result<PurchaseOrder> {
        let lines = vec![PurchaseOrderLine {
            line_no: 1,
            stock_id: StockId::new("MUG-RED")?,
            quantity: 12,
            unit_cost: Money::from_cents(120),
        }];
        Ok(PurchaseOrder {
            id: PurchaseOrderId::new(id)?,
            supplier: "Acme Ceramics".to_string(),
            status: PurchaseOrderStatus::Open,
            created_at: fixed_time()?,
            received_at: None,
            total_cost: PurchaseOrder::compute_total(&lines)?,
            lines,
        })
    }

    #[test]
    fn insert_and_find_round_trip() -> anyhow::Result<()> {
        let db = seeded_db()?;
        let order = sample_purchase_order("PO-1")?;

        db.transaction::<_, crate::StoreError>(|s| s.insert_purchase_order(&order))?;
        let found = db.session(|s| s.find_purchase_order(&order.id))?;

        assert_eq!(found, Some(order));
        Ok(())
    }

    #[test]
    fn mark_received_only_once() -> anyhow::Result<()> {
        let db = seeded_db()?;
        let order = sample_purchase_order("PO-1")?;
        let at = fixed_time()?;
        db.session(|s| s.insert_purchase_order(&order))?;

        let first = db.session(|s| s.mark_purchase_order_received(&order.id, at))?;
        let second = db.session(|s| s.mark_purchase_order_received(&order.id, at))?;

        assert_eq!((first, second), (1, 0));
        let open = db.session(|s| s.list_purchase_orders(Some(PurchaseOrderStatus::Open)))?;
        let received =
            db.session(|s| s.list_purchase_orders(Some(PurchaseOrderStatus::Received)))?;
        assert!(open.is_empty());
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].received_at, Some(at));
        Ok(())
    }
}
