use pos_core::{
    Money, PurchaseOrder, PurchaseOrderId, PurchaseOrderLine, PurchaseOrderStatus, StockId,
};
use serde::Deserialize;
use tracing::info;

use crate::traits::{Clock, Ledger};
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseLineRequest {
    pub stock_id: StockId,
    pub quantity: u32,
    pub unit_cost: Money,
}

pub struct PurchaseOrderOperation<L, C> {
    ledger: L,
    clock: C,
}

impl<L, C> PurchaseOrderOperation<L, C>
where
    L: Ledger,
    C: Clock,
{
    pub fn new(ledger: L, clock: C) -> Self {
        Self { ledger, clock }
    }

    /// Opens a purchase order against existing stock records.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no lines, a line has zero quantity or a
    /// negative cost, or a stock id is unknown.
    pub fn create(
        &self,
        supplier: &str,
        requests: &[PurchaseLineRequest],
    ) -> Result<PurchaseOrder> {
        if requests.is_empty() {
            return Err(OperationError::EmptyPurchaseOrder);
        }
        let mut lines = Vec::with_capacity(requests.len());
        for (line_no, request) in (1..).zip(requests) {
            if request.quantity == 0 {
                return Err(OperationError::ZeroQuantity { line_no });
            }
            if request.unit_cost.is_negative() {
                return Err(OperationError::NegativePrice);
            }
            lines.push(PurchaseOrderLine {
                line_no,
                stock_id: request.stock_id.clone(),
                quantity: request.quantity,
                unit_cost: request.unit_cost,
            });
        }

        let order = PurchaseOrder {
            id: PurchaseOrderId::generate(),
            supplier: supplier.trim().to_string(),
            status: PurchaseOrderStatus::Open,
            created_at: self.clock.now(),
            received_at: None,
            total_cost: PurchaseOrder::compute_total(&lines)?,
            lines,
        };

        self.ledger.transaction(|session| {
            for line in &order.lines {
                if session.find_stock(&line.stock_id)?.is_none() {
                    return Err(OperationError::UnknownStock(line.stock_id.clone()));
                }
            }
            session.insert_purchase_order(&order)
        })?;

        info!(
            purchase_order = %order.id,
            supplier = %order.supplier,
            total = %order.total_cost,
            "purchase order created"
        );
        Ok(order)
    }

    /// Marks an open purchase order received and adds its quantities to stock.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::PurchaseOrderNotOpen`] if it was already
    /// received; stock is not touched in that case.
    pub fn receive(&self, id: &PurchaseOrderId) -> Result<PurchaseOrder> {
        let received_at = self.clock.now();

        let order = self.ledger.transaction(|session| {
            let order = session
                .find_purchase_order(id)?
                .ok_or_else(|| OperationError::PurchaseOrderNotFound(id.clone()))?;
            if session.mark_purchase_order_received(id, received_at)? == 0 {
                return Err(OperationError::PurchaseOrderNotOpen(id.clone()));
            }
            for line in &order.lines {
                if session.increment_stock(&line.stock_id, line.quantity)? == 0 {
                    return Err(OperationError::UnknownStock(line.stock_id.clone()));
                }
            }
            Ok(PurchaseOrder {
                status: PurchaseOrderStatus::Received,
                received_at: Some(received_at),
                ..order
            })
        })?;

        info!(purchase_order = %order.id, lines = order.lines.len(), "purchase order received");
        Ok(order)
    }

    /// # Errors
    ///
    /// Returns [`OperationError::PurchaseOrderNotFound`] if no such order exists.
    pub fn purchase_order(&self, id: &PurchaseOrderId) -> Result<PurchaseOrder> {
        self.ledger.read(|session| {
            session
                .find_purchase_order(id)?
                .ok_or_else(|| OperationError::PurchaseOrderNotFound(id.clone()))
        })
    }

    /// # Errors
    ///
    /// Returns an error if the purchase orders cannot be read.
    pub fn purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>> {
        self.ledger.read(|session| session.list_purchase_orders(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixed_clock, fixed_time, stocked_ledger};

    fn line(stock: &str, quantity: u32, cost: i64) -> PurchaseLineRequest {
        PurchaseLineRequest {
            stock_id: StockId::new(stock).expect("valid stock id"),
            quantity,
            unit_cost: Money::from_cents(cost),
        }
    }

    #[test]
    fn create_computes_total_and_opens() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let operation = PurchaseOrderOperation::new(&ledger, fixed_clock());

        let order = operation.create(
            "Acme Ceramics",
            &[line("MUG-RED", 12, 120), line("MUG-BLUE", 6, 150)],
        )?;

        assert_eq!(order.status, PurchaseOrderStatus::Open);
        assert_eq!(order.total_cost, Money::from_cents(12 * 120 + 6 * 150));
        assert_eq!(operation.purchase_order(&order.id)?, order);
        assert_eq!(ledger.stock_quantity("MUG-RED"), Some(10));
        Ok(())
    }

    #[test]
    fn receive_adds_stock_once() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let operation = PurchaseOrderOperation::new(&ledger, fixed_clock());
        let order = operation.create("Acme Ceramics", &[line("MUG-RED", 12, 120)])?;

        let received = operation.receive(&order.id)?;
        let again = operation.receive(&order.id);

        assert_eq!(received.status, PurchaseOrderStatus::Received);
        assert_eq!(received.received_at, Some(fixed_time()));
        assert!(matches!(again, Err(OperationError::PurchaseOrderNotOpen(_))));
        assert_eq!(ledger.stock_quantity("MUG-RED"), Some(22));
        assert_eq!(
            operation
                .purchase_orders(Some(PurchaseOrderStatus::Received))?
                .len(),
            1
        );
        assert!(
            operation
                .purchase_orders(Some(PurchaseOrderStatus::Open))?
                .is_empty()
        );
        Ok(())
    }

    #[test]
    fn unknown_stock_is_rejected() {
        let ledger = stocked_ledger();
        let operation = PurchaseOrderOperation::new(&ledger, fixed_clock());

        let result = operation.create("Acme", &[line("TEAPOT", 1, 100)]);

        assert!(matches!(result, Err(OperationError::UnknownStock(_))));
        assert!(ledger.state().purchase_orders.is_empty());
    }

    #[test]
    fn invalid_lines_are_rejected() {
        let ledger = stocked_ledger();
        let operation = PurchaseOrderOperation::new(&ledger, fixed_clock());

        assert!(matches!(
            operation.create("Acme", &[]),
            Err(OperationError::EmptyPurchaseOrder)
        ));
        assert!(matches!(
            operation.create("Acme", &[line("MUG-RED", 0, 100)]),
            Err(OperationError::ZeroQuantity { line_no: 1 })
        ));
        assert!(matches!(
            operation.create("Acme", &[line("MUG-RED", 1, -1)]),
            Err(OperationError::NegativePrice)
        ));
    }

    #[test]
    fn receiving_unknown_order_fails() {
        let ledger = stocked_ledger();
        let operation = PurchaseOrderOperation::new(&ledger, fixed_clock());

        let result = operation.receive(&PurchaseOrderId::generate());

        assert!(matches!(
            result,
            Err(OperationError::PurchaseOrderNotFound(_))
        ));
    }
}
