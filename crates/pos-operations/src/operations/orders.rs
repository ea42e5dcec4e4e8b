use indexmap::IndexMap;
use pos_core::{CustomerId, Order, OrderHeader, OrderId};

use crate::traits::Ledger;
use crate::{OperationError, Result};

/// An order together with how much of each line is still returnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: Order,
    /// Units already returned, keyed by line number in line order.
    pub returned: IndexMap<u32, u32>,
}

impl OrderDetails {
    #[must_use]
    pub fn returnable(&self, line_no: u32) -> u32 {
        let sold = self
            .order
            .lines
            .iter()
            .find(|line| line.line_no == line_no)
            .map_or(0, |line| line.quantity);
        sold.saturating_sub(self.returned.get(&line_no).copied().unwrap_or(0))
    }
}

/// Read-only access to committed sales.
pub struct OrderQuery<L> {
    ledger: L,
}

impl<L: Ledger> OrderQuery<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::OrderNotFound`] if no such order exists.
    pub fn order(&self, id: &OrderId) -> Result<Order> {
        self.ledger.read(|session| {
            session
                .find_order(id)?
                .ok_or_else(|| OperationError::OrderNotFound(id.clone()))
        })
    }

    /// # Errors
    ///
    /// Returns [`OperationError::OrderNotFound`] if no such order exists.
    pub fn details(&self, id: &OrderId) -> Result<OrderDetails> {
        self.ledger.read(|session| {
            let order = session
                .find_order(id)?
                .ok_or_else(|| OperationError::OrderNotFound(id.clone()))?;
            let mut returned = IndexMap::with_capacity(order.lines.len());
            for line in &order.lines {
                returned.insert(line.line_no, session.returned_quantity(id, line.line_no)?);
            }
            Ok(OrderDetails { order, returned })
        })
    }

    /// # Errors
    ///
    /// Returns an error if the orders cannot be read.
    pub fn recent(&self, limit: u32) -> Result<Vec<OrderHeader>> {
        self.ledger.read(|session| session.list_orders(limit))
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownCustomer`] if no such customer exists.
    pub fn for_customer(&self, customer: &CustomerId) -> Result<Vec<OrderHeader>> {
        self.ledger.read(|session| {
            if session.find_customer(customer)?.is_none() {
                return Err(OperationError::UnknownCustomer(customer.clone()));
            }
            session.list_orders_for_customer(customer)
        })
    }
}

#[cfg(test)]
mod tests {
    use pos_core::{StockId, Username};

    use super::*;
    use crate::mocks::{fixed_clock, make_customer, stocked_ledger};
    use crate::operations::{
        LineRequest, OrderDraft, PlaceOrderOperation, ReturnOperation, ReturnRequest,
    };

    fn draft() -> OrderDraft {
        OrderDraft::new(Username::new("alice").expect("valid username"))
            .with_line(LineRequest::new(StockId::new("MUG-RED").expect("id"), 2))
            .with_line(LineRequest::new(StockId::new("MUG-BLUE").expect("id"), 1))
    }

    #[test]
    fn details_track_returned_quantities() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let placed = PlaceOrderOperation::new(&ledger, fixed_clock()).execute(&draft())?;
        ReturnOperation::new(&ledger, fixed_clock()).execute(&ReturnRequest {
            order_id: placed.header.id.clone(),
            line_no: 1,
            quantity: 1,
            reason: "wrong colour".to_string(),
            operator: Username::new("alice")?,
        })?;

        let details = OrderQuery::new(&ledger).details(&placed.header.id)?;

        assert_eq!(details.order.lines.len(), 2);
        assert_eq!(details.returned.get(&1), Some(&1));
        assert_eq!(details.returnable(1), 1);
        assert_eq!(details.returnable(2), 1);
        assert_eq!(details.returned.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[test]
    fn orders_for_customer_filters() -> anyhow::Result<()> {
        let ledger = stocked_ledger().with_customer(make_customer("C-1"));
        let place = PlaceOrderOperation::new(&ledger, fixed_clock());
        place.execute(&draft().with_customer(CustomerId::new("C-1")?))?;
        place.execute(&draft())?;
        let query = OrderQuery::new(&ledger);

        assert_eq!(query.for_customer(&CustomerId::new("C-1")?)?.len(), 1);
        assert_eq!(query.recent(10)?.len(), 2);
        assert_eq!(query.recent(1)?.len(), 1);
        assert!(matches!(
            query.for_customer(&CustomerId::new("C-2")?),
            Err(OperationError::UnknownCustomer(_))
        ));
        Ok(())
    }

    #[test]
    fn missing_order_is_reported() {
        let ledger = stocked_ledger();

        let result = OrderQuery::new(&ledger).order(&OrderId::generate());

        assert!(matches!(result, Err(OperationError::OrderNotFound(_))));
    }
}
