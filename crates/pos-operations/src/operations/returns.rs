use pos_core::{Money, Order, OrderId, ReturnId, ReturnRecord, Username};
use tracing::{debug, info};

use crate::traits::{Clock, Ledger, LedgerSession};
use crate::{OperationError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub order_id: OrderId,
    pub line_no: u32,
    pub quantity: u32,
    pub reason: String,
    pub operator: Username,
}

/// Takes goods back against a line of an earlier sale.
pub struct ReturnOperation<L, C> {
    ledger: L,
    clock: C,
    points_per_unit: u32,
}

impl<L, C> ReturnOperation<L, C>
where
    L: Ledger,
    C: Clock,
{
    pub fn new(ledger: L, clock: C) -> Self {
        Self {
            ledger,
            clock,
            points_per_unit: 1,
        }
    }

    /// Must match the rate the sale was placed with for the reversal to
    /// take back exactly what was earned.
    #[must_use]
    pub fn with_points_per_unit(mut self, points_per_unit: u32) -> Self {
        self.points_per_unit = points_per_unit;
        self
    }

    /// Records the return, refunds the returned share of what was actually
    /// paid for the line, takes back the matching loyalty points and puts
    /// the goods back in stock.
    ///
    /// The order discount is spread over the lines by amount. The last
    /// units returned on a line get whatever is left of its paid amount,
    /// so the refunds of a fully returned order add up to its total.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator or order line is unknown, or if more
    /// units would be returned than were sold on the line.
    pub fn execute(&self, request: &ReturnRequest) -> Result<ReturnRecord> {
        if request.quantity == 0 {
            return Err(OperationError::ZeroQuantity {
                line_no: request.line_no,
            });
        }
        let returned_at = self.clock.now();
        let points_per_unit = self.points_per_unit;

        let (record, points) = self.ledger.transaction(|session| {
            let operator = session
                .find_user(&request.operator)?
                .ok_or_else(|| OperationError::UnknownOperator(request.operator.clone()))?;
            if !operator.active {
                return Err(OperationError::InactiveOperator(operator.username));
            }

            let line_missing = || OperationError::OrderLineNotFound {
                order: request.order_id.clone(),
                line_no: request.line_no,
            };
            let order = session
                .find_order(&request.order_id)?
                .ok_or_else(line_missing)?;
            let line = order
                .lines
                .iter()
                .find(|line| line.line_no == request.line_no)
                .ok_or_else(line_missing)?;

            let already = session.returned_quantity(&request.order_id, request.line_no)?;
            let returnable = line.quantity.saturating_sub(already);
            if request.quantity > returnable {
                return Err(OperationError::ReturnExceedsPurchased {
                    order: request.order_id.clone(),
                    line_no: request.line_no,
                    requested: request.quantity,
                    returnable,
                });
            }

            let earlier = session.list_returns(&request.order_id)?;
            let refunded_on_order = sum_refunds(earlier.iter())?;
            let refunded_on_line =
                sum_refunds(earlier.iter().filter(|r| r.line_no == request.line_no))?;

            let paid = paid_for_line(&order, request.line_no)?;
            let refund = if request.quantity == returnable {
                paid.checked_sub(refunded_on_line)
                    .ok_or(OperationError::MoneyOverflow("refund"))?
                    .max(Money::ZERO)
            } else {
                paid.proportion(request.quantity, line.quantity)
                    .ok_or(OperationError::MoneyOverflow("refund"))?
            };

            let record = ReturnRecord {
                id: ReturnId::generate(),
                order_id: request.order_id.clone(),
                line_no: request.line_no,
                quantity: request.quantity,
                refund,
                reason: request.reason.trim().to_string(),
                operator: request.operator.clone(),
                returned_at,
            };
            session.insert_return(&record)?;

            if session.increment_stock(&line.stock_id, request.quantity)? == 0 {
                return Err(OperationError::UnknownStock(line.stock_id.clone()));
            }

            let points = reverse_points(
                session,
                &order,
                points_per_unit,
                refunded_on_order,
                refund,
            )?;
            Ok((record, points))
        })?;

        info!(
            order = %record.order_id,
            line = record.line_no,
            quantity = record.quantity,
            refund = %record.refund,
            points,
            "return recorded"
        );
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns an error if the returns cannot be read.
    pub fn returns_for(&self, order: &OrderId) -> Result<Vec<ReturnRecord>> {
        self.ledger.read(|session| session.list_returns(order))
    }
}

fn sum_refunds<'a>(mut records: impl Iterator<Item = &'a ReturnRecord>) -> Result<Money> {
    records.try_fold(Money::ZERO, |sum, record| {
        sum.checked_add(record.refund)
            .ok_or(OperationError::MoneyOverflow("refund"))
    })
}

/// Line amount less its share of the order discount. The last line absorbs
/// the rounding so the paid amounts add up to the order total.
fn paid_for_line(order: &Order, line_no: u32) -> Result<Money> {
    let header = &order.header;
    let share_of = |amount: Money| {
        if header.subtotal <= Money::ZERO {
            return Ok(Money::ZERO);
        }
        header
            .discount
            .share(amount, header.subtotal)
            .ok_or(OperationError::MoneyOverflow("discount allocation"))
    };

    let mut allocated = Money::ZERO;
    for line in &order.lines {
        let is_last = order.lines.last().is_some_and(|last| last.line_no == line.line_no);
        let share = if is_last {
            header
                .discount
                .checked_sub(allocated)
                .ok_or(OperationError::MoneyOverflow("discount allocation"))?
        } else {
            share_of(line.amount)?
        };
        if line.line_no == line_no {
            return line
                .amount
                .checked_sub(share)
                .ok_or(OperationError::MoneyOverflow("discount allocation"));
        }
        allocated = allocated
            .checked_add(share)
            .ok_or(OperationError::MoneyOverflow("discount allocation"))?;
    }
    Err(OperationError::OrderLineNotFound {
        order: header.id.clone(),
        line_no,
    })
}

/// Takes back the points earned on the refunded part of the order total,
/// never taking the card below zero.
fn reverse_points(
    session: &mut dyn LedgerSession,
    order: &Order,
    points_per_unit: u32,
    refunded_before: Money,
    refund: Money,
) -> Result<i64> {
    let header = &order.header;
    let Some(number) = &header.loyalty_card else {
        return Ok(0);
    };
    if header.total <= Money::ZERO {
        return Ok(0);
    }
    let earned = header
        .total
        .whole_units()
        .checked_mul(i64::from(points_per_unit))
        .ok_or(OperationError::MoneyOverflow("loyalty points"))?;
    let refunded_after = refunded_before
        .checked_add(refund)
        .ok_or(OperationError::MoneyOverflow("refund"))?;

    let earned_on = |refunded: Money| {
        let scaled = i128::from(earned) * i128::from(refunded.cents().min(header.total.cents()));
        scaled.div_euclid(i128::from(header.total.cents()))
    };
    let owed = i64::try_from(earned_on(refunded_after) - earned_on(refunded_before))
        .map_err(|_| OperationError::MoneyOverflow("loyalty points"))?;
    if owed <= 0 {
        return Ok(0);
    }

    let Some(card) = session.find_card(number)? else {
        debug!(card = %number, "card gone, no points to take back");
        return Ok(0);
    };
    let points = owed.min(card.points.max(0));
    if points == 0 {
        return Ok(0);
    }
    if session.add_loyalty_points(number, -points)? == 0 {
        debug!(card = %number, "card inactive, points left as they are");
        return Ok(0);
    }
    debug!(card = %number, points, "loyalty points taken back");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use pos_core::{CardNumber, CustomerId, StockId};

    use super::*;
    use crate::mocks::{MockLedger, fixed_clock, make_card, make_customer, stocked_ledger};
    use crate::operations::{LineRequest, OrderDraft, PlaceOrderOperation};

    fn place(ledger: &MockLedger, quantity: u32) -> OrderId {
        let draft = OrderDraft::new(Username::new("alice").expect("valid username")).with_line(
            LineRequest::new(StockId::new("MUG-RED").expect("valid id"), quantity)
                .with_discount(Money::from_cents(100)),
        );
        PlaceOrderOperation::new(ledger, fixed_clock())
            .execute(&draft)
            .expect("order placed")
            .header
            .id
    }

    fn request(order: &OrderId, quantity: u32) -> ReturnRequest {
        ReturnRequest {
            order_id: order.clone(),
            line_no: 1,
            quantity,
            reason: "chipped".to_string(),
            operator: Username::new("alice").expect("valid username"),
        }
    }

    #[test]
    fn return_refunds_share_and_restocks() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let order = place(&ledger, 3);
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let record = returns.execute(&request(&order, 1))?;

        // line amount is 3 * 250 - 100 = 650; a third of it rounds down
        assert_eq!(record.refund, Money::from_cents(216));
        assert_eq!(ledger.stock_quantity("MUG-RED"), Some(8));
        assert_eq!(returns.returns_for(&order)?, vec![record]);
        Ok(())
    }

    #[test]
    fn last_units_get_what_is_left_of_the_line() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let order = place(&ledger, 3);
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let first = returns.execute(&request(&order, 1))?;
        let rest = returns.execute(&request(&order, 2))?;

        assert_eq!(first.refund, Money::from_cents(216));
        assert_eq!(rest.refund, Money::from_cents(434));
        Ok(())
    }

    fn card_ledger(discount_bps: u32) -> MockLedger {
        stocked_ledger()
            .with_customer(make_customer("C-1"))
            .with_card(make_card("CARD-1", "C-1", discount_bps))
    }

    fn place_with_card(ledger: &MockLedger, discount: Money, lines: &[(&str, u32)]) -> Order {
        let mut draft = OrderDraft::new(Username::new("alice").expect("valid username"))
            .with_customer(CustomerId::new("C-1").expect("valid id"))
            .with_card(CardNumber::new("CARD-1").expect("valid card"))
            .with_discount(discount);
        for (stock, quantity) in lines {
            draft = draft.with_line(LineRequest::new(
                StockId::new(*stock).expect("valid id"),
                *quantity,
            ));
        }
        let placed = PlaceOrderOperation::new(ledger, fixed_clock())
            .execute(&draft)
            .expect("order placed");
        Order {
            header: placed.header,
            lines: placed.lines,
        }
    }

    fn card_points(ledger: &MockLedger) -> i64 {
        let number = CardNumber::new("CARD-1").expect("valid card");
        ledger.state().cards[&number].points
    }

    #[test]
    fn full_return_of_discounted_card_sale_refunds_what_was_paid() -> anyhow::Result<()> {
        let ledger = card_ledger(5_000);
        let order = place_with_card(&ledger, Money::from_cents(100), &[("MUG-RED", 4)]);
        // 10.00 less 5.00 card discount less 1.00 order discount
        assert_eq!(order.header.total, Money::from_cents(400));
        assert_eq!(card_points(&ledger), 4);
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let record = returns.execute(&request(&order.header.id, 4))?;

        assert_eq!(record.refund, order.header.total);
        assert_eq!(card_points(&ledger), 0);
        assert_eq!(ledger.stock_quantity("MUG-RED"), Some(10));
        Ok(())
    }

    #[test]
    fn partial_returns_never_refund_more_than_the_total() -> anyhow::Result<()> {
        let ledger = card_ledger(5_000);
        let order = place_with_card(&ledger, Money::from_cents(100), &[("MUG-RED", 4)]);
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let first = returns.execute(&request(&order.header.id, 3))?;
        assert_eq!(first.refund, Money::from_cents(300));
        assert_eq!(card_points(&ledger), 1);

        let last = returns.execute(&request(&order.header.id, 1))?;
        assert_eq!(last.refund, Money::from_cents(100));
        assert_eq!(card_points(&ledger), 0);

        let refunded = sum_refunds(returns.returns_for(&order.header.id)?.iter())?;
        assert_eq!(refunded, order.header.total);
        Ok(())
    }

    #[test]
    fn order_discount_is_spread_over_lines_by_amount() -> anyhow::Result<()> {
        let ledger = card_ledger(0);
        let order = place_with_card(
            &ledger,
            Money::from_cents(100),
            &[("MUG-RED", 1), ("MUG-BLUE", 1)],
        );
        assert_eq!(order.header.total, Money::from_cents(450));
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let red = returns.execute(&request(&order.header.id, 1))?;
        let mut blue_request = request(&order.header.id, 1);
        blue_request.line_no = 2;
        let blue = returns.execute(&blue_request)?;

        // 100 * 250 / 550 rounds down to 45; the last line takes the other 55
        assert_eq!(red.refund, Money::from_cents(205));
        assert_eq!(blue.refund, Money::from_cents(245));
        assert!(red.refund.checked_add(blue.refund) <= Some(order.header.total));
        assert_eq!(card_points(&ledger), 0);
        Ok(())
    }

    #[test]
    fn points_never_go_below_zero() -> anyhow::Result<()> {
        let ledger = card_ledger(5_000);
        let order = place_with_card(&ledger, Money::ZERO, &[("MUG-RED", 4)]);
        assert_eq!(card_points(&ledger), 5);
        let returns = ReturnOperation::new(&ledger, fixed_clock()).with_points_per_unit(3);

        returns.execute(&request(&order.header.id, 4))?;

        assert_eq!(card_points(&ledger), 0);
        Ok(())
    }

    #[test]
    fn cannot_return_more_than_remaining() -> anyhow::Result<()> {
        let ledger = stocked_ledger();
        let order = place(&ledger, 3);
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        returns.execute(&request(&order, 2))?;
        let result = returns.execute(&request(&order, 2));

        assert!(matches!(
            result,
            Err(OperationError::ReturnExceedsPurchased {
                requested: 2,
                returnable: 1,
                ..
            })
        ));
        assert_eq!(ledger.stock_quantity("MUG-RED"), Some(9));
        Ok(())
    }

    #[test]
    fn missing_line_is_reported() {
        let ledger = stocked_ledger();
        let order = place(&ledger, 1);
        let returns = ReturnOperation::new(&ledger, fixed_clock());
        let mut req = request(&order, 1);
        req.line_no = 2;

        let result = returns.execute(&req);

        assert!(matches!(
            result,
            Err(OperationError::OrderLineNotFound { line_no: 2, .. })
        ));
    }

    #[test]
    fn zero_quantity_is_rejected_without_writes() {
        let ledger = stocked_ledger();
        let order = place(&ledger, 1);
        let writes_before = ledger.calls().len();
        let returns = ReturnOperation::new(&ledger, fixed_clock());

        let result = returns.execute(&request(&order, 0));

        assert!(matches!(result, Err(OperationError::ZeroQuantity { .. })));
        assert_eq!(ledger.calls().len(), writes_before);
    }
}
