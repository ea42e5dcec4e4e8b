mod draft;
mod trace;

use pos_core::{LoyaltyCard, Money, OrderHeader, OrderId, OrderLine};
use tracing::{debug, info, warn};

pub use draft::{LineRequest, OrderDraft, PlacedOrder};
pub use trace::{PlacementPhase, PlacementTrace};

use crate::traits::{Clock, Ledger, LedgerSession};
use crate::{OperationError, Result};

/// Records a sale and takes the sold quantities out of stock as one unit.
///
/// The header is written first, then each line in the order the caller gave
/// them, each line followed by its stock decrement. Any failure rolls back the
/// whole sale, header included.
pub struct PlaceOrderOperation<L, C> {
    ledger: L,
    clock: C,
    points_per_unit: u32,
}

impl<L, C> PlaceOrderOperation<L, C>
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

    /// Loyalty points earned per whole currency unit of the order total.
    #[must_use]
    pub fn with_points_per_unit(mut self, points_per_unit: u32) -> Self {
        self.points_per_unit = points_per_unit;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the draft is invalid, a referenced record is
    /// missing, stock is insufficient, or any write fails. Nothing is
    /// persisted when an error is returned.
    pub fn execute(&self, draft: &OrderDraft) -> Result<PlacedOrder> {
        self.execute_traced(draft).0
    }

    /// Like [`execute`](Self::execute), also returning how far the placement
    /// got.
    pub fn execute_traced(&self, draft: &OrderDraft) -> (Result<PlacedOrder>, PlacementTrace) {
        let mut trace = PlacementTrace::new();
        let outcome = self.place(draft, &mut trace);
        trace.finish(outcome.is_ok());

        match &outcome {
            Ok(placed) => info!(
                order = %placed.header.id,
                lines = placed.lines.len(),
                total = %placed.header.total,
                "order placed"
            ),
            Err(error) => warn!(
                phase = trace.phase().as_str(),
                failed_line = ?trace.failed_line(),
                error = %error,
                "order placement failed"
            ),
        }
        (outcome, trace)
    }

    fn place(&self, draft: &OrderDraft, trace: &mut PlacementTrace) -> Result<PlacedOrder> {
        validate_draft(draft)?;
        self.ledger.read(|session| check_parties(session, draft))?;

        let issued_at = self.clock.now();
        let points_per_unit = self.points_per_unit;

        self.ledger.transaction(|session| {
            trace.enter(PlacementPhase::HeaderPending);

            let order_id = OrderId::generate();
            trace.record_order_id(order_id.clone());

            let lines = price_lines(session, &order_id, draft)?;
            let subtotal = sum_amounts(&lines)?;
            let card = resolve_card(session, draft)?;
            let card_discount = match &card {
                Some(card) => subtotal
                    .percent_bps(card.discount_bps)
                    .ok_or(OperationError::MoneyOverflow("card discount"))?,
                None => Money::ZERO,
            };
            let discount = draft
                .discount
                .checked_add(card_discount)
                .ok_or(OperationError::MoneyOverflow("order discount"))?;
            let total = subtotal
                .checked_sub(discount)
                .ok_or(OperationError::MoneyOverflow("order total"))?;
            if total.is_negative() {
                return Err(OperationError::NegativeTotal);
            }

            let header = OrderHeader {
                id: order_id.clone(),
                issued_at,
                subtotal,
                discount,
                total,
                customer_id: draft.customer.clone(),
                operator: draft.operator.clone(),
                loyalty_card: card.as_ref().map(|card| card.number.clone()),
            };

            if session.insert_order_header(&header)? == 0 {
                return Err(OperationError::OrderNotPersisted(order_id));
            }
            debug!(order = %order_id, "order header written");
            trace.enter(PlacementPhase::ItemsPending);

            for line in &lines {
                trace.record_line_attempt(line.line_no);
                if session.insert_order_line(line)? == 0 {
                    return Err(OperationError::LineNotPersisted {
                        order: order_id.clone(),
                        line_no: line.line_no,
                    });
                }
                take_stock(session, line)?;
                trace.record_line_done();
            }

            let points_awarded = match &card {
                Some(card) => award_points(session, card, total, points_per_unit)?,
                None => 0,
            };

            Ok(PlacedOrder {
                header,
                lines,
                points_awarded,
            })
        })
    }
}

fn validate_draft(draft: &OrderDraft) -> Result<()> {
    if draft.lines.is_empty() {
        return Err(OperationError::EmptyOrder);
    }
    if draft.discount.is_negative() {
        return Err(OperationError::NegativeDiscount);
    }
    for (line_no, line) in (1..).zip(&draft.lines) {
        if line.quantity == 0 {
            return Err(OperationError::ZeroQuantity { line_no });
        }
        if line.discount.is_negative() {
            return Err(OperationError::NegativeDiscount);
        }
    }
    Ok(())
}

fn check_parties(session: &mut dyn LedgerSession, draft: &OrderDraft) -> Result<()> {
    let operator = session
        .find_user(&draft.operator)?
        .ok_or_else(|| OperationError::UnknownOperator(draft.operator.clone()))?;
    if !operator.active {
        return Err(OperationError::InactiveOperator(operator.username));
    }

    if let Some(customer) = &draft.customer {
        if session.find_customer(customer)?.is_none() {
            return Err(OperationError::UnknownCustomer(customer.clone()));
        }
    }
    Ok(())
}

fn price_lines(
    session: &mut dyn LedgerSession,
    order_id: &OrderId,
    draft: &OrderDraft,
) -> Result<Vec<OrderLine>> {
    let mut lines = Vec::with_capacity(draft.lines.len());
    for (line_no, request) in (1..).zip(&draft.lines) {
        let stock = session
            .find_stock(&request.stock_id)?
            .ok_or_else(|| OperationError::UnknownStock(request.stock_id.clone()))?;

        let gross = stock
            .unit_price
            .checked_mul(request.quantity)
            .ok_or(OperationError::MoneyOverflow("line price"))?;
        let amount = gross
            .checked_sub(request.discount)
            .ok_or(OperationError::MoneyOverflow("line amount"))?;
        if amount.is_negative() {
            return Err(OperationError::NegativeLineAmount { line_no });
        }

        lines.push(OrderLine {
            order_id: order_id.clone(),
            line_no,
            stock_id: request.stock_id.clone(),
            quantity: request.quantity,
            unit_price: stock.unit_price,
            discount: request.discount,
            amount,
        });
    }
    Ok(lines)
}

fn sum_amounts(lines: &[OrderLine]) -> Result<Money> {
    lines.iter().try_fold(Money::ZERO, |acc, line| {
        acc.checked_add(line.amount)
            .ok_or(OperationError::MoneyOverflow("order subtotal"))
    })
}

fn resolve_card(
    session: &mut dyn LedgerSession,
    draft: &OrderDraft,
) -> Result<Option<LoyaltyCard>> {
    let Some(number) = &draft.loyalty_card else {
        return Ok(None);
    };
    let card = session
        .find_card(number)?
        .ok_or_else(|| OperationError::CardNotFound(number.clone()))?;
    if !card.active {
        return Err(OperationError::CardInactive(card.number));
    }
    if let Some(customer) = &draft.customer {
        if &card.customer_id != customer {
            return Err(OperationError::CardNotOwned {
                card: card.number,
                customer: customer.clone(),
            });
        }
    }
    Ok(Some(card))
}

fn take_stock(session: &mut dyn LedgerSession, line: &OrderLine) -> Result<()> {
    if session.decrement_stock(&line.stock_id, line.quantity)? == 1 {
        return Ok(());
    }
    match session.find_stock(&line.stock_id)? {
        Some(stock) => Err(OperationError::InsufficientStock {
            stock: line.stock_id.clone(),
            requested: line.quantity,
            available: stock.quantity,
        }),
        None => Err(OperationError::UnknownStock(line.stock_id.clone())),
    }
}

fn award_points(
    session: &mut dyn LedgerSession,
    card: &LoyaltyCard,
    total: Money,
    points_per_unit: u32,
) -> Result<i64> {
    let points = total
        .whole_units()
        .checked_mul(i64::from(points_per_unit))
        .ok_or(OperationError::MoneyOverflow("loyalty points"))?;
    if points == 0 {
        return Ok(0);
    }
    if session.add_loyalty_points(&card.number, points)? == 0 {
        return Err(OperationError::CardInactive(card.number.clone()));
    }
    debug!(card = %card.number, points, "loyalty points awarded");
    Ok(points)
}
