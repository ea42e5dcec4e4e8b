use clap::Subcommand;
use pos_core::{CardNumber, CustomerId, Money, OrderId, Username};
use pos_operations::operations::{OrderDraft, OrderQuery, PlaceOrderOperation, PlacementPhase};

use super::lines::SaleLine;
use crate::environment::Environment;
use crate::error::{CliError, Result};
use crate::output::{OrderRow, ReceiptRow};

#[derive(Subcommand)]
pub(crate) enum OrderCommand {
    /// Record a sale and take its stock
    Place {
        /// Operator ringing up the sale
        #[arg(long)]
        operator: Username,
        #[arg(long)]
        customer: Option<CustomerId>,
        /// Loyalty card presented at the till
        #[arg(long)]
        card: Option<CardNumber>,
        /// Order-level discount, e.g. 2.00
        #[arg(long, default_value_t = Money::ZERO)]
        discount: Money,
        /// STOCK:QTY[:DISCOUNT], repeated once per line in till order
        #[arg(long = "line", required = true, value_name = "LINE")]
        lines: Vec<SaleLine>,
    },
    /// Show an order with its lines and returned quantities
    Show { id: OrderId },
    /// List recent orders, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Only orders for this customer
        #[arg(long, conflicts_with = "limit")]
        customer: Option<CustomerId>,
    },
}

pub(crate) fn run(env: &Environment, command: OrderCommand) -> Result<()> {
    match command {
        OrderCommand::Place {
            operator,
            customer,
            card,
            discount,
            lines,
        } => {
            let mut draft = OrderDraft::new(operator).with_discount(discount);
            if let Some(customer) = customer {
                draft = draft.with_customer(customer);
            }
            if let Some(card) = card {
                draft = draft.with_card(card);
            }
            for SaleLine(line) in lines {
                draft = draft.with_line(line);
            }
            place(env, &draft)
        }
        OrderCommand::Show { id } => {
            let details = OrderQuery::new(&env.ledger).details(&id)?;
            let receipt = ReceiptRow::from(&details);
            env.printer.either(&receipt, |printer| {
                printer.record(&receipt.order)?;
                if let Some(card) = &receipt.loyalty_card {
                    printer.line(&format!("Card:      {card}"))?;
                }
                printer.line("")?;
                printer.list(&receipt.lines, "No lines.")
            })
        }
        OrderCommand::List { limit, customer } => {
            let query = OrderQuery::new(&env.ledger);
            let headers = match customer {
                Some(customer) => query.for_customer(&customer)?,
                None => query.recent(limit)?,
            };
            let rows: Vec<OrderRow> = headers.iter().map(OrderRow::from).collect();
            env.printer.list(&rows, "No orders.")
        }
    }
}

fn place(env: &Environment, draft: &OrderDraft) -> Result<()> {
    let operation = PlaceOrderOperation::new(&env.ledger, env.clock)
        .with_points_per_unit(env.config.loyalty.points_per_unit);

    let (outcome, trace) = operation.execute_traced(draft);
    let placed = match outcome {
        Ok(placed) => placed,
        Err(source) => {
            let phase = trace
                .phases()
                .iter()
                .rev()
                .find(|phase| !phase.is_terminal())
                .copied()
                .unwrap_or(PlacementPhase::NotStarted);
            if phase == PlacementPhase::NotStarted {
                return Err(source.into());
            }
            return Err(CliError::Placement {
                phase: phase.as_str(),
                source,
            });
        }
    };

    let receipt = ReceiptRow::from(&placed);
    let currency = &env.config.shop.currency;
    env.printer.either(&receipt, |printer| {
        printer.line(&format!("{} order {}", env.config.shop.name, receipt.order.id))?;
        printer.list(&receipt.lines, "No lines.")?;
        printer.line(&format!("Subtotal: {} {currency}", receipt.order.subtotal))?;
        printer.line(&format!("Discount: {} {currency}", receipt.order.discount))?;
        printer.line(&format!("Total:    {} {currency}", receipt.order.total))?;
        if placed.points_awarded > 0 {
            printer.line(&format!("Points:   {}", placed.points_awarded))?;
        }
        Ok(())
    })
}
