use clap::Subcommand;
use pos_core::{PurchaseOrderId, PurchaseOrderStatus};
use pos_operations::operations::{PurchaseLineRequest, PurchaseOrderOperation};

use super::lines::PurchaseLine;
use crate::environment::Environment;
use crate::error::Result;
use crate::output::PurchaseOrderRow;

#[derive(Subcommand)]
pub(crate) enum PurchaseOrderCommand {
    /// Open a purchase order with a supplier
    Create {
        #[arg(long)]
        supplier: String,
        /// STOCK:QTY:COST, repeated once per line
        #[arg(long = "line", required = true, value_name = "LINE")]
        lines: Vec<PurchaseLine>,
    },
    /// Book the goods of an open purchase order into stock
    Receive { id: PurchaseOrderId },
    /// Show a purchase order with its lines
    Show { id: PurchaseOrderId },
    /// List purchase orders
    List {
        /// open or received
        #[arg(long)]
        status: Option<PurchaseOrderStatus>,
    },
}

pub(crate) fn run(env: &Environment, command: PurchaseOrderCommand) -> Result<()> {
    let purchasing = PurchaseOrderOperation::new(&env.ledger, env.clock);

    match command {
        PurchaseOrderCommand::Create { supplier, lines } => {
            let requests: Vec<PurchaseLineRequest> =
                lines.into_iter().map(|PurchaseLine(line)| line).collect();
            let order = purchasing.create(&supplier, &requests)?;
            env.printer.done(
                &PurchaseOrderRow::full(&order),
                &format!(
                    "Opened purchase order {} with {} for {} {}",
                    order.id, order.supplier, order.total_cost, env.config.shop.currency
                ),
            )
        }
        PurchaseOrderCommand::Receive { id } => {
            let order = purchasing.receive(&id)?;
            env.printer.done(
                &PurchaseOrderRow::full(&order),
                &format!("Received purchase order {} into stock", order.id),
            )
        }
        PurchaseOrderCommand::Show { id } => {
            let row = PurchaseOrderRow::full(&purchasing.purchase_order(&id)?);
            env.printer.either(&row, |printer| {
                printer.record(&row)?;
                printer.line("")?;
                printer.list(&row.lines, "No lines.")
            })
        }
        PurchaseOrderCommand::List { status } => {
            let rows: Vec<PurchaseOrderRow> = purchasing
                .purchase_orders(status)?
                .iter()
                .map(PurchaseOrderRow::summary)
                .collect();
            env.printer.list(&rows, "No purchase orders.")
        }
    }
}
