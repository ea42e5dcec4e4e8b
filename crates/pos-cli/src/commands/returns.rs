use clap::Subcommand;
use pos_core::{OrderId, Username};
use pos_operations::operations::{ReturnOperation, ReturnRequest};

use crate::environment::Environment;
use crate::error::Result;
use crate::output::ReturnRow;

#[derive(Subcommand)]
pub(crate) enum ReturnCommand {
    /// Return units of one order line to stock and refund them
    Add {
        order: OrderId,
        /// Line number as printed on the receipt
        line: u32,
        #[arg(long)]
        quantity: u32,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long)]
        operator: Username,
    },
    /// List returns recorded against an order
    List { order: OrderId },
}

pub(crate) fn run(env: &Environment, command: ReturnCommand) -> Result<()> {
    let returns = ReturnOperation::new(&env.ledger, env.clock)
        .with_points_per_unit(env.config.loyalty.points_per_unit);

    match command {
        ReturnCommand::Add {
            order,
            line,
            quantity,
            reason,
            operator,
        } => {
            let record = returns.execute(&ReturnRequest {
                order_id: order,
                line_no: line,
                quantity,
                reason,
                operator,
            })?;
            env.printer.done(
                &ReturnRow::from(&record),
                &format!(
                    "Returned {} from line {} of {}: refund {} {}",
                    record.quantity,
                    record.line_no,
                    record.order_id,
                    record.refund,
                    env.config.shop.currency
                ),
            )
        }
        ReturnCommand::List { order } => {
            let rows: Vec<ReturnRow> = returns
                .returns_for(&order)?
                .iter()
                .map(ReturnRow::from)
                .collect();
            env.printer.list(&rows, "No returns.")
        }
    }
}
