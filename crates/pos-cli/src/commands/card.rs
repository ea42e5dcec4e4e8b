use clap::Subcommand;
use pos_core::{CardNumber, CustomerId};
use pos_operations::operations::LoyaltyOperation;

use crate::environment::Environment;
use crate::error::Result;
use crate::output::CardRow;

#[derive(Subcommand)]
pub(crate) enum CardCommand {
    /// Issue a loyalty card to a customer
    Issue {
        number: CardNumber,
        #[arg(long)]
        customer: CustomerId,
        /// Order discount in basis points (500 = 5%)
        #[arg(long, default_value_t = 0)]
        discount_bps: u32,
    },
    /// Show a loyalty card and its points balance
    Show { number: CardNumber },
    /// Deactivate a loyalty card
    Deactivate { number: CardNumber },
}

pub(crate) fn run(env: &Environment, command: CardCommand) -> Result<()> {
    let loyalty = LoyaltyOperation::new(&env.ledger, env.clock);

    match command {
        CardCommand::Issue {
            number,
            customer,
            discount_bps,
        } => {
            let card = loyalty.issue(number, customer, discount_bps)?;
            env.printer.done(
                &CardRow::from(&card),
                &format!("Issued card {} to {}", card.number, card.customer_id),
            )
        }
        CardCommand::Show { number } => env.printer.record(&CardRow::from(&loyalty.card(&number)?)),
        CardCommand::Deactivate { number } => {
            let card = loyalty.deactivate(&number)?;
            env.printer.done(
                &CardRow::from(&card),
                &format!("Deactivated card {}", card.number),
            )
        }
    }
}
