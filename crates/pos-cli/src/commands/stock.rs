use clap::Subcommand;
use pos_core::{ItemCode, Money, StockDetail, StockId};
use pos_operations::operations::CatalogOperation;

use crate::environment::Environment;
use crate::error::Result;
use crate::output::StockRow;

#[derive(Subcommand)]
pub(crate) enum StockCommand {
    /// Add a stock record for an existing item
    Add {
        id: StockId,
        #[arg(long)]
        item: ItemCode,
        #[arg(long, default_value = "default")]
        variant: String,
        /// Unit selling price, e.g. 12.50
        #[arg(long)]
        price: Money,
        #[arg(long, default_value_t = 0)]
        quantity: u32,
    },
    /// List stock records
    List {
        /// Only records for this item
        #[arg(long)]
        item: Option<ItemCode>,
    },
    /// Show one stock record
    Show { id: StockId },
    /// Change the on-hand quantity by a signed amount
    Adjust {
        id: StockId,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// List stock at or below a threshold
    Low {
        #[arg(long, default_value_t = 5)]
        threshold: u32,
    },
    /// Change the unit selling price
    Price { id: StockId, price: Money },
}

pub(crate) fn run(env: &Environment, command: StockCommand) -> Result<()> {
    let catalog = CatalogOperation::new(&env.ledger);

    match command {
        StockCommand::Add {
            id,
            item,
            variant,
            price,
            quantity,
        } => {
            let stock = StockDetail {
                id,
                item_code: item,
                variant,
                unit_price: price,
                quantity,
            };
            catalog.add_stock(&stock)?;
            env.printer.done(
                &StockRow::from(&stock),
                &format!("Added stock {} ({} on hand)", stock.id, stock.quantity),
            )
        }
        StockCommand::List { item } => {
            let rows: Vec<StockRow> = catalog
                .stock_for(item.as_ref())?
                .iter()
                .map(StockRow::from)
                .collect();
            env.printer.list(&rows, "No stock records.")
        }
        StockCommand::Show { id } => env.printer.record(&StockRow::from(&catalog.stock(&id)?)),
        StockCommand::Adjust { id, delta } => {
            let stock = catalog.adjust_stock(&id, delta)?;
            env.printer.done(
                &StockRow::from(&stock),
                &format!("Stock {} now at {}", stock.id, stock.quantity),
            )
        }
        StockCommand::Low { threshold } => {
            let rows: Vec<StockRow> = catalog
                .low_stock(threshold)?
                .iter()
                .map(StockRow::from)
                .collect();
            env.printer
                .list(&rows, &format!("No stock at or below {threshold}."))
        }
        StockCommand::Price { id, price } => {
            let stock = catalog.set_unit_price(&id, price)?;
            env.printer.done(
                &StockRow::from(&stock),
                &format!(
                    "Stock {} now sells at {} {}",
                    stock.id, stock.unit_price, env.config.shop.currency
                ),
            )
        }
    }
}
