use clap::Subcommand;
use pos_core::{Item, ItemCode};
use pos_operations::operations::CatalogOperation;

use crate::environment::Environment;
use crate::error::Result;
use crate::output::ItemRow;

#[derive(Subcommand)]
pub(crate) enum ItemCommand {
    /// Add an item to the catalog
    Add {
        code: ItemCode,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// List catalog items
    List {
        #[arg(long)]
        category: Option<String>,
    },
}

pub(crate) fn run(env: &Environment, command: ItemCommand) -> Result<()> {
    let catalog = CatalogOperation::new(&env.ledger);

    match command {
        ItemCommand::Add {
            code,
            description,
            category,
        } => {
            let item = Item {
                code,
                description,
                category,
            };
            catalog.add_item(&item)?;
            env.printer
                .done(&ItemRow::from(&item), &format!("Added item {}", item.code))
        }
        ItemCommand::List { category } => {
            let rows: Vec<ItemRow> = catalog
                .items(category.as_deref())?
                .iter()
                .map(ItemRow::from)
                .collect();
            env.printer.list(&rows, "No items.")
        }
    }
}
