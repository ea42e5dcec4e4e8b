mod card;
mod customer;
mod init;
mod item;
mod lines;
mod order;
mod purchase_order;
mod returns;
mod stock;
mod user;

use clap::Subcommand;

use crate::environment::Environment;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the database and, optionally, the first admin account
    Init(init::InitArgs),
    /// Manage catalog items
    #[command(subcommand)]
    Item(item::ItemCommand),
    /// Manage stock records and on-hand quantities
    #[command(subcommand)]
    Stock(stock::StockCommand),
    /// Manage customers
    #[command(subcommand)]
    Customer(customer::CustomerCommand),
    /// Issue and manage loyalty cards
    #[command(subcommand)]
    Card(card::CardCommand),
    /// Manage operator accounts
    #[command(subcommand)]
    User(user::UserCommand),
    /// Place and look up sales
    #[command(subcommand)]
    Order(order::OrderCommand),
    /// Take goods back against an earlier sale
    #[command(subcommand)]
    Return(returns::ReturnCommand),
    /// Order stock from suppliers
    #[command(subcommand)]
    PurchaseOrder(purchase_order::PurchaseOrderCommand),
}

impl Commands {
    pub(crate) fn execute(self, env: &Environment) -> Result<()> {
        match self {
            Self::Init(args) => init::run(env, &args),
            Self::Item(command) => item::run(env, command),
            Self::Stock(command) => stock::run(env, command),
            Self::Customer(command) => customer::run(env, command),
            Self::Card(command) => card::run(env, command),
            Self::User(command) => user::run(env, command),
            Self::Order(command) => order::run(env, command),
            Self::Return(command) => returns::run(env, command),
            Self::PurchaseOrder(command) => purchase_order::run(env, command),
        }
    }
}
