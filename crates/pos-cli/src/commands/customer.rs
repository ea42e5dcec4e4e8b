use clap::Subcommand;
use pos_core::CustomerId;
use pos_operations::operations::{ContactUpdate, CustomerOperation, NewCustomer, OrderQuery};
use serde::Serialize;

use crate::environment::Environment;
use crate::error::Result;
use crate::output::{CustomerRow, OrderRow};

#[derive(Subcommand)]
pub(crate) enum CustomerCommand {
    /// Register a customer
    Add {
        id: CustomerId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// List customers
    List,
    /// Show a customer and their orders
    Show { id: CustomerId },
    /// Change contact details; pass an empty value to clear one
    Update {
        id: CustomerId,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Serialize)]
struct CustomerHistory {
    customer: CustomerRow,
    orders: Vec<OrderRow>,
}

pub(crate) fn run(env: &Environment, command: CustomerCommand) -> Result<()> {
    let customers = CustomerOperation::new(&env.ledger, env.clock);

    match command {
        CustomerCommand::Add {
            id,
            name,
            phone,
            email,
        } => {
            let customer = customers.register(NewCustomer {
                id,
                name,
                phone,
                email,
            })?;
            env.printer.done(
                &CustomerRow::from(&customer),
                &format!("Registered customer {} ({})", customer.id, customer.name),
            )
        }
        CustomerCommand::List => {
            let rows: Vec<CustomerRow> =
                customers.customers()?.iter().map(CustomerRow::from).collect();
            env.printer.list(&rows, "No customers.")
        }
        CustomerCommand::Show { id } => {
            let history = CustomerHistory {
                customer: CustomerRow::from(&customers.customer(&id)?),
                orders: OrderQuery::new(&env.ledger)
                    .for_customer(&id)?
                    .iter()
                    .map(OrderRow::from)
                    .collect(),
            };
            env.printer.either(&history, |printer| {
                printer.record(&history.customer)?;
                printer.line("")?;
                printer.list(&history.orders, "No orders.")
            })
        }
        CustomerCommand::Update { id, phone, email } => {
            let customer = customers.update_contact(&id, ContactUpdate { phone, email })?;
            env.printer.done(
                &CustomerRow::from(&customer),
                &format!("Updated contact details for {}", customer.id),
            )
        }
    }
}
