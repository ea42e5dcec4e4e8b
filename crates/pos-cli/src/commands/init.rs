use clap::Args;
use pos_core::{Role, Username};
use pos_operations::operations::UserOperation;
use serde::Serialize;

use crate::environment::Environment;
use crate::error::{CliError, Result};
use crate::interaction::PasswordSource;

#[derive(Args)]
pub(crate) struct InitArgs {
    /// Create this admin account when the database has no users yet
    #[arg(long, value_name = "USERNAME")]
    admin: Option<Username>,

    /// Read the admin password from the first line of stdin
    #[arg(long, requires = "admin")]
    password_stdin: bool,
}

#[derive(Serialize)]
struct InitReport<'a> {
    database: &'a str,
    admin: Option<&'a str>,
}

pub(crate) fn run(env: &Environment, args: &InitArgs) -> Result<()> {
    let database = env.ledger.database().location();

    if let Some(admin) = &args.admin {
        let users = UserOperation::new(&env.ledger, env.clock);
        if users.has_users()? {
            return Err(CliError::AlreadyInitialised);
        }
        let password = PasswordSource::new(args.password_stdin, true).read()?;
        users.create(admin.clone(), &password, Role::Admin)?;
    }

    let report = InitReport {
        database,
        admin: args.admin.as_ref().map(Username::as_str),
    };
    let message = match report.admin {
        Some(admin) => format!(
            "Initialised {} at {database} with admin '{admin}'",
            env.config.shop.name
        ),
        None => format!("Initialised {} at {database}", env.config.shop.name),
    };
    env.printer.done(&report, &message)
}
