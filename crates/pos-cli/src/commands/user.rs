use clap::Subcommand;
use pos_core::{Role, Username};
use pos_operations::operations::UserOperation;

use crate::environment::Environment;
use crate::error::Result;
use crate::interaction::PasswordSource;
use crate::output::UserRow;

#[derive(Subcommand)]
pub(crate) enum UserCommand {
    /// Create an operator account
    Add {
        username: Username,
        #[arg(long, value_enum, default_value_t = Role::Cashier)]
        role: Role,
        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },
    /// List operator accounts
    List,
    /// Check a username and password
    Login {
        username: Username,
        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },
    /// Stop an account from logging in or placing orders
    Deactivate { username: Username },
}

pub(crate) fn run(env: &Environment, command: UserCommand) -> Result<()> {
    let users = UserOperation::new(&env.ledger, env.clock);

    match command {
        UserCommand::Add {
            username,
            role,
            password_stdin,
        } => {
            let password = PasswordSource::new(password_stdin, true).read()?;
            let user = users.create(username, &password, role)?;
            env.printer.done(
                &UserRow::from(&user),
                &format!("Created {} account {}", user.role, user.username),
            )
        }
        UserCommand::List => {
            let rows: Vec<UserRow> = users.users()?.iter().map(UserRow::from).collect();
            env.printer.list(&rows, "No users.")
        }
        UserCommand::Login {
            username,
            password_stdin,
        } => {
            let password = PasswordSource::new(password_stdin, false).read()?;
            let user = users.authenticate(&username, &password)?;
            env.printer.done(
                &UserRow::from(&user),
                &format!("Logged in as {} ({})", user.username, user.role),
            )
        }
        UserCommand::Deactivate { username } => {
            let user = users.deactivate(&username)?;
            env.printer.done(
                &UserRow::from(&user),
                &format!("Deactivated {}", user.username),
            )
        }
    }
}
