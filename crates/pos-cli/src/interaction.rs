use std::io::{self, BufRead as _, IsTerminal};

use dialoguer::Password;

use crate::error::{CliError, Result};

/// Where a command takes a password from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PasswordSource {
    Prompt { confirm: bool },
    Stdin,
}

impl PasswordSource {
    pub(crate) fn new(from_stdin: bool, confirm: bool) -> Self {
        if from_stdin {
            Self::Stdin
        } else {
            Self::Prompt { confirm }
        }
    }

    pub(crate) fn read(self) -> Result<String> {
        match self {
            Self::Stdin => read_line(io::stdin().lock()),
            Self::Prompt { confirm } => prompt(confirm),
        }
    }
}

fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

fn prompt(confirm: bool) -> Result<String> {
    if !is_interactive() {
        return Err(CliError::NotATty);
    }

    let mut password = Password::new().with_prompt("Password");
    if confirm {
        password = password.with_confirmation("Repeat password", "Passwords do not match");
    }
    password.interact().map_err(|e| match e {
        dialoguer::Error::IO(io_err) => CliError::Io(io_err),
    })
}

/// First line of `input` without its line ending.
fn read_line(mut input: impl io::BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }
    Ok(password.to_string())
}
