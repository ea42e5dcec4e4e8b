use std::io::{self, Write as _};

use clap::ValueEnum;
use serde::Serialize;

use super::table::{Row, render_record, render_table};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned text for people
    #[default]
    Plain,
    /// Pretty-printed JSON for scripts
    Json,
}

/// Writes command results to stdout in the chosen format.
///
/// Plain output shows tables and short confirmations; JSON output always
/// emits the underlying record so scripts never parse prose.
pub(crate) struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub(crate) fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub(crate) fn list<R: Row>(&self, rows: &[R], empty: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => write_json(rows),
            OutputFormat::Plain if rows.is_empty() => write_text(&format!("{empty}\n")),
            OutputFormat::Plain => write_text(&render_table(rows)),
        }
    }

    pub(crate) fn record<R: Row>(&self, row: &R) -> Result<()> {
        match self.format {
            OutputFormat::Json => write_json(row),
            OutputFormat::Plain => write_text(&render_record(row)),
        }
    }

    /// Confirms an action: `message` in plain mode, `value` in JSON mode.
    pub(crate) fn done<T: Serialize + ?Sized>(&self, value: &T, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Plain => self.line(message),
        }
    }

    /// Emits `value` as JSON, or hands over to `plain` for a text layout
    /// built from several tables.
    pub(crate) fn either<T: Serialize + ?Sized>(
        &self,
        value: &T,
        plain: impl FnOnce(&Self) -> Result<()>,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Plain => plain(self),
        }
    }

    /// Prints a line of prose; JSON output leaves it out.
    pub(crate) fn line(&self, text: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => Ok(()),
            OutputFormat::Plain => write_text(&format!("{text}\n")),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_text(&json)
}

fn write_text(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
