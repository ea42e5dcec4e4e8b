use pos_operations::providers::{SqliteLedger, SystemClock};
use pos_store::Database;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::Result;
use crate::output::{OutputFormat, Printer};

/// What every command runs against.
pub(crate) struct Environment {
    pub config: AppConfig,
    pub ledger: SqliteLedger,
    pub printer: Printer,
    pub clock: SystemClock,
}

impl Environment {
    pub(crate) fn open(config: AppConfig, format: OutputFormat) -> Result<Self> {
        let database = Database::open(&config.database)?;
        debug!(location = database.location(), "ledger ready");
        Ok(Self {
            ledger: SqliteLedger::new(database),
            printer: Printer::new(format),
            clock: SystemClock::new(),
            config,
        })
    }
}
