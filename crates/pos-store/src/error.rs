use pos_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at '{location}'")]
    Connection {
        location: String,
        #[source]
        source: diesel::ConnectionError,
    },

    #[error("database query failed")]
    Query(#[from] diesel::result::Error),

    #[error("database connection lock poisoned by an earlier panic")]
    Poisoned,

    #[error("invalid value stored in table '{table}'")]
    Corrupt {
        table: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("column '{table}.{column}' holds out-of-range value {value}")]
    OutOfRange {
        table: &'static str,
        column: &'static str,
        value: i64,
    },

    #[error("quantity {0} is too large to store")]
    QuantityTooLarge(u32),
}
