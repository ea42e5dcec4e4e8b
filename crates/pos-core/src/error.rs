use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("{kind} cannot be empty")]
    EmptyIdentifier { kind: &'static str },

    #[error("{kind} '{value}' is longer than {max} characters")]
    IdentifierTooLong {
        kind: &'static str,
        value: String,
        max: usize,
    },

    #[error("invalid money amount '{0}'")]
    InvalidMoney(String),

    #[error("amount overflow while computing {0}")]
    MoneyOverflow(&'static str),

    #[error("discount rate of {0} basis points exceeds 100%")]
    InvalidDiscountRate(u32),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown purchase order status '{0}'")]
    UnknownPurchaseOrderStatus(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
