use pos_core::{
    CardNumber, CoreError, CustomerId, ItemCode, OrderId, PurchaseOrderId, StockId, Username,
};
use pos_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("order has no lines")]
    EmptyOrder,

    #[error("line {line_no} has zero quantity")]
    ZeroQuantity { line_no: u32 },

    #[error("unknown item '{0}'")]
    UnknownItem(ItemCode),

    #[error("unknown stock '{0}'")]
    UnknownStock(StockId),

    #[error("unknown customer '{0}'")]
    UnknownCustomer(CustomerId),

    #[error("unknown operator '{0}'")]
    UnknownOperator(Username),

    #[error("operator '{0}' is inactive")]
    InactiveOperator(Username),

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("insufficient stock for '{stock}': requested {requested}, available {available}")]
    InsufficientStock {
        stock: StockId,
        requested: u32,
        available: u32,
    },

    #[error("stock adjustment of {delta} on '{stock}' would take it below zero ({available} on hand)")]
    NegativeStock {
        stock: StockId,
        delta: i64,
        available: u32,
    },

    #[error("stock adjustment of {delta} on '{stock}' is out of range")]
    StockDeltaOutOfRange { stock: StockId, delta: i64 },

    #[error("order header '{0}' was not persisted")]
    OrderNotPersisted(OrderId),

    #[error("line {line_no} of order '{order}' was not persisted")]
    LineNotPersisted { order: OrderId, line_no: u32 },

    #[error("loyalty card '{0}' not found")]
    CardNotFound(CardNumber),

    #[error("loyalty card '{0}' is inactive")]
    CardInactive(CardNumber),

    #[error("loyalty card '{card}' does not belong to customer '{customer}'")]
    CardNotOwned {
        card: CardNumber,
        customer: CustomerId,
    },

    #[error("customer '{0}' already holds an active loyalty card")]
    DuplicateActiveCard(CustomerId),

    #[error("discounts exceed the order subtotal")]
    NegativeTotal,

    #[error("discount on line {line_no} exceeds the line price")]
    NegativeLineAmount { line_no: u32 },

    #[error("discount must not be negative")]
    NegativeDiscount,

    #[error("price must not be negative")]
    NegativePrice,

    #[error("amount overflow while computing {0}")]
    MoneyOverflow(&'static str),

    #[error("order '{0}' not found")]
    OrderNotFound(OrderId),

    #[error("order '{order}' has no line {line_no}")]
    OrderLineNotFound { order: OrderId, line_no: u32 },

    #[error(
        "cannot return {requested} of line {line_no} on order '{order}': only {returnable} returnable"
    )]
    ReturnExceedsPurchased {
        order: OrderId,
        line_no: u32,
        requested: u32,
        returnable: u32,
    },

    #[error("purchase order has no lines")]
    EmptyPurchaseOrder,

    #[error("purchase order '{0}' not found")]
    PurchaseOrderNotFound(PurchaseOrderId),

    #[error("purchase order '{0}' is not open")]
    PurchaseOrderNotOpen(PurchaseOrderId),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("user '{0}' not found")]
    UserNotFound(Username),
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_quantities() -> anyhow::Result<()> {
        let err = OperationError::InsufficientStock {
            stock: StockId::new("MUG-RED")?,
            requested: 5,
            available: 2,
        };

        let msg = err.to_string();

        assert!(msg.contains("MUG-RED"));
        assert!(msg.contains("requested 5"));
        assert!(msg.contains("available 2"));
        Ok(())
    }

    #[test]
    fn store_errors_convert_transparently() {
        let err: OperationError = StoreError::Poisoned.into();

        assert!(matches!(err, OperationError::Store(StoreError::Poisoned)));
        assert_eq!(err.to_string(), StoreError::Poisoned.to_string());
    }
}
