//! Domain types shared by every layer of the point-of-sale ledger.
//!
//! Nothing in this crate touches storage. Identifiers, money and the
//! records that describe the catalog, customers, sales, returns and
//! purchase orders live here together with their validation rules.

pub mod error;
mod ids;
mod money;
pub mod types;

pub use error::*;
pub use ids::{
    CardNumber, CustomerId, ItemCode, MAX_IDENTIFIER_LEN, OrderId, PurchaseOrderId, ReturnId,
    StockId, Username,
};
pub use money::Money;
pub use types::*;
