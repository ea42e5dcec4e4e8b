//! Business operations for the point-of-sale ledger.
//!
//! Operations are generic over the [`traits::Ledger`] and [`traits::Clock`]
//! ports. [`providers`] binds them to SQLite and the system clock; unit tests
//! bind them to in-memory mocks.

mod error;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(test)]
pub(crate) mod mocks;

pub use error::{OperationError, Result};
