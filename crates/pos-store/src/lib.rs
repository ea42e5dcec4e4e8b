//! SQLite persistence for the point-of-sale ledger.
//!
//! A [`Database`] owns a single connection. All access goes through a
//! [`Session`], either in autocommit mode via [`Database::session`] or
//! inside one SQL transaction via [`Database::transaction`].

mod config;
mod database;
mod error;
mod models;
mod schema;
mod session;

pub use config::StoreConfig;
pub use database::Database;
pub use error::StoreError;
pub use session::Session;

pub type Result<T> = std::result::Result<T, StoreError>;
