use std::sync::{Mutex, MutexGuard};

use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::schema::CREATE_TABLES;
use crate::session::Session;
use crate::{Result, StoreError};

/// A SQLite database with exactly one connection.
///
/// The connection sits behind a mutex that is held for the full duration of
/// a [`session`](Self::session) or [`transaction`](Self::transaction), so a
/// transaction never sees statements from another caller between `BEGIN`
/// and `COMMIT`.
pub struct Database {
    conn: Mutex<SqliteConnection>,
    location: String,
}

/// Why an immediate transaction ended without committing.
enum Aborted<E> {
    Work(E),
    Store(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for Aborted<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Store(error)
    }
}

impl Database {
    /// Opens (or creates) the database and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the schema
    /// cannot be applied.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mut conn =
            SqliteConnection::establish(&config.path).map_err(|source| StoreError::Connection {
                location: config.path.clone(),
                source,
            })?;

        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            config.busy_timeout_ms
        ))?;
        conn.batch_execute(CREATE_TABLES)?;

        info!(location = %config.path, "opened database");

        Ok(Self {
            conn: Mutex::new(conn),
            location: config.path.clone(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be initialised.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteConnection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Runs `work` with statements committed one by one (autocommit).
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or [`StoreError::Poisoned`].
    pub fn session<T, E>(
        &self,
        work: impl FnOnce(&mut Session<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut conn = self.lock()?;
        let mut session = Session::new(&mut conn);
        work(&mut session)
    }

    /// Runs `work` inside `BEGIN IMMEDIATE`.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back when it
    /// returns `Err`; either way the connection is back in autocommit mode
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a store error converted into
    /// `E` if beginning, committing or rolling back fails.
    pub fn transaction<T, E>(
        &self,
        work: impl FnOnce(&mut Session<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut conn = self.lock()?;
        let outcome = conn.immediate_transaction::<T, Aborted<E>, _>(|conn| {
            let mut session = Session::new(conn);
            work(&mut session).map_err(Aborted::Work)
        });

        match outcome {
            Ok(value) => {
                debug!("transaction committed");
                Ok(value)
            }
            Err(Aborted::Work(error)) => {
                debug!("transaction rolled back");
                Err(error)
            }
            Err(Aborted::Store(error)) => Err(E::from(StoreError::Query(error))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, Utc};
    use pos_core::{
        CardNumber, Customer, CustomerId, Item, ItemCode, LoyaltyCard, Money, Role, StockDetail,
        StockId, User, Username,
    };

    use super::*;

    pub(crate) fn setup_test_db() -> anyhow::Result<Database> {
        Ok(Database::open_in_memory()?)
    }

    pub(crate) fn fixed_time() -> anyhow::Result<DateTime<Utc>> {
        DateTime::from_timestamp(1_700_000_000, 0).ok_or_else(|| anyhow::anyhow!("bad timestamp"))
    }

    pub(crate) fn sample_customer(id: &str) -> anyhow::Result<Customer> {
        Ok(Customer {
            id: CustomerId::new(id)?,
            name: format!("Customer {id}"),
            phone: Some("0771234567".to_string()),
            email: None,
            registered_at: fixed_time()?,
        })
    }

    pub(crate) fn sample_card(number: &str, customer: &str) -> anyhow::Result<LoyaltyCard> {
        Ok(LoyaltyCard {
            number: CardNumber::new(number)?,
            customer_id: CustomerId::new(customer)?,
            discount_bps: 500,
            points: 0,
            issued_at: fixed_time()?,
            active: true,
        })
    }

    pub(crate) fn sample_user(name: &str, role: Role) -> anyhow::Result<User> {
        Ok(User {
            username: Username::new(name)?,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role,
            active: true,
            created_at: fixed_time()?,
        })
    }

    pub(crate) fn sample_item(code: &str) -> anyhow::Result<Item> {
        Ok(Item {
            code: ItemCode::new(code)?,
            description: format!("{code} description"),
            category: "general".to_string(),
        })
    }

    pub(crate) fn sample_stock(id: &str, item: &str, quantity: u32) -> anyhow::Result<StockDetail> {
        Ok(StockDetail {
            id: StockId::new(id)?,
            item_code: ItemCode::new(item)?,
            variant: "default".to_string(),
            unit_price: Money::from_cents(250),
            quantity,
        })
    }

    #[test]
    fn open_in_memory_applies_schema() -> anyhow::Result<()> {
        let db = setup_test_db()?;

        let items = db.session(|s| s.list_items(None))?;

        assert!(items.is_empty());
        assert_eq!(db.location(), ":memory:");
        Ok(())
    }

    #[test]
    fn reopening_file_database_keeps_rows() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("pos.sqlite3");
        let config = StoreConfig::default().with_path(path.to_string_lossy());
        let item = sample_item("MUG")?;

        {
            let db = Database::open(&config)?;
            db.session(|s| s.insert_item(&item))?;
        }
        let db = Database::open(&config)?;

        let items = db.session(|s| s.list_items(None))?;

        assert_eq!(items.len(), 1);
        Ok(())
    }

    #[test]
    fn transaction_commits_on_ok() -> anyhow::Result<()> {
        let db = setup_test_db()?;
        let item = sample_item("MUG")?;

        db.transaction::<_, StoreError>(|s| s.insert_item(&item))?;

        assert!(db.session(|s| s.find_item(&item.code))?.is_some());
        Ok(())
    }

    #[test]
    fn transaction_rolls_back_on_err() -> anyhow::Result<()> {
        let db = setup_test_db()?;
        let item = sample_item("MUG")?;

        let result = db.transaction::<(), StoreError>(|s| {
            s.insert_item(&item)?;
            Err(StoreError::Poisoned)
        });

        assert!(matches!(result, Err(StoreError::Poisoned)));
        assert!(db.session(|s| s.find_item(&item.code))?.is_none());
        Ok(())
    }

    #[test]
    fn autocommit_is_restored_after_rollback() -> anyhow::Result<()> {
        let db = setup_test_db()?;
        let first = sample_item("MUG")?;
        let second = sample_item("CUP")?;

        let _ = db.transaction::<(), StoreError>(|s| {
            s.insert_item(&first)?;
            Err(StoreError::Poisoned)
        });
        db.session(|s| s.insert_item(&second))?;

        let items = db.session(|s| s.list_items(None))?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, second.code);
        Ok(())
    }
}
