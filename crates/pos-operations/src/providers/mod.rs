mod clock;
mod sqlite;

pub use clock::SystemClock;
pub use sqlite::SqliteLedger;
