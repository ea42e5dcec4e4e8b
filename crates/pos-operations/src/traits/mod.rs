mod clock;
mod ledger;

pub use clock::Clock;
pub use ledger::{Ledger, LedgerSession};
