mod customers;
mod items;
mod loyalty;
mod orders;
mod purchase_orders;
mod returns;
mod stock;
mod users;

use diesel::SqliteConnection;

/// Table access over one borrowed connection.
///
/// A session obtained from [`Database::transaction`](crate::Database::transaction)
/// runs every call inside the same SQL transaction; one obtained from
/// [`Database::session`](crate::Database::session) commits each statement on
/// its own. Inserts and updates report the number of rows they touched.
pub struct Session<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> Session<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    fn conn(&mut self) -> &mut SqliteConnection {
        self.conn
    }
}
