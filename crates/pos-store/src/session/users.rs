use diesel::prelude::*;
use pos_core::{User, Username};

use super::Session;
use crate::Result;
use crate::models::UserRow;
use crate::schema::users;

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails, for example on a duplicate username.
    pub fn insert_user(&mut self, user: &User) -> Result<usize> {
        let row = UserRow::from(user);
        Ok(diesel::insert_into(users::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_user(&mut self, username: &Username) -> Result<Option<User>> {
        let row: Option<UserRow> = users::table
            .find(username.as_str())
            .select(UserRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(User::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_users(&mut self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = users::table
            .order(users::username.asc())
            .select(UserRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(User::try_from).collect()
    }

    /// Returns 0 when the user does not exist or is already inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn deactivate_user(&mut self, username: &Username) -> Result<usize> {
        Ok(diesel::update(
            users::table
                .filter(users::username.eq(username.as_str()))
                .filter(users::active.eq(true)),
        )
        .set(users::active.eq(false))
        .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<u64> {
        let count: i64 = users::table.count().get_result(self.conn())?;
        Ok(count.unsigned_abs())
    }
}
