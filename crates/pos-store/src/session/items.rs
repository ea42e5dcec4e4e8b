use diesel::prelude::*;
use pos_core::{Item, ItemCode};

use super::Session;
use crate::Result;
use crate::models::ItemRow;
use crate::schema::items;

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails, for example on a duplicate code.
    pub fn insert_item(&mut self, item: &Item) -> Result<usize> {
        let row = ItemRow::from(item);
        Ok(diesel::insert_into(items::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_item(&mut self, code: &ItemCode) -> Result<Option<Item>> {
        let row: Option<ItemRow> = items::table
            .find(code.as_str())
            .select(ItemRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(Item::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_items(&mut self, category: Option<&str>) -> Result<Vec<Item>> {
        let rows: Vec<ItemRow> = match category {
            Some(category) => items::table
                .filter(items::category.eq(category))
                .order(items::code.asc())
                .select(ItemRow::as_select())
                .load(self.conn())?,
            None => items::table
                .order(items::code.asc())
                .select(ItemRow::as_select())
                .load(self.conn())?,
        };
        rows.into_iter().map(Item::try_from).collect()
    }
}
