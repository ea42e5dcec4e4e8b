use diesel::prelude::*;
use pos_core::{ItemCode, Money, StockDetail, StockId};

use super::Session;
use crate::Result;
use crate::models::{StockDetailRow, to_db_count};
use crate::schema::stock_details;

impl Session<'_> {
    /// # Errors
    ///
    /// Returns an error if the insert fails (duplicate id, unknown item).
    pub fn insert_stock_detail(&mut self, stock: &StockDetail) -> Result<usize> {
        let row = StockDetailRow::try_from(stock)?;
        Ok(diesel::insert_into(stock_details::table)
            .values(&row)
            .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn find_stock_detail(&mut self, id: &StockId) -> Result<Option<StockDetail>> {
        let row: Option<StockDetailRow> = stock_details::table
            .find(id.as_str())
            .select(StockDetailRow::as_select())
            .first(self.conn())
            .optional()?;
        row.map(StockDetail::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_stock_details(&mut self, item: Option<&ItemCode>) -> Result<Vec<StockDetail>> {
        let rows: Vec<StockDetailRow> = match item {
            Some(item) => stock_details::table
                .filter(stock_details::item_code.eq(item.as_str()))
                .order(stock_details::id.asc())
                .select(StockDetailRow::as_select())
                .load(self.conn())?,
            None => stock_details::table
                .order(stock_details::id.asc())
                .select(StockDetailRow::as_select())
                .load(self.conn())?,
        };
        rows.into_iter().map(StockDetail::try_from).collect()
    }

    /// Stock details holding `threshold` units or fewer, emptiest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is invalid.
    pub fn list_low_stock(&mut self, threshold: u32) -> Result<Vec<StockDetail>> {
        let threshold = to_db_count(threshold)?;
        let rows: Vec<StockDetailRow> = stock_details::table
            .filter(stock_details::quantity.le(threshold))
            .order((stock_details::quantity.asc(), stock_details::id.asc()))
            .select(StockDetailRow::as_select())
            .load(self.conn())?;
        rows.into_iter().map(StockDetail::try_from).collect()
    }

    /// Takes `quantity` units out of stock in a single statement.
    ///
    /// Returns 0 when the stock detail does not exist or holds fewer than
    /// `quantity` units, so the counter never goes negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn decrement_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        let quantity = to_db_count(quantity)?;
        Ok(diesel::update(
            stock_details::table
                .filter(stock_details::id.eq(id.as_str()))
                .filter(stock_details::quantity.ge(quantity)),
        )
        .set(stock_details::quantity.eq(stock_details::quantity - quantity))
        .execute(self.conn())?)
    }

    /// Puts `quantity` units back into stock. Returns 0 when the stock detail
    /// does not exist or the counter would overflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn increment_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        let quantity = to_db_count(quantity)?;
        Ok(diesel::update(
            stock_details::table
                .filter(stock_details::id.eq(id.as_str()))
                .filter(stock_details::quantity.le(i32::MAX - quantity)),
        )
        .set(stock_details::quantity.eq(stock_details::quantity + quantity))
        .execute(self.conn())?)
    }

    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_unit_price(&mut self, id: &StockId, unit_price: Money) -> Result<usize> {
        Ok(diesel::update(stock_details::table.find(id.as_str()))
            .set(stock_details::unit_price.eq(unit_price.cents()))
            .execute(self.conn())?)
    }
}

#[cfg(test)]
mod tests {
    use pos_core::{ItemCode, Money, StockId};

    use crate::Database;
    use crate::database::tests::{sample_item, sample_stock, setup_test_db};

    fn seeded(quantity: u32) -> anyhow::Result<(Database, StockId)> {
        let db = setup_test_db()?;
        let item = sample_item("MUG")?;
        let stock = sample_stock("MUG-RED", "MUG", quantity)?;
        db.session(|s| {
            s.insert_item(&item)?;
            s.insert_stock_detail(&stock)
        })?;
        Ok((db, stock.id))
    }

    #[test]
    fn stock_requires_existing_item() -> anyhow::Result<()> {
        let db = setup_test_db()?;
        let stock = sample_stock("GHOST-1", "GHOST", 3)?;

        let result = db.session(|s| s.insert_stock_detail(&stock));

        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn decrement_reduces_quantity() -> anyhow::Result<()> {
        let (db, id) = seeded(10)?;

        let affected = db.session(|s| s.decrement_stock(&id, 4))?;
        let stock = db.session(|s| s.find_stock_detail(&id))?;

        assert_eq!(affected, 1);
        assert_eq!(stock.map(|s| s.quantity), Some(6));
        Ok(())
    }

    #[test]
    fn decrement_beyond_on_hand_touches_nothing() -> anyhow::Result<()> {
        let (db, id) = seeded(3)?;

        let affected = db.session(|s| s.decrement_stock(&id, 4))?;
        let stock = db.session(|s| s.find_stock_detail(&id))?;

        assert_eq!(affected, 0);
        assert_eq!(stock.map(|s| s.quantity), Some(3));
        Ok(())
    }

    #[test]
    fn decrement_unknown_stock_touches_nothing() -> anyhow::Result<()> {
        let (db, _) = seeded(3)?;
        let unknown = StockId::new("NOPE")?;

        assert_eq!(db.session(|s| s.decrement_stock(&unknown, 1))?, 0);
        Ok(())
    }

    #[test]
    fn increment_adds_quantity() -> anyhow::Result<()> {
        let (db, id) = seeded(3)?;

        db.session(|s| s.increment_stock(&id, 7))?;

        let stock = db.session(|s| s.find_stock_detail(&id))?;
        assert_eq!(stock.map(|s| s.quantity), Some(10));
        Ok(())
    }

    #[test]
    fn low_stock_lists_emptiest_first() -> anyhow::Result<()> {
        let (db, _) = seeded(8)?;
        let blue = sample_stock("MUG-BLUE", "MUG", 1)?;
        let green = sample_stock("MUG-GREEN", "MUG", 40)?;
        db.session(|s| {
            s.insert_stock_detail(&blue)?;
            s.insert_stock_detail(&green)
        })?;

        let low = db.session(|s| s.list_low_stock(10))?;

        let ids: Vec<_> = low.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["MUG-BLUE", "MUG-RED"]);
        Ok(())
    }

    #[test]
    fn list_by_item_and_price_update() -> anyhow::Result<()> {
        let (db, id) = seeded(8)?;

        let mug = ItemCode::new("MUG")?;

        db.session(|s| s.update_unit_price(&id, Money::from_cents(999)))?;
        let for_item = db.session(|s| s.list_stock_details(Some(&mug)))?;

        assert_eq!(for_item.len(), 1);
        assert_eq!(for_item[0].unit_price, Money::from_cents(999));
        Ok(())
    }
}
