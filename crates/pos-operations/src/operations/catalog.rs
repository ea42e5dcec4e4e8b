use pos_core::{Item, ItemCode, Money, StockDetail, StockId};
use pos_store::StoreError;
use tracing::info;

use crate::traits::{Ledger, LedgerSession};
use crate::{OperationError, Result};

/// Items and the stock records that hold their on-hand quantities.
pub struct CatalogOperation<L> {
    ledger: L,
}

impl<L: Ledger> CatalogOperation<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// # Errors
    ///
    /// Returns [`OperationError::AlreadyExists`] if the code is taken.
    pub fn add_item(&self, item: &Item) -> Result<()> {
        self.ledger.transaction(|session| {
            if session.find_item(&item.code)?.is_some() {
                return Err(OperationError::AlreadyExists {
                    kind: "item",
                    id: item.code.to_string(),
                });
            }
            session.insert_item(item)?;
            info!(item = %item.code, "item added");
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownItem`] if no such item exists.
    pub fn item(&self, code: &ItemCode) -> Result<Item> {
        self.ledger.read(|session| {
            session
                .find_item(code)?
                .ok_or_else(|| OperationError::UnknownItem(code.clone()))
        })
    }

    /// # Errors
    ///
    /// Returns an error if the items cannot be read.
    pub fn items(&self, category: Option<&str>) -> Result<Vec<Item>> {
        self.ledger.read(|session| session.list_items(category))
    }

    /// # Errors
    ///
    /// Returns an error if the item is unknown or the stock id is taken.
    pub fn add_stock(&self, stock: &StockDetail) -> Result<()> {
        if stock.unit_price.is_negative() {
            return Err(OperationError::NegativePrice);
        }
        self.ledger.transaction(|session| {
            if session.find_item(&stock.item_code)?.is_none() {
                return Err(OperationError::UnknownItem(stock.item_code.clone()));
            }
            if session.find_stock(&stock.id)?.is_some() {
                return Err(OperationError::AlreadyExists {
                    kind: "stock",
                    id: stock.id.to_string(),
                });
            }
            session.insert_stock(stock)?;
            info!(stock = %stock.id, item = %stock.item_code, quantity = stock.quantity, "stock added");
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownStock`] if no such stock exists.
    pub fn stock(&self, id: &StockId) -> Result<StockDetail> {
        self.ledger.read(|session| find_stock(session, id))
    }

    /// # Errors
    ///
    /// Returns an error if the stock records cannot be read.
    pub fn stock_for(&self, item: Option<&ItemCode>) -> Result<Vec<StockDetail>> {
        self.ledger.read(|session| session.list_stock(item))
    }

    /// Stock records with at most `threshold` units on hand, emptiest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the stock records cannot be read.
    pub fn low_stock(&self, threshold: u32) -> Result<Vec<StockDetail>> {
        self.ledger.read(|session| session.list_low_stock(threshold))
    }

    /// Adds `delta` units (or removes them when negative) and returns the
    /// updated record.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NegativeStock`] if fewer than `-delta` units
    /// are on hand, [`OperationError::StockDeltaOutOfRange`] if `delta` does
    /// not fit a stock quantity, or [`OperationError::UnknownStock`].
    pub fn adjust_stock(&self, id: &StockId, delta: i64) -> Result<StockDetail> {
        self.ledger.transaction(|session| {
            let current = find_stock(session, id)?;
            let amount = u32::try_from(delta.unsigned_abs())
                .map_err(|_| OperationError::StockDeltaOutOfRange {
                    stock: id.clone(),
                    delta,
                })?;

            let written = if delta < 0 {
                session.decrement_stock(id, amount)?
            } else if delta > 0 {
                session.increment_stock(id, amount)?
            } else {
                1
            };

            if written == 0 {
                if delta < 0 {
                    return Err(OperationError::NegativeStock {
                        stock: id.clone(),
                        delta,
                        available: current.quantity,
                    });
                }
                return Err(StoreError::QuantityTooLarge(amount).into());
            }

            let updated = find_stock(session, id)?;
            info!(stock = %id, delta, quantity = updated.quantity, "stock adjusted");
            Ok(updated)
        })
    }

    /// # Errors
    ///
    /// Returns [`OperationError::UnknownStock`] if no such stock exists.
    pub fn set_unit_price(&self, id: &StockId, unit_price: Money) -> Result<StockDetail> {
        if unit_price.is_negative() {
            return Err(OperationError::NegativePrice);
        }
        self.ledger.transaction(|session| {
            if session.update_unit_price(id, unit_price)? == 0 {
                return Err(OperationError::UnknownStock(id.clone()));
            }
            find_stock(session, id)
        })
    }
}

fn find_stock(session: &mut dyn LedgerSession, id: &StockId) -> Result<StockDetail> {
    session
        .find_stock(id)?
        .ok_or_else(|| OperationError::UnknownStock(id.clone()))
}
