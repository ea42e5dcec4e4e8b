use chrono::{DateTime, Utc};
use pos_core::{
    CardNumber, Customer, CustomerId, Item, ItemCode, LoyaltyCard, Money, Order, OrderHeader,
    OrderId, OrderLine, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus, ReturnRecord,
    StockDetail, StockId, User, Username,
};

use crate::Result;

/// Storage for the sales ledger.
///
/// Operations never touch tables directly; they hand a closure to
/// [`read`](Self::read) or [`transaction`](Self::transaction) and work
/// through the [`LedgerSession`] it receives.
pub trait Ledger: Send + Sync {
    /// Runs `work` with every statement committed on its own.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work` or by the underlying store.
    fn read<T>(&self, work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>) -> Result<T>;

    /// Runs `work` atomically: all of its writes become visible together on
    /// `Ok`, and none of them survive an `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a store error if the
    /// transaction cannot begin, commit or roll back.
    fn transaction<T>(&self, work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>)
    -> Result<T>;
}

impl<L: Ledger> Ledger for &L {
    fn read<T>(&self, work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>) -> Result<T> {
        (**self).read(work)
    }

    fn transaction<T>(
        &self,
        work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>,
    ) -> Result<T> {
        (**self).transaction(work)
    }
}

/// Row-level access used inside a [`Ledger`] call.
///
/// Writes return the number of rows they touched; a conditional write that
/// matched nothing returns 0 rather than an error.
pub trait LedgerSession {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_item(&mut self, item: &Item) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_item(&mut self, code: &ItemCode) -> Result<Option<Item>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_items(&mut self, category: Option<&str>) -> Result<Vec<Item>>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_stock(&mut self, stock: &StockDetail) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_stock(&mut self, id: &StockId) -> Result<Option<StockDetail>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_stock(&mut self, item: Option<&ItemCode>) -> Result<Vec<StockDetail>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_low_stock(&mut self, threshold: u32) -> Result<Vec<StockDetail>>;

    /// Takes `quantity` off the on-hand counter only if that many are
    /// available.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn decrement_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn increment_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn update_unit_price(&mut self, id: &StockId, unit_price: Money) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_customer(&mut self, customer: &Customer) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_customers(&mut self) -> Result<Vec<Customer>>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn update_customer_contact(
        &mut self,
        id: &CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_card(&mut self, card: &LoyaltyCard) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_card(&mut self, number: &CardNumber) -> Result<Option<LoyaltyCard>>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_active_card_for_customer(&mut self, customer: &CustomerId)
    -> Result<Option<LoyaltyCard>>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn deactivate_card(&mut self, number: &CardNumber) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn add_loyalty_points(&mut self, number: &CardNumber, points: i64) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_user(&mut self, user: &User) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_user(&mut self, username: &Username) -> Result<Option<User>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_users(&mut self) -> Result<Vec<User>>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn deactivate_user(&mut self, username: &Username) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_users(&mut self) -> Result<u64>;

    /// # Errors
    ///
    /// Returns an error if the insert fails for a reason other than an
    /// existing header with the same id.
    fn insert_order_header(&mut self, header: &OrderHeader) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the insert fails for a reason other than an
    /// existing line in the same slot.
    fn insert_order_line(&mut self, line: &OrderLine) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_order(&mut self, id: &OrderId) -> Result<Option<Order>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_orders(&mut self, limit: u32) -> Result<Vec<OrderHeader>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_orders_for_customer(&mut self, customer: &CustomerId) -> Result<Vec<OrderHeader>>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_return(&mut self, record: &ReturnRecord) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn returned_quantity(&mut self, order: &OrderId, line_no: u32) -> Result<u32>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_returns(&mut self, order: &OrderId) -> Result<Vec<ReturnRecord>>;

    /// # Errors
    ///
    /// Returns an error if any insert fails.
    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_purchase_order(&mut self, id: &PurchaseOrderId) -> Result<Option<PurchaseOrder>>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_purchase_orders(
        &mut self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>>;

    /// Flips an open purchase order to received; 0 rows if it was not open.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn mark_purchase_order_received(
        &mut self,
        id: &PurchaseOrderId,
        at: DateTime<Utc>,
    ) -> Result<usize>;
}
