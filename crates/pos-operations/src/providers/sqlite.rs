use std::sync::Arc;

use chrono::{DateTime, Utc};
use pos_core::{
    CardNumber, Customer, CustomerId, Item, ItemCode, LoyaltyCard, Money, Order, OrderHeader,
    OrderId, OrderLine, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus, ReturnRecord,
    StockDetail, StockId, User, Username,
};
use pos_store::{Database, Session};

use crate::Result;
use crate::traits::{Ledger, LedgerSession};

/// [`Ledger`] backed by a SQLite [`Database`].
///
/// Clones share the same database and therefore the same connection lock.
#[derive(Clone)]
pub struct SqliteLedger {
    db: Arc<Database>,
}

impl SqliteLedger {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    #[must_use]
    pub fn from_shared(db: Arc<Database>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Ledger for SqliteLedger {
    fn read<T>(&self, work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>) -> Result<T> {
        self.db.session(|session| work(session))
    }

    fn transaction<T>(
        &self,
        work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>,
    ) -> Result<T> {
        self.db.transaction(|session| work(session))
    }
}

impl LedgerSession for Session<'_> {
    fn insert_item(&mut self, item: &Item) -> Result<usize> {
        Ok(Session::insert_item(self, item)?)
    }

    fn find_item(&mut self, code: &ItemCode) -> Result<Option<Item>> {
        Ok(Session::find_item(self, code)?)
    }

    fn list_items(&mut self, category: Option<&str>) -> Result<Vec<Item>> {
        Ok(Session::list_items(self, category)?)
    }

    fn insert_stock(&mut self, stock: &StockDetail) -> Result<usize> {
        Ok(self.insert_stock_detail(stock)?)
    }

    fn find_stock(&mut self, id: &StockId) -> Result<Option<StockDetail>> {
        Ok(self.find_stock_detail(id)?)
    }

    fn list_stock(&mut self, item: Option<&ItemCode>) -> Result<Vec<StockDetail>> {
        Ok(self.list_stock_details(item)?)
    }

    fn list_low_stock(&mut self, threshold: u32) -> Result<Vec<StockDetail>> {
        Ok(Session::list_low_stock(self, threshold)?)
    }

    fn decrement_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        Ok(Session::decrement_stock(self, id, quantity)?)
    }

    fn increment_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        Ok(Session::increment_stock(self, id, quantity)?)
    }

    fn update_unit_price(&mut self, id: &StockId, unit_price: Money) -> Result<usize> {
        Ok(Session::update_unit_price(self, id, unit_price)?)
    }

    fn insert_customer(&mut self, customer: &Customer) -> Result<usize> {
        Ok(Session::insert_customer(self, customer)?)
    }

    fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>> {
        Ok(Session::find_customer(self, id)?)
    }

    fn list_customers(&mut self) -> Result<Vec<Customer>> {
        Ok(Session::list_customers(self)?)
    }

    fn update_customer_contact(
        &mut self,
        id: &CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<usize> {
        Ok(Session::update_customer_contact(self, id, phone, email)?)
    }

    fn insert_card(&mut self, card: &LoyaltyCard) -> Result<usize> {
        Ok(self.insert_loyalty_card(card)?)
    }

    fn find_card(&mut self, number: &CardNumber) -> Result<Option<LoyaltyCard>> {
        Ok(self.find_loyalty_card(number)?)
    }

    fn find_active_card_for_customer(
        &mut self,
        customer: &CustomerId,
    ) -> Result<Option<LoyaltyCard>> {
        Ok(Session::find_active_card_for_customer(self, customer)?)
    }

    fn deactivate_card(&mut self, number: &CardNumber) -> Result<usize> {
        Ok(self.deactivate_loyalty_card(number)?)
    }

    fn add_loyalty_points(&mut self, number: &CardNumber, points: i64) -> Result<usize> {
        Ok(Session::add_loyalty_points(self, number, points)?)
    }

    fn insert_user(&mut self, user: &User) -> Result<usize> {
        Ok(Session::insert_user(self, user)?)
    }

    fn find_user(&mut self, username: &Username) -> Result<Option<User>> {
        Ok(Session::find_user(self, username)?)
    }

    fn list_users(&mut self) -> Result<Vec<User>> {
        Ok(Session::list_users(self)?)
    }

    fn deactivate_user(&mut self, username: &Username) -> Result<usize> {
        Ok(Session::deactivate_user(self, username)?)
    }

    fn count_users(&mut self) -> Result<u64> {
        Ok(Session::count_users(self)?)
    }

    fn insert_order_header(&mut self, header: &OrderHeader) -> Result<usize> {
        Ok(Session::insert_order_header(self, header)?)
    }

    fn insert_order_line(&mut self, line: &OrderLine) -> Result<usize> {
        Ok(Session::insert_order_line(self, line)?)
    }

    fn find_order(&mut self, id: &OrderId) -> Result<Option<Order>> {
        Ok(Session::find_order(self, id)?)
    }

    fn list_orders(&mut self, limit: u32) -> Result<Vec<OrderHeader>> {
        Ok(Session::list_orders(self, limit)?)
    }

    fn list_orders_for_customer(&mut self, customer: &CustomerId) -> Result<Vec<OrderHeader>> {
        Ok(Session::list_orders_for_customer(self, customer)?)
    }

    fn insert_return(&mut self, record: &ReturnRecord) -> Result<()> {
        Ok(Session::insert_return(self, record)?)
    }

    fn returned_quantity(&mut self, order: &OrderId, line_no: u32) -> Result<u32> {
        Ok(Session::returned_quantity(self, order, line_no)?)
    }

    fn list_returns(&mut self, order: &OrderId) -> Result<Vec<ReturnRecord>> {
        Ok(Session::list_returns(self, order)?)
    }

    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<()> {
        Ok(Session::insert_purchase_order(self, order)?)
    }

    fn find_purchase_order(&mut self, id: &PurchaseOrderId) -> Result<Option<PurchaseOrder>> {
        Ok(Session::find_purchase_order(self, id)?)
    }

    fn list_purchase_orders(
        &mut self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>> {
        Ok(Session::list_purchase_orders(self, status)?)
    }

    fn mark_purchase_order_received(
        &mut self,
        id: &PurchaseOrderId,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        Ok(Session::mark_purchase_order_received(self, id, at)?)
    }
}
