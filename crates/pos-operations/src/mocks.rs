use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use pos_core::{
    CardNumber, Customer, CustomerId, Item, ItemCode, LoyaltyCard, Money, Order, OrderHeader,
    OrderId, OrderLine, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus, ReturnRecord, Role,
    StockDetail, StockId, User, Username,
};
use pos_store::StoreError;

use crate::Result;
use crate::traits::{Clock, Ledger, LedgerSession};

#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub items: BTreeMap<ItemCode, Item>,
    pub stock: BTreeMap<StockId, StockDetail>,
    pub customers: BTreeMap<CustomerId, Customer>,
    pub cards: BTreeMap<CardNumber, LoyaltyCard>,
    pub users: BTreeMap<Username, User>,
    pub orders: BTreeMap<OrderId, OrderHeader>,
    pub lines: Vec<OrderLine>,
    pub returns: Vec<ReturnRecord>,
    pub purchase_orders: BTreeMap<PurchaseOrderId, PurchaseOrder>,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    reject_header: bool,
    reject_line: Option<u32>,
    fail_decrement: Option<StockId>,
}

/// In-memory [`Ledger`] that restores its state when a transaction fails.
///
/// Every write call is recorded by name, including calls that are later
/// rolled back.
#[derive(Default)]
pub struct MockLedger {
    state: Mutex<MockState>,
    calls: Mutex<Vec<String>>,
    faults: Faults,
}

impl MockLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn with_item(self, item: Item) -> Self {
        self.state
            .lock()
            .expect("mock state lock")
            .items
            .insert(item.code.clone(), item);
        self
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn with_stock(self, stock: StockDetail) -> Self {
        self.state
            .lock()
            .expect("mock state lock")
            .stock
            .insert(stock.id.clone(), stock);
        self
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn with_customer(self, customer: Customer) -> Self {
        self.state
            .lock()
            .expect("mock state lock")
            .customers
            .insert(customer.id.clone(), customer);
        self
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn with_card(self, card: LoyaltyCard) -> Self {
        self.state
            .lock()
            .expect("mock state lock")
            .cards
            .insert(card.number.clone(), card);
        self
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.state
            .lock()
            .expect("mock state lock")
            .users
            .insert(user.username.clone(), user);
        self
    }

    /// Order header inserts report zero rows written.
    #[must_use]
    pub fn rejecting_header(mut self) -> Self {
        self.faults.reject_header = true;
        self
    }

    /// The insert of line `line_no` reports zero rows written.
    #[must_use]
    pub fn rejecting_line(mut self, line_no: u32) -> Self {
        self.faults.reject_line = Some(line_no);
        self
    }

    /// Decrementing `stock` fails with a store error.
    #[must_use]
    pub fn failing_decrement(mut self, stock: StockId) -> Self {
        self.faults.fail_decrement = Some(stock);
        self
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn state(&self) -> MockState {
        self.state.lock().expect("mock state lock").clone()
    }

    /// # Panics
    ///
    /// Panics if the calls lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock calls lock").clone()
    }

    #[must_use]
    pub fn calls_named(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| *call == name).count()
    }

    #[must_use]
    pub fn stock_quantity(&self, id: &str) -> Option<u32> {
        let id = StockId::new(id).ok()?;
        self.state().stock.get(&id).map(|stock| stock.quantity)
    }
}

impl Ledger for MockLedger {
    fn read<T>(&self, work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let mut calls = self.calls.lock().map_err(|_| StoreError::Poisoned)?;
        let mut session = MockSession {
            state: &mut *state,
            calls: &mut *calls,
            faults: &self.faults,
        };
        work(&mut session)
    }

    fn transaction<T>(
        &self,
        work: impl FnOnce(&mut dyn LedgerSession) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let mut calls = self.calls.lock().map_err(|_| StoreError::Poisoned)?;
        let snapshot = state.clone();
        let mut session = MockSession {
            state: &mut *state,
            calls: &mut *calls,
            faults: &self.faults,
        };
        let outcome = work(&mut session);
        if outcome.is_err() {
            *state = snapshot;
        }
        outcome
    }
}

struct MockSession<'a> {
    state: &'a mut MockState,
    calls: &'a mut Vec<String>,
    faults: &'a Faults,
}

impl MockSession<'_> {
    fn record(&mut self, name: &str) {
        self.calls.push(name.to_string());
    }
}

fn insert_new<K: Ord, V>(map: &mut BTreeMap<K, V>, key: K, value: V) -> usize {
    if map.contains_key(&key) {
        return 0;
    }
    map.insert(key, value);
    1
}

impl LedgerSession for MockSession<'_> {
    fn insert_item(&mut self, item: &Item) -> Result<usize> {
        self.record("insert_item");
        Ok(insert_new(
            &mut self.state.items,
            item.code.clone(),
            item.clone(),
        ))
    }

    fn find_item(&mut self, code: &ItemCode) -> Result<Option<Item>> {
        Ok(self.state.items.get(code).cloned())
    }

    fn list_items(&mut self, category: Option<&str>) -> Result<Vec<Item>> {
        Ok(self
            .state
            .items
            .values()
            .filter(|item| category.is_none_or(|c| item.category == c))
            .cloned()
            .collect())
    }

    fn insert_stock(&mut self, stock: &StockDetail) -> Result<usize> {
        self.record("insert_stock");
        Ok(insert_new(
            &mut self.state.stock,
            stock.id.clone(),
            stock.clone(),
        ))
    }

    fn find_stock(&mut self, id: &StockId) -> Result<Option<StockDetail>> {
        Ok(self.state.stock.get(id).cloned())
    }

    fn list_stock(&mut self, item: Option<&ItemCode>) -> Result<Vec<StockDetail>> {
        Ok(self
            .state
            .stock
            .values()
            .filter(|stock| item.is_none_or(|code| &stock.item_code == code))
            .cloned()
            .collect())
    }

    fn list_low_stock(&mut self, threshold: u32) -> Result<Vec<StockDetail>> {
        let mut low: Vec<StockDetail> = self
            .state
            .stock
            .values()
            .filter(|stock| stock.quantity <= threshold)
            .cloned()
            .collect();
        low.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.id.cmp(&b.id)));
        Ok(low)
    }

    fn decrement_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        self.record("decrement_stock");
        if self.faults.fail_decrement.as_ref() == Some(id) {
            return Err(StoreError::Poisoned.into());
        }
        match self.state.stock.get_mut(id) {
            Some(stock) if stock.quantity >= quantity => {
                stock.quantity -= quantity;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn increment_stock(&mut self, id: &StockId, quantity: u32) -> Result<usize> {
        self.record("increment_stock");
        match self.state.stock.get_mut(id) {
            Some(stock) => match stock.quantity.checked_add(quantity) {
                Some(total) => {
                    stock.quantity = total;
                    Ok(1)
                }
                None => Ok(0),
            },
            None => Ok(0),
        }
    }

    fn update_unit_price(&mut self, id: &StockId, unit_price: Money) -> Result<usize> {
        self.record("update_unit_price");
        match self.state.stock.get_mut(id) {
            Some(stock) => {
                stock.unit_price = unit_price;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn insert_customer(&mut self, customer: &Customer) -> Result<usize> {
        self.record("insert_customer");
        Ok(insert_new(
            &mut self.state.customers,
            customer.id.clone(),
            customer.clone(),
        ))
    }

    fn find_customer(&mut self, id: &CustomerId) -> Result<Option<Customer>> {
        Ok(self.state.customers.get(id).cloned())
    }

    fn list_customers(&mut self) -> Result<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.state.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(customers)
    }

    fn update_customer_contact(
        &mut self,
        id: &CustomerId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<usize> {
        self.record("update_customer_contact");
        match self.state.customers.get_mut(id) {
            Some(customer) => {
                customer.phone = phone.map(str::to_string);
                customer.email = email.map(str::to_string);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn insert_card(&mut self, card: &LoyaltyCard) -> Result<usize> {
        self.record("insert_card");
        Ok(insert_new(
            &mut self.state.cards,
            card.number.clone(),
            card.clone(),
        ))
    }

    fn find_card(&mut self, number: &CardNumber) -> Result<Option<LoyaltyCard>> {
        Ok(self.state.cards.get(number).cloned())
    }

    fn find_active_card_for_customer(
        &mut self,
        customer: &CustomerId,
    ) -> Result<Option<LoyaltyCard>> {
        Ok(self
            .state
            .cards
            .values()
            .find(|card| card.active && &card.customer_id == customer)
            .cloned())
    }

    fn deactivate_card(&mut self, number: &CardNumber) -> Result<usize> {
        self.record("deactivate_card");
        match self.state.cards.get_mut(number) {
            Some(card) if card.active => {
                card.active = false;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn add_loyalty_points(&mut self, number: &CardNumber, points: i64) -> Result<usize> {
        self.record("add_loyalty_points");
        match self.state.cards.get_mut(number) {
            Some(card) if card.active => {
                card.points += points;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn insert_user(&mut self, user: &User) -> Result<usize> {
        self.record("insert_user");
        Ok(insert_new(
            &mut self.state.users,
            user.username.clone(),
            user.clone(),
        ))
    }

    fn find_user(&mut self, username: &Username) -> Result<Option<User>> {
        Ok(self.state.users.get(username).cloned())
    }

    fn list_users(&mut self) -> Result<Vec<User>> {
        Ok(self.state.users.values().cloned().collect())
    }

    fn deactivate_user(&mut self, username: &Username) -> Result<usize> {
        self.record("deactivate_user");
        match self.state.users.get_mut(username) {
            Some(user) if user.active => {
                user.active = false;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn count_users(&mut self) -> Result<u64> {
        Ok(u64::try_from(self.state.users.len()).unwrap_or(u64::MAX))
    }

    fn insert_order_header(&mut self, header: &OrderHeader) -> Result<usize> {
        self.record("insert_order_header");
        if self.faults.reject_header {
            return Ok(0);
        }
        Ok(insert_new(
            &mut self.state.orders,
            header.id.clone(),
            header.clone(),
        ))
    }

    fn insert_order_line(&mut self, line: &OrderLine) -> Result<usize> {
        self.record("insert_order_line");
        if self.faults.reject_line == Some(line.line_no) {
            return Ok(0);
        }
        let taken = self
            .state
            .lines
            .iter()
            .any(|l| l.order_id == line.order_id && l.line_no == line.line_no);
        if taken {
            return Ok(0);
        }
        self.state.lines.push(line.clone());
        Ok(1)
    }

    fn find_order(&mut self, id: &OrderId) -> Result<Option<Order>> {
        let Some(header) = self.state.orders.get(id).cloned() else {
            return Ok(None);
        };
        let mut lines: Vec<OrderLine> = self
            .state
            .lines
            .iter()
            .filter(|line| &line.order_id == id)
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.line_no);
        Ok(Some(Order { header, lines }))
    }

    fn list_orders(&mut self, limit: u32) -> Result<Vec<OrderHeader>> {
        let mut headers: Vec<OrderHeader> = self.state.orders.values().cloned().collect();
        headers.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then_with(|| a.id.cmp(&b.id)));
        headers.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(headers)
    }

    fn list_orders_for_customer(&mut self, customer: &CustomerId) -> Result<Vec<OrderHeader>> {
        let mut headers: Vec<OrderHeader> = self
            .state
            .orders
            .values()
            .filter(|header| header.customer_id.as_ref() == Some(customer))
            .cloned()
            .collect();
        headers.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then_with(|| a.id.cmp(&b.id)));
        Ok(headers)
    }

    fn insert_return(&mut self, record: &ReturnRecord) -> Result<()> {
        self.record("insert_return");
        self.state.returns.push(record.clone());
        Ok(())
    }

    fn returned_quantity(&mut self, order: &OrderId, line_no: u32) -> Result<u32> {
        Ok(self
            .state
            .returns
            .iter()
            .filter(|r| &r.order_id == order && r.line_no == line_no)
            .map(|r| r.quantity)
            .sum())
    }

    fn list_returns(&mut self, order: &OrderId) -> Result<Vec<ReturnRecord>> {
        Ok(self
            .state
            .returns
            .iter()
            .filter(|r| &r.order_id == order)
            .cloned()
            .collect())
    }

    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<()> {
        self.record("insert_purchase_order");
        self.state
            .purchase_orders
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    fn find_purchase_order(&mut self, id: &PurchaseOrderId) -> Result<Option<PurchaseOrder>> {
        Ok(self.state.purchase_orders.get(id).cloned())
    }

    fn list_purchase_orders(
        &mut self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>> {
        Ok(self
            .state
            .purchase_orders
            .values()
            .filter(|order| status.is_none_or(|s| order.status == s))
            .cloned()
            .collect())
    }

    fn mark_purchase_order_received(
        &mut self,
        id: &PurchaseOrderId,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        self.record("mark_purchase_order_received");
        match self.state.purchase_orders.get_mut(id) {
            Some(order) if order.status == PurchaseOrderStatus::Open => {
                order.status = PurchaseOrderStatus::Received;
                order.received_at = Some(at);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// # Panics
///
/// Panics if the fixed timestamp is out of range.
#[must_use]
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

#[must_use]
pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_time())
}

/// # Panics
///
/// Panics if `code` is not a valid item code.
#[must_use]
pub fn make_item(code: &str) -> Item {
    Item {
        code: ItemCode::new(code).expect("valid item code"),
        description: format!("{code} description"),
        category: "general".to_string(),
    }
}

/// # Panics
///
/// Panics if either id is invalid.
#[must_use]
pub fn make_stock(id: &str, item: &str, price_cents: i64, quantity: u32) -> StockDetail {
    StockDetail {
        id: StockId::new(id).expect("valid stock id"),
        item_code: ItemCode::new(item).expect("valid item code"),
        variant: "default".to_string(),
        unit_price: Money::from_cents(price_cents),
        quantity,
    }
}

/// # Panics
///
/// Panics if `id` is not a valid customer id.
#[must_use]
pub fn make_customer(id: &str) -> Customer {
    Customer {
        id: CustomerId::new(id).expect("valid customer id"),
        name: format!("Customer {id}"),
        phone: None,
        email: None,
        registered_at: fixed_time(),
    }
}

/// # Panics
///
/// Panics if either id is invalid.
#[must_use]
pub fn make_card(number: &str, customer: &str, discount_bps: u32) -> LoyaltyCard {
    LoyaltyCard {
        number: CardNumber::new(number).expect("valid card number"),
        customer_id: CustomerId::new(customer).expect("valid customer id"),
        discount_bps,
        points: 0,
        issued_at: fixed_time(),
        active: true,
    }
}

/// # Panics
///
/// Panics if `name` is not a valid username.
#[must_use]
pub fn make_user(name: &str, role: Role) -> User {
    User {
        username: Username::new(name).expect("valid username"),
        password_hash: String::new(),
        role,
        active: true,
        created_at: fixed_time(),
    }
}

/// A ledger with one cashier and two stocked variants of one item.
#[must_use]
pub fn stocked_ledger() -> MockLedger {
    MockLedger::new()
        .with_user(make_user("alice", Role::Cashier))
        .with_item(make_item("MUG"))
        .with_stock(make_stock("MUG-RED", "MUG", 250, 10))
        .with_stock(make_stock("MUG-BLUE", "MUG", 300, 5))
}
