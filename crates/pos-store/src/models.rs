//! Row structs mirroring the SQL tables, and their conversions to and from
//! the domain types in `pos-core`.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use pos_core::{
    CardNumber, CoreError, Customer, CustomerId, Item, ItemCode, LoyaltyCard, Money, OrderHeader,
    OrderId, OrderLine, PurchaseOrder, PurchaseOrderId, PurchaseOrderLine, PurchaseOrderStatus,
    ReturnId, ReturnRecord, StockDetail, StockId, User, Username,
};

use crate::schema::{
    customers, items, loyalty_cards, order_lines, orders, purchase_order_lines, purchase_orders,
    returns, stock_details, users,
};
use crate::{Result, StoreError};

pub(crate) fn to_db_count(value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| StoreError::QuantityTooLarge(value))
}

pub(crate) fn from_db_count(table: &'static str, column: &'static str, value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| StoreError::OutOfRange {
        table,
        column,
        value: i64::from(value),
    })
}

pub(crate) fn to_db_time(value: DateTime<Utc>) -> NaiveDateTime {
    value.naive_utc()
}

fn from_db_time(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

pub(crate) fn corrupt(table: &'static str) -> impl Fn(CoreError) -> StoreError {
    move |source| StoreError::Corrupt { table, source }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ItemRow {
    pub code: String,
    pub description: String,
    pub category: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            code: item.code.to_string(),
            description: item.description.clone(),
            category: item.category.clone(),
        }
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(Self {
            code: ItemCode::new(row.code).map_err(corrupt("items"))?,
            description: row.description,
            category: row.category,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = stock_details)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct StockDetailRow {
    pub id: String,
    pub item_code: String,
    pub variant: String,
    pub unit_price: i64,
    pub quantity: i32,
}

impl TryFrom<&StockDetail> for StockDetailRow {
    type Error = StoreError;

    fn try_from(stock: &StockDetail) -> Result<Self> {
        Ok(Self {
            id: stock.id.to_string(),
            item_code: stock.item_code.to_string(),
            variant: stock.variant.clone(),
            unit_price: stock.unit_price.cents(),
            quantity: to_db_count(stock.quantity)?,
        })
    }
}

impl TryFrom<StockDetailRow> for StockDetail {
    type Error = StoreError;

    fn try_from(row: StockDetailRow) -> Result<Self> {
        let corrupt = corrupt("stock_details");
        Ok(Self {
            id: StockId::new(row.id).map_err(&corrupt)?,
            item_code: ItemCode::new(row.item_code).map_err(&corrupt)?,
            variant: row.variant,
            unit_price: Money::from_cents(row.unit_price),
            quantity: from_db_count("stock_details", "quantity", row.quantity)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CustomerRow {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: NaiveDateTime,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            registered_at: to_db_time(customer.registered_at),
        }
    }
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self> {
        Ok(Self {
            id: CustomerId::new(row.id).map_err(corrupt("customers"))?,
            name: row.name,
            phone: row.phone,
            email: row.email,
            registered_at: from_db_time(row.registered_at),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = loyalty_cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct LoyaltyCardRow {
    pub card_number: String,
    pub customer_id: String,
    pub discount_bps: i32,
    pub points: i64,
    pub issued_at: NaiveDateTime,
    pub active: bool,
}

impl TryFrom<&LoyaltyCard> for LoyaltyCardRow {
    type Error = StoreError;

    fn try_from(card: &LoyaltyCard) -> Result<Self> {
        Ok(Self {
            card_number: card.number.to_string(),
            customer_id: card.customer_id.to_string(),
            discount_bps: to_db_count(card.discount_bps)?,
            points: card.points,
            issued_at: to_db_time(card.issued_at),
            active: card.active,
        })
    }
}

impl TryFrom<LoyaltyCardRow> for LoyaltyCard {
    type Error = StoreError;

    fn try_from(row: LoyaltyCardRow) -> Result<Self> {
        let corrupt = corrupt("loyalty_cards");
        Ok(Self {
            number: CardNumber::new(row.card_number).map_err(&corrupt)?,
            customer_id: CustomerId::new(row.customer_id).map_err(&corrupt)?,
            discount_bps: from_db_count("loyalty_cards", "discount_bps", row.discount_bps)?,
            points: row.points,
            issued_at: from_db_time(row.issued_at),
            active: row.active,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.to_string(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            active: user.active,
            created_at: to_db_time(user.created_at),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        let corrupt = corrupt("users");
        Ok(Self {
            username: Username::new(row.username).map_err(&corrupt)?,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(&corrupt)?,
            active: row.active,
            created_at: from_db_time(row.created_at),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct OrderRow {
    pub id: String,
    pub issued_at: NaiveDateTime,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub customer_id: Option<String>,
    pub operator: String,
    pub loyalty_card: Option<String>,
}

impl From<&OrderHeader> for OrderRow {
    fn from(header: &OrderHeader) -> Self {
        Self {
            id: header.id.to_string(),
            issued_at: to_db_time(header.issued_at),
            subtotal: header.subtotal.cents(),
            discount: header.discount.cents(),
            total: header.total.cents(),
            customer_id: header.customer_id.as_ref().map(ToString::to_string),
            operator: header.operator.to_string(),
            loyalty_card: header.loyalty_card.as_ref().map(ToString::to_string),
        }
    }
}

impl TryFrom<OrderRow> for OrderHeader {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let corrupt = corrupt("orders");
        Ok(Self {
            id: OrderId::new(row.id).map_err(&corrupt)?,
            issued_at: from_db_time(row.issued_at),
            subtotal: Money::from_cents(row.subtotal),
            discount: Money::from_cents(row.discount),
            total: Money::from_cents(row.total),
            customer_id: row
                .customer_id
                .map(CustomerId::new)
                .transpose()
                .map_err(&corrupt)?,
            operator: Username::new(row.operator).map_err(&corrupt)?,
            loyalty_card: row
                .loyalty_card
                .map(CardNumber::new)
                .transpose()
                .map_err(&corrupt)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct OrderLineRow {
    pub order_id: String,
    pub line_no: i32,
    pub stock_id: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub discount: i64,
    pub amount: i64,
}

impl TryFrom<&OrderLine> for OrderLineRow {
    type Error = StoreError;

    fn try_from(line: &OrderLine) -> Result<Self> {
        Ok(Self {
            order_id: line.order_id.to_string(),
            line_no: to_db_count(line.line_no)?,
            stock_id: line.stock_id.to_string(),
            quantity: to_db_count(line.quantity)?,
            unit_price: line.unit_price.cents(),
            discount: line.discount.cents(),
            amount: line.amount.cents(),
        })
    }
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = StoreError;

    fn try_from(row: OrderLineRow) -> Result<Self> {
        let corrupt = corrupt("order_lines");
        Ok(Self {
            order_id: OrderId::new(row.order_id).map_err(&corrupt)?,
            line_no: from_db_count("order_lines", "line_no", row.line_no)?,
            stock_id: StockId::new(row.stock_id).map_err(&corrupt)?,
            quantity: from_db_count("order_lines", "quantity", row.quantity)?,
            unit_price: Money::from_cents(row.unit_price),
            discount: Money::from_cents(row.discount),
            amount: Money::from_cents(row.amount),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = returns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ReturnRow {
    pub id: String,
    pub order_id: String,
    pub line_no: i32,
    pub quantity: i32,
    pub refund: i64,
    pub reason: String,
    pub operator: String,
    pub returned_at: NaiveDateTime,
}

impl TryFrom<&ReturnRecord> for ReturnRow {
    type Error = StoreError;

    fn try_from(record: &ReturnRecord) -> Result<Self> {
        Ok(Self {
            id: record.id.to_string(),
            order_id: record.order_id.to_string(),
            line_no: to_db_count(record.line_no)?,
            quantity: to_db_count(record.quantity)?,
            refund: record.refund.cents(),
            reason: record.reason.clone(),
            operator: record.operator.to_string(),
            returned_at: to_db_time(record.returned_at),
        })
    }
}

impl TryFrom<ReturnRow> for ReturnRecord {
    type Error = StoreError;

    fn try_from(row: ReturnRow) -> Result<Self> {
        let corrupt = corrupt("returns");
        Ok(Self {
            id: ReturnId::new(row.id).map_err(&corrupt)?,
            order_id: OrderId::new(row.order_id).map_err(&corrupt)?,
            line_no: from_db_count("returns", "line_no", row.line_no)?,
            quantity: from_db_count("returns", "quantity", row.quantity)?,
            refund: Money::from_cents(row.refund),
            reason: row.reason,
            operator: Username::new(row.operator).map_err(&corrupt)?,
            returned_at: from_db_time(row.returned_at),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = purchase_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PurchaseOrderRow {
    pub id: String,
    pub supplier: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub received_at: Option<NaiveDateTime>,
    pub total_cost: i64,
}

impl From<&PurchaseOrder> for PurchaseOrderRow {
    fn from(order: &PurchaseOrder) -> Self {
        Self {
            id: order.id.to_string(),
            supplier: order.supplier.clone(),
            status: order.status.as_str().to_string(),
            created_at: to_db_time(order.created_at),
            received_at: order.received_at.map(to_db_time),
            total_cost: order.total_cost.cents(),
        }
    }
}

impl PurchaseOrderRow {
    pub(crate) fn into_domain(self, lines: Vec<PurchaseOrderLine>) -> Result<PurchaseOrder> {
        let corrupt = corrupt("purchase_orders");
        let status: PurchaseOrderStatus = self.status.parse().map_err(&corrupt)?;
        Ok(PurchaseOrder {
            id: PurchaseOrderId::new(self.id).map_err(&corrupt)?,
            supplier: self.supplier,
            status,
            created_at: from_db_time(self.created_at),
            received_at: self.received_at.map(from_db_time),
            total_cost: Money::from_cents(self.total_cost),
            lines,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = purchase_order_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PurchaseOrderLineRow {
    pub purchase_order_id: String,
    pub line_no: i32,
    pub stock_id: String,
    pub quantity: i32,
    pub unit_cost: i64,
}

impl PurchaseOrderLineRow {
    pub(crate) fn new(order_id: &PurchaseOrderId, line: &PurchaseOrderLine) -> Result<Self> {
        Ok(Self {
            purchase_order_id: order_id.to_string(),
            line_no: to_db_count(line.line_no)?,
            stock_id: line.stock_id.to_string(),
            quantity: to_db_count(line.quantity)?,
            unit_cost: line.unit_cost.cents(),
        })
    }
}

impl TryFrom<PurchaseOrderLineRow> for PurchaseOrderLine {
    type Error = StoreError;

    fn try_from(row: PurchaseOrderLineRow) -> Result<Self> {
        Ok(Self {
            line_no: from_db_count("purchase_order_lines", "line_no", row.line_no)?,
            stock_id: StockId::new(row.stock_id).map_err(corrupt("purchase_order_lines"))?,
            quantity: from_db_count("purchase_order_lines", "quantity", row.quantity)?,
            unit_cost: Money::from_cents(row.unit_cost),
        })
    }
}
