//! Display records, one per thing the CLI lists.
//!
//! Rows hold already formatted strings. Domain types stay free of
//! presentation concerns and the JSON shape stays stable when they change.

use chrono::{DateTime, Utc};
use pos_core::{
    Customer, Item, LoyaltyCard, OrderHeader, OrderLine, PurchaseOrder, PurchaseOrderLine,
    ReturnRecord, StockDetail, User,
};
use pos_operations::operations::{OrderDetails, PlacedOrder};
use serde::Serialize;

use super::table::Row;

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn yes_no(flag: bool) -> String {
    (if flag { "yes" } else { "no" }).to_string()
}

fn percent(bps: u32) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}

#[derive(Debug, Serialize)]
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

impl Row for ItemRow {
    const HEADERS: &'static [&'static str] = &["CODE", "DESCRIPTION", "CATEGORY"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.description.clone(),
            self.category.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StockRow {
    pub id: String,
    pub item: String,
    pub variant: String,
    pub unit_price: String,
    pub quantity: u32,
}

impl From<&StockDetail> for StockRow {
    fn from(stock: &StockDetail) -> Self {
        Self {
            id: stock.id.to_string(),
            item: stock.item_code.to_string(),
            variant: stock.variant.clone(),
            unit_price: stock.unit_price.to_string(),
            quantity: stock.quantity,
        }
    }
}

impl Row for StockRow {
    const HEADERS: &'static [&'static str] = &["STOCK", "ITEM", "VARIANT", "PRICE", "QTY"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.item.clone(),
            self.variant.clone(),
            self.unit_price.clone(),
            self.quantity.to_string(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerRow {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            registered_at: timestamp(customer.registered_at),
        }
    }
}

impl Row for CustomerRow {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "PHONE", "EMAIL", "REGISTERED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            optional(self.phone.as_deref()),
            optional(self.email.as_deref()),
            self.registered_at.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CardRow {
    pub number: String,
    pub customer: String,
    pub discount: String,
    pub points: i64,
    pub active: bool,
    pub issued_at: String,
}

impl From<&LoyaltyCard> for CardRow {
    fn from(card: &LoyaltyCard) -> Self {
        Self {
            number: card.number.to_string(),
            customer: card.customer_id.to_string(),
            discount: percent(card.discount_bps),
            points: card.points,
            active: card.active,
            issued_at: timestamp(card.issued_at),
        }
    }
}

impl Row for CardRow {
    const HEADERS: &'static [&'static str] =
        &["CARD", "CUSTOMER", "DISCOUNT", "POINTS", "ACTIVE", "ISSUED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.number.clone(),
            self.customer.clone(),
            self.discount.clone(),
            self.points.to_string(),
            yes_no(self.active),
            self.issued_at.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserRow {
    pub username: String,
    pub role: String,
    pub active: bool,
    pub created_at: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.to_string(),
            role: user.role.to_string(),
            active: user.active,
            created_at: timestamp(user.created_at),
        }
    }
}

impl Row for UserRow {
    const HEADERS: &'static [&'static str] = &["USERNAME", "ROLE", "ACTIVE", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.role.clone(),
            yes_no(self.active),
            self.created_at.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderRow {
    pub id: String,
    pub issued_at: String,
    pub customer: Option<String>,
    pub operator: String,
    pub subtotal: String,
    pub discount: String,
    pub total: String,
}

impl From<&OrderHeader> for OrderRow {
    fn from(header: &OrderHeader) -> Self {
        Self {
            id: header.id.to_string(),
            issued_at: timestamp(header.issued_at),
            customer: header.customer_id.as_ref().map(ToString::to_string),
            operator: header.operator.to_string(),
            subtotal: header.subtotal.to_string(),
            discount: header.discount.to_string(),
            total: header.total.to_string(),
        }
    }
}

impl Row for OrderRow {
    const HEADERS: &'static [&'static str] = &[
        "ORDER", "ISSUED", "CUSTOMER", "OPERATOR", "SUBTOTAL", "DISCOUNT", "TOTAL",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.issued_at.clone(),
            optional(self.customer.as_deref()),
            self.operator.clone(),
            self.subtotal.clone(),
            self.discount.clone(),
            self.total.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderLineRow {
    pub line_no: u32,
    pub stock: String,
    pub quantity: u32,
    pub unit_price: String,
    pub discount: String,
    pub amount: String,
    pub returned: u32,
}

impl OrderLineRow {
    pub(crate) fn new(line: &OrderLine, returned: u32) -> Self {
        Self {
            line_no: line.line_no,
            stock: line.stock_id.to_string(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            discount: line.discount.to_string(),
            amount: line.amount.to_string(),
            returned,
        }
    }
}

impl Row for OrderLineRow {
    const HEADERS: &'static [&'static str] = &[
        "LINE", "STOCK", "QTY", "PRICE", "DISCOUNT", "AMOUNT", "RETURNED",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.line_no.to_string(),
            self.stock.clone(),
            self.quantity.to_string(),
            self.unit_price.clone(),
            self.discount.clone(),
            self.amount.clone(),
            self.returned.to_string(),
        ]
    }
}

/// An order header with its lines, as printed after a sale or on lookup.
#[derive(Debug, Serialize)]
pub(crate) struct ReceiptRow {
    pub order: OrderRow,
    pub loyalty_card: Option<String>,
    pub lines: Vec<OrderLineRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<i64>,
}

impl From<&PlacedOrder> for ReceiptRow {
    fn from(placed: &PlacedOrder) -> Self {
        Self {
            order: OrderRow::from(&placed.header),
            loyalty_card: placed.header.loyalty_card.as_ref().map(ToString::to_string),
            lines: placed
                .lines
                .iter()
                .map(|line| OrderLineRow::new(line, 0))
                .collect(),
            points_awarded: Some(placed.points_awarded),
        }
    }
}

impl From<&OrderDetails> for ReceiptRow {
    fn from(details: &OrderDetails) -> Self {
        let header = &details.order.header;
        Self {
            order: OrderRow::from(header),
            loyalty_card: header.loyalty_card.as_ref().map(ToString::to_string),
            lines: details
                .order
                .lines
                .iter()
                .map(|line| {
                    let returned = details.returned.get(&line.line_no).copied().unwrap_or(0);
                    OrderLineRow::new(line, returned)
                })
                .collect(),
            points_awarded: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReturnRow {
    pub id: String,
    pub order: String,
    pub line_no: u32,
    pub quantity: u32,
    pub refund: String,
    pub reason: String,
    pub operator: String,
    pub returned_at: String,
}

impl From<&ReturnRecord> for ReturnRow {
    fn from(record: &ReturnRecord) -> Self {
        Self {
            id: record.id.to_string(),
            order: record.order_id.to_string(),
            line_no: record.line_no,
            quantity: record.quantity,
            refund: record.refund.to_string(),
            reason: record.reason.clone(),
            operator: record.operator.to_string(),
            returned_at: timestamp(record.returned_at),
        }
    }
}

impl Row for ReturnRow {
    const HEADERS: &'static [&'static str] = &[
        "RETURN", "ORDER", "LINE", "QTY", "REFUND", "REASON", "OPERATOR", "RETURNED",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.order.clone(),
            self.line_no.to_string(),
            self.quantity.to_string(),
            self.refund.clone(),
            self.reason.clone(),
            self.operator.clone(),
            self.returned_at.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseLineRow {
    pub line_no: u32,
    pub stock: String,
    pub quantity: u32,
    pub unit_cost: String,
}

impl From<&PurchaseOrderLine> for PurchaseLineRow {
    fn from(line: &PurchaseOrderLine) -> Self {
        Self {
            line_no: line.line_no,
            stock: line.stock_id.to_string(),
            quantity: line.quantity,
            unit_cost: line.unit_cost.to_string(),
        }
    }
}

impl Row for PurchaseLineRow {
    const HEADERS: &'static [&'static str] = &["LINE", "STOCK", "QTY", "COST"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.line_no.to_string(),
            self.stock.clone(),
            self.quantity.to_string(),
            self.unit_cost.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseOrderRow {
    pub id: String,
    pub supplier: String,
    pub status: String,
    pub created_at: String,
    pub received_at: Option<String>,
    pub total_cost: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<PurchaseLineRow>,
}

impl PurchaseOrderRow {
    /// Header only; lists do not repeat every line.
    pub(crate) fn summary(order: &PurchaseOrder) -> Self {
        Self {
            id: order.id.to_string(),
            supplier: order.supplier.clone(),
            status: order.status.to_string(),
            created_at: timestamp(order.created_at),
            received_at: order.received_at.map(timestamp),
            total_cost: order.total_cost.to_string(),
            lines: Vec::new(),
        }
    }

    pub(crate) fn full(order: &PurchaseOrder) -> Self {
        Self {
            lines: order.lines.iter().map(PurchaseLineRow::from).collect(),
            ..Self::summary(order)
        }
    }
}

impl Row for PurchaseOrderRow {
    const HEADERS: &'static [&'static str] =
        &["PO", "SUPPLIER", "STATUS", "CREATED", "RECEIVED", "TOTAL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.supplier.clone(),
            self.status.clone(),
            self.created_at.clone(),
            optional(self.received_at.as_deref()),
            self.total_cost.clone(),
        ]
    }
}
