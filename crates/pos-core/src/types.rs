use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ids::{
    CardNumber, CustomerId, ItemCode, OrderId, PurchaseOrderId, ReturnId, StockId, Username,
};
use crate::money::Money;

/// Basis points in 100%.
pub const FULL_DISCOUNT_BPS: u32 = 10_000;

/// # Errors
///
/// Returns [`CoreError::InvalidDiscountRate`] if `bps` exceeds 100%.
pub fn validate_discount_bps(bps: u32) -> Result<u32> {
    if bps > FULL_DISCOUNT_BPS {
        return Err(CoreError::InvalidDiscountRate(bps));
    }
    Ok(bps)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub code: ItemCode,
    pub description: String,
    pub category: String,
}

/// On-hand inventory for one variant or batch of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDetail {
    pub id: StockId,
    pub item_code: ItemCode,
    pub variant: String,
    pub unit_price: Money,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyCard {
    pub number: CardNumber,
    pub customer_id: CustomerId,
    pub discount_bps: u32,
    pub points: i64,
    pub issued_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Cashier,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "cashier" => Ok(Self::Cashier),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// The header row of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: OrderId,
    pub issued_at: DateTime<Utc>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub customer_id: Option<CustomerId>,
    pub operator: Username,
    pub loyalty_card: Option<CardNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    /// 1-based position in the order as the caller supplied it.
    pub line_no: u32,
    pub stock_id: StockId,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount: Money,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub id: ReturnId,
    pub order_id: OrderId,
    pub line_no: u32,
    pub quantity: u32,
    pub refund: Money,
    pub reason: String,
    pub operator: Username,
    pub returned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    #[default]
    Open,
    Received,
}

impl PurchaseOrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Received => "received",
        }
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(Self::Open),
            "received" => Ok(Self::Received),
            other => Err(CoreError::UnknownPurchaseOrderStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub line_no: u32,
    pub stock_id: StockId,
    pub quantity: u32,
    pub unit_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub supplier: String,
    pub status: PurchaseOrderStatus,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
    pub total_cost: Money,
    pub lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrder {
    /// Sum of `quantity * unit_cost` over all lines.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MoneyOverflow`] if the total does not fit.
    pub fn compute_total(lines: &[PurchaseOrderLine]) -> Result<Money> {
        lines.iter().try_fold(Money::ZERO, |acc, line| {
            line.unit_cost
                .checked_mul(line.quantity)
                .and_then(|cost| acc.checked_add(cost))
                .ok_or(CoreError::MoneyOverflow("purchase order total"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() -> anyhow::Result<()> {
        assert_eq!("admin".parse::<Role>()?, Role::Admin);
        assert_eq!(Role::Cashier.to_string(), "cashier");
        assert!("manager".parse::<Role>().is_err());
        Ok(())
    }

    #[test]
    fn purchase_order_status_parses() -> anyhow::Result<()> {
        assert_eq!(
            "received".parse::<PurchaseOrderStatus>()?,
            PurchaseOrderStatus::Received
        );
        assert!("closed".parse::<PurchaseOrderStatus>().is_err());
        Ok(())
    }

    #[test]
    fn discount_rate_over_full_is_rejected() {
        assert_eq!(validate_discount_bps(500), Ok(500));
        assert_eq!(
            validate_discount_bps(10_001),
            Err(CoreError::InvalidDiscountRate(10_001))
        );
    }

    #[test]
    fn purchase_order_total_sums_lines() -> anyhow::Result<()> {
        let lines = vec![
            PurchaseOrderLine {
                line_no: 1,
                stock_id: StockId::new("SKU-1")?,
                quantity: 10,
                unit_cost: Money::from_cents(150),
            },
            PurchaseOrderLine {
                line_no: 2,
                stock_id: StockId::new("SKU-2")?,
                quantity: 2,
                unit_cost: Money::from_cents(1000),
            },
        ];

        assert_eq!(
            PurchaseOrder::compute_total(&lines)?,
            Money::from_cents(3500)
        );
        Ok(())
    }

    #[test]
    fn user_serialization_omits_password_hash() -> anyhow::Result<()> {
        let user = User {
            username: Username::new("alice")?,
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user)?;

        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
        Ok(())
    }
}
