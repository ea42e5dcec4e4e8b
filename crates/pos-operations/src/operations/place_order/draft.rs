use pos_core::{CardNumber, CustomerId, Money, OrderHeader, OrderLine, StockId, Username};
use serde::{Deserialize, Serialize};

/// One requested line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub stock_id: StockId,
    pub quantity: u32,
    #[serde(default)]
    pub discount: Money,
}

impl LineRequest {
    #[must_use]
    pub fn new(stock_id: StockId, quantity: u32) -> Self {
        Self {
            stock_id,
            quantity,
            discount: Money::ZERO,
        }
    }

    #[must_use]
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }
}

/// A sale as captured at the till, before it is priced and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub operator: Username,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    #[serde(default)]
    pub loyalty_card: Option<CardNumber>,
    /// Order-level discount applied on top of any line discounts.
    #[serde(default)]
    pub discount: Money,
    pub lines: Vec<LineRequest>,
}

impl OrderDraft {
    #[must_use]
    pub fn new(operator: Username) -> Self {
        Self {
            operator,
            customer: None,
            loyalty_card: None,
            discount: Money::ZERO,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: CardNumber) -> Self {
        self.loyalty_card = Some(card);
        self
    }

    #[must_use]
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LineRequest) -> Self {
        self.lines.push(line);
        self
    }
}

/// A committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
    pub points_awarded: i64,
}
