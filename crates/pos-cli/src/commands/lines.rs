//! `--line` arguments: `STOCK:QTY` with an optional or required third amount.

use std::str::FromStr;

use pos_core::{Money, StockId};
use pos_operations::operations::{LineRequest, PurchaseLineRequest};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid line '{input}': expected {expected}")]
pub(crate) struct InvalidLine {
    input: String,
    expected: &'static str,
}

fn split(
    input: &str,
    expected: &'static str,
) -> Result<(StockId, u32, Option<Money>), InvalidLine> {
    let invalid = || InvalidLine {
        input: input.to_string(),
        expected,
    };

    let mut parts = input.split(':');
    let stock = parts
        .next()
        .and_then(|s| StockId::new(s).ok())
        .ok_or_else(invalid)?;
    let quantity = parts
        .next()
        .and_then(|q| q.trim().parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let amount = match parts.next() {
        Some(amount) => Some(amount.parse::<Money>().map_err(|_| invalid())?),
        None => None,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((stock, quantity, amount))
}

/// A sale line: `STOCK:QTY[:DISCOUNT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SaleLine(pub LineRequest);

impl FromStr for SaleLine {
    type Err = InvalidLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stock, quantity, discount) = split(s, "STOCK:QTY[:DISCOUNT]")?;
        let request = LineRequest::new(stock, quantity);
        Ok(Self(match discount {
            Some(discount) => request.with_discount(discount),
            None => request,
        }))
    }
}

/// A purchase line: `STOCK:QTY:COST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PurchaseLine(pub PurchaseLineRequest);

impl FromStr for PurchaseLine {
    type Err = InvalidLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: &str = "STOCK:QTY:COST";
        let (stock_id, quantity, unit_cost) = split(s, EXPECTED)?;
        let unit_cost = unit_cost.ok_or_else(|| InvalidLine {
            input: s.to_string(),
            expected: EXPECTED,
        })?;
        Ok(Self(PurchaseLineRequest {
            stock_id,
            quantity,
            unit_cost,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_line_without_discount() -> anyhow::Result<()> {
        let SaleLine(line) = "MUG-RED:3".parse()?;

        assert_eq!(line.stock_id.as_str(), "MUG-RED");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.discount, Money::ZERO);
        Ok(())
    }

    #[test]
    fn sale_line_with_discount() -> anyhow::Result<()> {
        let SaleLine(line) = "MUG-RED:2:1.50".parse()?;

        assert_eq!(line.discount, Money::from_cents(150));
        Ok(())
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for input in ["MUG-RED", ":3", "MUG-RED:x", "MUG-RED:-1", "MUG-RED:1:abc", "A:1:2:3"] {
            assert!(input.parse::<SaleLine>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn purchase_line_requires_cost() -> anyhow::Result<()> {
        let PurchaseLine(line) = "MUG-RED:40:1.10".parse()?;

        assert_eq!(line.quantity, 40);
        assert_eq!(line.unit_cost, Money::from_cents(110));
        let err = "MUG-RED:40".parse::<PurchaseLine>().expect_err("cost is required");
        assert!(err.to_string().contains("STOCK:QTY:COST"));
        Ok(())
    }
}
