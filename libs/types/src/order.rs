//! Order intent types
//!
//! An `Order` is the immutable intent submitted by a client. Mutable book
//! state (remaining quantity) lives in the engine's residuals, never here.

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Units};
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// An immutable order intent
///
/// `price` and `units` are not validated at construction; admission
/// validation is the engine's job so that malformed orders produce a
/// rejection reply rather than a constructor panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub units: Units,
}

impl Order {
    /// Create a new order intent
    pub fn new(
        order_id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        side: Side,
        price: Price,
        units: Units,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            symbol: symbol.into(),
            side,
            price,
            units,
        }
    }

    pub fn is_bid(&self) -> bool {
        self.side == Side::Bid
    }

    pub fn is_ask(&self) -> bool {
        self.side == Side::Ask
    }
}
