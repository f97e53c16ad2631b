//! Trade execution types
//!
//! A `Trade` is the immutable record of one execution between a resting
//! maker and an incoming taker. The trade log is append-only; entries are
//! never mutated or removed.

use crate::ids::{Symbol, TradeId};
use crate::numeric::{Price, Units};
use crate::order::{Order, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable execution record
///
/// `bid_order` and `ask_order` are the two intents involved, wired by side.
/// `price` is always the resting (maker) side's posted price. `sequence` is
/// assigned monotonically by the match executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub sequence: u64,
    pub bid_order: Order,
    pub ask_order: Order,
    pub price: Price,
    pub units: Units,
}

impl Trade {
    /// Create a new trade record
    ///
    /// # Panics
    /// Panics if the orders are not wired bid/ask, or if `units` is zero.
    /// The matcher never constructs either.
    pub fn new(sequence: u64, bid_order: Order, ask_order: Order, price: Price, units: Units) -> Self {
        assert_eq!(bid_order.side, Side::Bid, "bid_order must be the buy side");
        assert_eq!(ask_order.side, Side::Ask, "ask_order must be the sell side");
        assert!(!units.is_zero(), "trade units must be positive");

        Self {
            trade_id: TradeId::new(),
            sequence,
            bid_order,
            ask_order,
            price,
            units,
        }
    }

    /// The instrument this trade executed on
    pub fn symbol(&self) -> &Symbol {
        &self.bid_order.symbol
    }

    /// Trade value (price × units)
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.units.get())
    }
}
