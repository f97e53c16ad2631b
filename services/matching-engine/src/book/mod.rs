//! Order book: two sides of resting residuals plus derived best prices

mod ask_book;
mod bid_book;

pub use ask_book::AskBook;
pub use bid_book::BidBook;

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Units};
use types::order::Order;

/// A resting order: the immutable intent plus its unfilled remainder
///
/// `remaining_units` starts equal to the order's units and only ever
/// decreases. A residual with zero remaining units never rests in the book.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualOrder {
    order: Order,
    remaining_units: Units,
}

impl ResidualOrder {
    /// Create a residual for a freshly admitted order
    pub fn new(order: Order) -> Self {
        let remaining_units = order.units;
        Self {
            order,
            remaining_units,
        }
    }

    /// The underlying immutable order
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Unfilled remainder
    pub fn remaining_units(&self) -> Units {
        self.remaining_units
    }

    /// Apply a fill, returning the remaining units afterwards
    ///
    /// # Panics
    /// Panics if the fill exceeds the remainder; fills are capped at the
    /// min of the two residuals before this is called.
    pub fn fill(&mut self, units: Units) -> Units {
        self.remaining_units = self.remaining_units.minus(units);
        self.remaining_units
    }
}

/// Derived best-price snapshot of both sides
///
/// Recomputed on read, so it is never stale. Compared before and after a
/// book mutation to decide whether a price-changed event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOfBook {
    pub bid: Option<Price>,
    pub ask: Option<Price>,
}

/// The engine-local book: both sides of resting residuals
#[derive(Debug, Default)]
pub struct Book {
    pub bids: BidBook,
    pub asks: AskBook,
}

impl Book {
    /// Create a new empty book
    pub fn new() -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    /// Current derived best prices
    pub fn top(&self) -> TopOfBook {
        TopOfBook {
            bid: self.bids.best_bid(),
            ask: self.asks.best_ask(),
        }
    }

    /// Total resting units across both sides
    pub fn resting_units(&self) -> u64 {
        self.bids
            .iter()
            .chain(self.asks.iter())
            .map(|r| r.remaining_units().get())
            .sum()
    }

    /// Verify the book is uncrossed after settlement
    ///
    /// # Panics
    /// Panics if any bid price reaches any ask price. A crossed book after
    /// matching means the fill loop is broken; the engine must not keep
    /// running on a corrupt book.
    pub fn assert_uncrossed(&self) {
        if let (Some(bid), Some(ask)) = (self.bids.best_bid(), self.asks.best_ask()) {
            assert!(
                bid < ask,
                "book crossed after settlement: best bid {bid} >= best ask {ask}"
            );
        }
    }
}
