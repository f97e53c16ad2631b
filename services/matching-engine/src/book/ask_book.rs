//! Ask (sell-side) order book
//!
//! Mirror of the bid side: residuals in arrival order, best ask is the
//! minimum resting price, crossing candidates snapshotted in insertion
//! order.

use types::ids::OrderId;
use types::numeric::{Price, Units};

use super::ResidualOrder;
use crate::matching::crossing;

/// Ask (sell) side of the book
#[derive(Debug, Default)]
pub struct AskBook {
    orders: Vec<ResidualOrder>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Insert a residual at the back (arrival order)
    pub fn insert(&mut self, residual: ResidualOrder) {
        self.orders.push(residual);
    }

    /// Look up a resting residual by order id
    pub fn get(&self, order_id: &OrderId) -> Option<&ResidualOrder> {
        self.orders.iter().find(|r| &r.order().order_id == order_id)
    }

    /// Apply a fill to a resting residual
    ///
    /// Decrements the remaining units and removes the residual once it
    /// reaches zero. Returns the remaining units after the fill; a missing
    /// order id counts as zero remaining.
    pub fn fill(&mut self, order_id: &OrderId, units: Units) -> Units {
        let Some(position) = self
            .orders
            .iter()
            .position(|r| &r.order().order_id == order_id)
        else {
            return Units::new(0);
        };

        let remaining = self.orders[position].fill(units);
        if remaining.is_zero() {
            self.orders.remove(position);
        }
        remaining
    }

    /// Best ask: the minimum resting price, or None if the side is empty
    pub fn best_ask(&self) -> Option<Price> {
        self.orders.iter().map(|r| r.order().price).min()
    }

    /// Snapshot the asks that cross an incoming bid at `bid_price`
    ///
    /// An ask crosses when its price is at or below the bid. Ids are
    /// returned in insertion order; the snapshot is stable across the
    /// fills it feeds.
    pub fn crossing_ids(&self, bid_price: Price) -> Vec<OrderId> {
        self.orders
            .iter()
            .filter(|r| crossing::can_match(bid_price, r.order().price))
            .map(|r| r.order().order_id.clone())
            .collect()
    }

    /// Whether the side is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate resting residuals in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &ResidualOrder> {
        self.orders.iter()
    }
}
