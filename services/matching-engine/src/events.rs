//! Broadcast events emitted during matching
//!
//! A single tagged-variant channel carries all three event kinds. Delivery
//! is fire-and-forget: publishing never blocks the engine, and a send with
//! no live subscribers is not an error. Lagging subscribers drop old
//! events on their own receivers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Units};
use types::order::Order;
use types::trade::Trade;

use crate::book::TopOfBook;

/// Default broadcast channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Market-data event broadcast to the event sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// An order was admitted to the book
    OrderPlaced { order: Order },
    /// The derived best bid or best ask moved
    PriceChanged {
        symbol: Symbol,
        bid: Option<Price>,
        ask: Option<Price>,
    },
    /// A fill executed
    TradeSettled {
        symbol: Symbol,
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        price: Price,
        units: Units,
    },
}

/// Publisher wrapping the broadcast channel
#[derive(Debug)]
pub struct EventPublisher {
    events: broadcast::Sender<MarketEvent>,
}

impl EventPublisher {
    /// Create a publisher with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self { events }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe()
    }

    /// Clone of the underlying sender, for handing to a front door
    pub fn sender(&self) -> broadcast::Sender<MarketEvent> {
        self.events.clone()
    }

    /// Emit an order-placed event
    pub fn order_placed(&self, order: &Order) {
        self.publish(MarketEvent::OrderPlaced {
            order: order.clone(),
        });
    }

    /// Emit a trade-settled event
    pub fn trade_settled(&self, trade: &Trade) {
        self.publish(MarketEvent::TradeSettled {
            symbol: trade.symbol().clone(),
            bid_order_id: trade.bid_order.order_id.clone(),
            ask_order_id: trade.ask_order.order_id.clone(),
            price: trade.price,
            units: trade.units,
        });
    }

    /// Emit a price-changed event iff the top of book moved
    ///
    /// Suppression is per-mutation: the caller snapshots the top of book
    /// immediately before the mutation and passes both sides of it here.
    pub fn price_changed_if_moved(&self, symbol: &Symbol, before: TopOfBook, after: TopOfBook) {
        if before != after {
            self.publish(MarketEvent::PriceChanged {
                symbol: symbol.clone(),
                bid: after.bid,
                ask: after.ask,
            });
        }
    }

    fn publish(&self, event: MarketEvent) {
        trace!(?event, "publishing market event");
        // A send with no subscribers returns Err; the engine does not care.
        let _ = self.events.send(event);
    }
}
