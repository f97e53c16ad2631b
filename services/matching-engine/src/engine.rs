//! Matching engine core
//!
//! Single owner of the book, trade log, id history, and lifecycle flag.
//! Processes one order at a time: admit, publish, then fill against the
//! counter-side snapshot. All methods are synchronous; sequencing is the
//! front door's job.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::debug;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::{Book, ResidualOrder, TopOfBook};
use crate::events::{EventPublisher, MarketEvent, DEFAULT_EVENT_CAPACITY};
use crate::lifecycle::EngineState;
use crate::matching::MatchExecutor;
use crate::validator;

/// Matching engine for a single instrument
pub struct Engine {
    symbol: Symbol,
    book: Book,
    /// Append-only execution log
    trades: Vec<Trade>,
    /// Every order id ever admitted, including fully filled ones
    seen_ids: HashSet<OrderId>,
    executor: MatchExecutor,
    state: EngineState,
    publisher: EventPublisher,
}

impl Engine {
    /// Create a new engine bound to one symbol
    pub fn new(symbol: Symbol) -> Self {
        Self::with_event_capacity(symbol, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a new engine with an explicit event channel capacity
    pub fn with_event_capacity(symbol: Symbol, event_capacity: usize) -> Self {
        Self {
            symbol,
            book: Book::new(),
            trades: Vec::new(),
            seen_ids: HashSet::new(),
            executor: MatchExecutor::new(0),
            state: EngineState::default(),
            publisher: EventPublisher::new(event_capacity),
        }
    }

    /// The instrument this engine is bound to
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Subscribe to the broadcast event stream
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.publisher.subscribe()
    }

    /// Clone of the event sender, for a front door to hand out
    pub fn event_sender(&self) -> broadcast::Sender<MarketEvent> {
        self.publisher.sender()
    }

    /// Submit an order for admission and matching
    ///
    /// On success the order has been admitted, matched as far as the
    /// counter-side allows, and all events for it have been emitted. On
    /// error nothing changed and nothing was emitted.
    pub fn submit(&mut self, order: Order) -> Result<(), EngineError> {
        if self.state.is_halted() {
            debug!(order_id = %order.order_id, "order rejected: engine halted");
            return Err(EngineError::Halted);
        }

        if let Err(err) = validator::validate(&order, &self.seen_ids) {
            debug!(order_id = %order.order_id, %err, "order rejected");
            return Err(err.into());
        }
        self.seen_ids.insert(order.order_id.clone());

        let before = self.book.top();
        let residual = ResidualOrder::new(order.clone());
        match order.side {
            Side::Bid => self.book.bids.insert(residual),
            Side::Ask => self.book.asks.insert(residual),
        }
        debug!(
            order_id = %order.order_id,
            side = ?order.side,
            price = %order.price,
            units = %order.units,
            "order admitted"
        );
        self.publisher.order_placed(&order);
        self.publisher
            .price_changed_if_moved(&self.symbol, before, self.book.top());

        match order.side {
            Side::Bid => self.fill_against_asks(&order),
            Side::Ask => self.fill_against_bids(&order),
        }

        self.book.assert_uncrossed();
        Ok(())
    }

    /// Fill an incoming bid against resting asks
    ///
    /// The candidate snapshot is taken once, in insertion order, before any
    /// fills. Each fill settles the trade before residuals are mutated.
    fn fill_against_asks(&mut self, taker: &Order) {
        let candidates = self.book.asks.crossing_ids(taker.price);
        let mut remaining = taker.units;

        for ask_id in candidates {
            if remaining.is_zero() {
                break;
            }

            let before = self.book.top();
            let Some(resting) = self.book.asks.get(&ask_id) else {
                continue;
            };
            let maker_order = resting.order().clone();
            let units = remaining.min(resting.remaining_units());
            let price = maker_order.price;

            let trade = self.executor.execute(taker.clone(), maker_order, price, units);
            self.publisher.trade_settled(&trade);
            debug!(
                sequence = trade.sequence,
                price = %trade.price,
                units = %trade.units,
                "trade settled"
            );
            self.trades.push(trade);

            self.book.asks.fill(&ask_id, units);
            remaining = self.book.bids.fill(&taker.order_id, units);
            self.publisher
                .price_changed_if_moved(&self.symbol, before, self.book.top());
        }
    }

    /// Fill an incoming ask against resting bids
    fn fill_against_bids(&mut self, taker: &Order) {
        let candidates = self.book.bids.crossing_ids(taker.price);
        let mut remaining = taker.units;

        for bid_id in candidates {
            if remaining.is_zero() {
                break;
            }

            let before = self.book.top();
            let Some(resting) = self.book.bids.get(&bid_id) else {
                continue;
            };
            let maker_order = resting.order().clone();
            let units = remaining.min(resting.remaining_units());
            let price = maker_order.price;

            let trade = self.executor.execute(maker_order, taker.clone(), price, units);
            self.publisher.trade_settled(&trade);
            debug!(
                sequence = trade.sequence,
                price = %trade.price,
                units = %trade.units,
                "trade settled"
            );
            self.trades.push(trade);

            self.book.bids.fill(&bid_id, units);
            remaining = self.book.asks.fill(&taker.order_id, units);
            self.publisher
                .price_changed_if_moved(&self.symbol, before, self.book.top());
        }
    }

    /// Current derived best prices
    pub fn top(&self) -> TopOfBook {
        self.book.top()
    }

    /// The append-only trade log
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// All orders that participated in fills, flattened in trade order
    pub fn executed_orders(&self) -> Vec<Order> {
        self.trades
            .iter()
            .flat_map(|t| [t.bid_order.clone(), t.ask_order.clone()])
            .collect()
    }

    /// Stop accepting orders
    pub fn halt(&mut self) {
        self.state.halt();
    }

    /// Resume accepting orders
    pub fn start(&mut self) {
        self.state.start();
    }

    /// Whether place commands are currently accepted
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The book, for inspection
    pub fn book(&self) -> &Book {
        &self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::errors::OrderError;
    use types::numeric::{Price, Units};

    fn engine() -> Engine {
        Engine::new(Symbol::new("ACME"))
    }

    fn bid(id: &str, units: u64, price: &str) -> Order {
        Order::new(id, "ACME", Side::Bid, price.parse().unwrap(), Units::new(units))
    }

    fn ask(id: &str, units: u64, price: &str) -> Order {
        Order::new(id, "ACME", Side::Ask, price.parse().unwrap(), Units::new(units))
    }

    fn drain(rx: &mut broadcast::Receiver<MarketEvent>) -> Vec<MarketEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_resting_order_forms_best_bid() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.submit(bid("b-1", 1, "10")).unwrap();

        let top = engine.top();
        assert_eq!(top.bid, Some(Price::from_u64(10)));
        assert_eq!(top.ask, None);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], MarketEvent::OrderPlaced { .. }));
        match &events[1] {
            MarketEvent::PriceChanged { bid, ask, .. } => {
                assert_eq!(*bid, Some(Price::from_u64(10)));
                assert_eq!(*ask, None);
            }
            other => panic!("expected PriceChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_match_empties_book() {
        let mut engine = engine();

        engine.submit(bid("b-1", 50, "100")).unwrap();
        engine.submit(ask("a-2", 50, "100")).unwrap();

        assert_eq!(engine.trades().len(), 1);
        let trade = &engine.trades()[0];
        assert_eq!(trade.bid_order.order_id.as_str(), "b-1");
        assert_eq!(trade.ask_order.order_id.as_str(), "a-2");
        assert_eq!(trade.price, Price::from_u64(100));
        assert_eq!(trade.units, Units::new(50));

        assert!(engine.book().bids.is_empty());
        assert!(engine.book().asks.is_empty());
        assert_eq!(engine.top(), TopOfBook { bid: None, ask: None });
    }

    #[test]
    fn test_two_asks_fill_one_bid_at_maker_price() {
        let mut engine = engine();

        engine.submit(bid("b-1", 50, "100")).unwrap();
        engine.submit(ask("a-2", 10, "100")).unwrap();
        engine.submit(ask("a-3", 10, "99")).unwrap();

        let trades = engine.trades();
        assert_eq!(trades.len(), 2);
        // Maker is the resting bid both times, so both execute at 100
        assert_eq!(trades[0].price, Price::from_u64(100));
        assert_eq!(trades[1].price, Price::from_u64(100));
        assert_eq!(trades[0].units, Units::new(10));
        assert_eq!(trades[1].units, Units::new(10));

        let residual = engine.book().bids.get(&OrderId::new("b-1")).unwrap();
        assert_eq!(residual.remaining_units(), Units::new(30));
    }

    #[test]
    fn test_maker_price_rule_across_rests() {
        let mut engine = engine();

        engine.submit(bid("b-1", 76, "10")).unwrap();
        engine.submit(ask("a-2", 45, "9")).unwrap();
        let trades = engine.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].units, Units::new(45));
        assert_eq!(trades[0].price, Price::from_u64(10));

        engine.submit(ask("a-3", 80, "9.5")).unwrap();
        let trades = engine.trades();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].units, Units::new(31));
        assert_eq!(trades[1].price, Price::from_u64(10));

        engine.submit(bid("b-4", 100, "10.5")).unwrap();
        let trades = engine.trades();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[2].units, Units::new(49));
        assert_eq!(trades[2].price, "9.5".parse().unwrap());
    }

    #[test]
    fn test_event_total_order_for_matching_order() {
        let mut engine = engine();
        engine.submit(bid("b-1", 50, "100")).unwrap();

        let mut rx = engine.subscribe();
        engine.submit(ask("a-2", 10, "100")).unwrap();

        let events = drain(&mut rx);
        assert!(matches!(events[0], MarketEvent::OrderPlaced { .. }));
        // Admission moved the best ask onto the book
        assert!(matches!(events[1], MarketEvent::PriceChanged { .. }));
        assert!(matches!(events[2], MarketEvent::TradeSettled { .. }));
        // The fill removed the ask again
        match &events[3] {
            MarketEvent::PriceChanged { bid, ask, .. } => {
                assert_eq!(*bid, Some(Price::from_u64(100)));
                assert_eq!(*ask, None);
            }
            other => panic!("expected PriceChanged, got {other:?}"),
        }
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_invalid_order_no_state_change_no_events() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        let result = engine.submit(bid("b-1", 0, "10"));
        assert_eq!(result, Err(EngineError::Order(OrderError::InvalidUnits)));

        assert!(engine.book().bids.is_empty());
        assert!(drain(&mut rx).is_empty());

        // The id was never admitted, so it is still free
        engine.submit(bid("b-1", 5, "10")).unwrap();
    }

    #[test]
    fn test_duplicate_id_rejected_after_full_fill() {
        let mut engine = engine();

        engine.submit(bid("b-1", 50, "100")).unwrap();
        engine.submit(ask("a-2", 50, "100")).unwrap();
        assert!(engine.book().bids.is_empty());

        let result = engine.submit(bid("b-1", 10, "100"));
        assert_eq!(
            result,
            Err(EngineError::Order(OrderError::DuplicateOrderId(OrderId::new("b-1"))))
        );
    }

    #[test]
    fn test_halted_rejects_orders_and_serves_queries() {
        let mut engine = engine();
        engine.submit(bid("b-1", 50, "100")).unwrap();

        engine.halt();
        let mut rx = engine.subscribe();

        let result = engine.submit(ask("a-2", 50, "100"));
        assert_eq!(result, Err(EngineError::Halted));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(engine.top().bid, Some(Price::from_u64(100)));
        assert!(engine.trades().is_empty());

        engine.start();
        engine.submit(ask("a-2", 50, "100")).unwrap();
        assert_eq!(engine.trades().len(), 1);
    }

    #[test]
    fn test_units_conserved() {
        let mut engine = engine();

        let submitted: u64 = 76 + 45 + 80 + 100;
        engine.submit(bid("b-1", 76, "10")).unwrap();
        engine.submit(ask("a-2", 45, "9")).unwrap();
        engine.submit(ask("a-3", 80, "9.5")).unwrap();
        engine.submit(bid("b-4", 100, "10.5")).unwrap();

        let traded: u64 = engine.trades().iter().map(|t| t.units.get()).sum();
        // Each trade consumes units from both sides once
        assert_eq!(2 * traded, submitted - engine.book().resting_units());
    }

    #[test]
    fn test_exact_size_match_leaves_no_residual() {
        let mut engine = engine();

        engine.submit(ask("a-1", 25, "100")).unwrap();
        engine.submit(bid("b-2", 25, "100")).unwrap();

        assert_eq!(engine.trades().len(), 1);
        assert!(engine.book().bids.is_empty());
        assert!(engine.book().asks.is_empty());
    }

    #[test]
    fn test_candidates_consumed_in_insertion_order() {
        let mut engine = engine();

        engine.submit(ask("a-1", 10, "101")).unwrap();
        engine.submit(ask("a-2", 10, "100")).unwrap();

        // Crosses both asks; the earlier-inserted a-1 fills first even
        // though a-2 has the better price
        engine.submit(bid("b-3", 15, "101")).unwrap();

        let trades = engine.trades();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].ask_order.order_id.as_str(), "a-1");
        assert_eq!(trades[0].units, Units::new(10));
        assert_eq!(trades[0].price, Price::from_u64(101));
        assert_eq!(trades[1].ask_order.order_id.as_str(), "a-2");
        assert_eq!(trades[1].units, Units::new(5));
        assert_eq!(trades[1].price, Price::from_u64(100));
    }

    #[test]
    fn test_executed_orders_flattened_in_trade_order() {
        let mut engine = engine();

        engine.submit(bid("b-1", 50, "100")).unwrap();
        engine.submit(ask("a-2", 10, "100")).unwrap();
        engine.submit(ask("a-3", 10, "99")).unwrap();

        let orders = engine.executed_orders();
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].order_id.as_str(), "b-1");
        assert_eq!(orders[1].order_id.as_str(), "a-2");
        assert_eq!(orders[2].order_id.as_str(), "b-1");
        assert_eq!(orders[3].order_id.as_str(), "a-3");
    }
}
