//! Command dispatcher and engine task
//!
//! The engine runs as a single spawned task draining a command channel, so
//! every command executes to completion (state mutation plus all event
//! emissions) before the next is observed. Request-reply commands carry a
//! oneshot sender; replies go out after the command has fully applied.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::info;
use types::errors::EngineError;
use types::ids::Symbol;
use types::order::Order;

use crate::engine::Engine;
use crate::events::{MarketEvent, DEFAULT_EVENT_CAPACITY};
use crate::reply::{AskResult, BidResult, GetPriceResult, GetTradesResult};

/// Engine task configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Broadcast capacity of the event stream
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Commands accepted by the engine task
///
/// The set is closed: the transport owns type discipline, so there is no
/// unrecognised-command arm to ignore.
#[derive(Debug)]
pub enum EngineCommand {
    PlaceBid {
        order: Order,
        reply: oneshot::Sender<BidResult>,
    },
    PlaceAsk {
        order: Order,
        reply: oneshot::Sender<AskResult>,
    },
    GetPrice {
        reply: oneshot::Sender<GetPriceResult>,
    },
    GetTrades {
        reply: oneshot::Sender<GetTradesResult>,
    },
    Halt,
    Start,
}

/// Cheap-to-clone handle to a running engine task
///
/// Commands from one handle are processed in submission order. The handle
/// is the only way in; the broadcast stream is the only way out besides
/// per-command replies.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
    events: broadcast::Sender<MarketEvent>,
}

impl EngineHandle {
    /// Spawn an engine task for one symbol with default configuration
    pub fn spawn(symbol: Symbol) -> Self {
        Self::spawn_with_config(symbol, EngineConfig::default())
    }

    /// Spawn an engine task for one symbol
    pub fn spawn_with_config(symbol: Symbol, config: EngineConfig) -> Self {
        let engine = Engine::with_event_capacity(symbol, config.event_capacity);
        let events = engine.event_sender();
        let (commands, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_engine(engine, command_rx));

        Self { commands, events }
    }

    /// Submit a bid; replies after the order is fully processed
    pub async fn place_bid(&self, order: Order) -> Result<BidResult, EngineError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EngineCommand::PlaceBid { order, reply })?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)
    }

    /// Submit an ask; replies after the order is fully processed
    pub async fn place_ask(&self, order: Order) -> Result<AskResult, EngineError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EngineCommand::PlaceAsk { order, reply })?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)
    }

    /// Query the derived best prices
    pub async fn get_price(&self) -> Result<GetPriceResult, EngineError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EngineCommand::GetPrice { reply })?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)
    }

    /// Query the flattened executed-order list
    pub async fn get_trades(&self) -> Result<GetTradesResult, EngineError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EngineCommand::GetTrades { reply })?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)
    }

    /// Halt the engine; takes effect on receipt, no reply
    pub fn halt(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Halt)
    }

    /// Start the engine; takes effect on receipt, no reply
    pub fn start(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Start)
    }

    /// Subscribe to the broadcast event stream
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .map_err(|_| EngineError::Unavailable)
    }
}

/// Engine task: drain commands until every handle is dropped
async fn run_engine(mut engine: Engine, mut commands: mpsc::UnboundedReceiver<EngineCommand>) {
    info!(symbol = %engine.symbol(), "engine task started");

    while let Some(command) = commands.recv().await {
        match command {
            EngineCommand::PlaceBid { order, reply } => {
                let result = match engine.submit(order) {
                    Ok(()) => BidResult::accepted(),
                    Err(err) => BidResult::rejected(&err),
                };
                // The command has fully applied; a dropped caller is fine
                let _ = reply.send(result);
            }
            EngineCommand::PlaceAsk { order, reply } => {
                let result = match engine.submit(order) {
                    Ok(()) => AskResult::accepted(),
                    Err(err) => AskResult::rejected(&err),
                };
                let _ = reply.send(result);
            }
            EngineCommand::GetPrice { reply } => {
                let _ = reply.send(GetPriceResult::from_top(engine.top()));
            }
            EngineCommand::GetTrades { reply } => {
                let _ = reply.send(GetTradesResult::from_executed(engine.executed_orders()));
            }
            EngineCommand::Halt => engine.halt(),
            EngineCommand::Start => engine.start(),
        }
    }

    info!(symbol = %engine.symbol(), "engine task stopped");
}
