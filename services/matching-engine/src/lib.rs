//! Matching Engine Service
//!
//! Continuous limit-order matching for a single instrument: admission,
//! crossing with partial fills at the maker's price, derived best-price
//! tracking, and a broadcast market-data stream. One engine instance per
//! symbol; spawn several to cover several instruments.
//!
//! **Key Invariants:**
//! - Resting residuals always have remaining units > 0
//! - The book is uncrossed after every command
//! - Order ids are unique across everything ever admitted
//! - The trade log is append-only
//!
//! # Architecture
//!
//! ```text
//!  EngineHandle (mpsc commands, oneshot replies)
//!        │
//!    ┌───▼────────┐
//!    │ Dispatcher │  ← one task, one command at a time
//!    └───┬────────┘
//!        │
//!   Validator → Book → Matcher
//!        │
//!    ┌───▼───────┐
//!    │ Publisher │  → broadcast MarketEvent stream
//!    └───────────┘
//! ```

pub mod actor;
pub mod book;
pub mod engine;
pub mod events;
pub mod lifecycle;
pub mod matching;
pub mod reply;
pub mod validator;

pub use actor::{EngineConfig, EngineHandle};
pub use engine::Engine;
pub use events::MarketEvent;
pub use reply::{AskResult, BidResult, GetPriceResult, GetTradesResult};
