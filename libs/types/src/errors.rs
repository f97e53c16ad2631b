//! Error taxonomy for the matching engine
//!
//! Errors are semantic, not exception-typed: an order is either invalid,
//! or arrived while the engine was halted. Internal invariant violations
//! are fatal and panic instead of appearing here.

use crate::ids::OrderId;
use crate::numeric::Price;
use thiserror::Error;

/// Reasons an order fails admission validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order price must be positive, got {0}")]
    InvalidPrice(Price),

    #[error("order units must be positive")]
    InvalidUnits,

    #[error("duplicate order id: {0}")]
    DuplicateOrderId(OrderId),
}

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid order: {0}")]
    Order(#[from] OrderError),

    #[error("engine halted")]
    Halted,

    #[error("engine task unavailable")]
    Unavailable,
}
