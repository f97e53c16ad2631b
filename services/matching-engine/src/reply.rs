//! Per-command reply types
//!
//! The reason vocabulary is part of the contract with command sources:
//! "Valid Order" / "Invalid Order" / "Engine Halted" for placements,
//! "Price Available" / "Price Unavailable" for quotes, and
//! "No order has been executed" / "<n> Orders Filled" for the trade query.

use serde::{Deserialize, Serialize};
use types::errors::EngineError;
use types::numeric::Price;
use types::order::Order;

use crate::book::TopOfBook;

fn reject_reason(err: &EngineError) -> &'static str {
    match err {
        EngineError::Order(_) => "Invalid Order",
        EngineError::Halted => "Engine Halted",
        EngineError::Unavailable => "Engine Unavailable",
    }
}

/// Reply to a place-bid command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidResult {
    pub success: bool,
    pub reason: String,
}

impl BidResult {
    pub fn accepted() -> Self {
        Self {
            success: true,
            reason: "Valid Order".to_string(),
        }
    }

    pub fn rejected(err: &EngineError) -> Self {
        Self {
            success: false,
            reason: reject_reason(err).to_string(),
        }
    }
}

/// Reply to a place-ask command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResult {
    pub success: bool,
    pub reason: String,
}

impl AskResult {
    pub fn accepted() -> Self {
        Self {
            success: true,
            reason: "Valid Order".to_string(),
        }
    }

    pub fn rejected(err: &EngineError) -> Self {
        Self {
            success: false,
            reason: reject_reason(err).to_string(),
        }
    }
}

/// Reply to a get-price command
///
/// Partial quotes are reported: one side can be populated while success is
/// false because the other side is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPriceResult {
    pub bid: Option<Price>,
    pub ask: Option<Price>,
    pub success: bool,
    pub reason: String,
}

impl GetPriceResult {
    pub fn from_top(top: TopOfBook) -> Self {
        let success = top.bid.is_some() && top.ask.is_some();
        Self {
            bid: top.bid,
            ask: top.ask,
            success,
            reason: if success {
                "Price Available".to_string()
            } else {
                "Price Unavailable".to_string()
            },
        }
    }
}

/// Reply to a get-trades command
///
/// `orders` is the flattened `[bid_order, ask_order]` list per trade, in
/// trade-append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTradesResult {
    pub orders: Vec<Order>,
    pub success: bool,
    pub reason: String,
}

impl GetTradesResult {
    pub fn from_executed(orders: Vec<Order>) -> Self {
        if orders.is_empty() {
            Self {
                orders,
                success: false,
                reason: "No order has been executed".to_string(),
            }
        } else {
            let reason = format!("{} Orders Filled", orders.len());
            Self {
                orders,
                success: true,
                reason,
            }
        }
    }
}
