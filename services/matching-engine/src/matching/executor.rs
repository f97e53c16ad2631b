//! Trade construction
//!
//! Builds the immutable trade record for each fill and stamps it with a
//! monotonically increasing sequence number.

use types::numeric::{Price, Units};
use types::order::Order;
use types::trade::Trade;

/// Match executor handling trade generation
#[derive(Debug)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with a starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Build the trade for one fill
    ///
    /// `price` is the resting (maker) side's posted price; the caller wires
    /// the bid and ask from the taker and counter-order sides.
    pub fn execute(
        &mut self,
        bid_order: Order,
        ask_order: Order,
        price: Price,
        units: Units,
    ) -> Trade {
        let sequence = self.next_sequence();
        Trade::new(sequence, bid_order, ask_order, price, units)
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(0)
    }
}
