//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility.
//! Comparisons are exact decimal equality; there is no tolerance.

use types::numeric::Price;

/// Check if a bid and ask can match at the given prices
///
/// A buy matches a sell when the bid price is at or above the ask price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        assert!(can_match(Price::from_u64(100), Price::from_u64(99)));
    }

    #[test]
    fn test_can_match_exact() {
        let price = Price::from_u64(100);
        assert!(can_match(price, price), "equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        assert!(!can_match(Price::from_u64(99), Price::from_u64(100)));
    }

    #[test]
    fn test_exact_decimal_boundary() {
        let bid: Price = "9.5".parse().unwrap();
        let ask: Price = "9.50".parse().unwrap();
        assert!(can_match(bid, ask), "9.5 and 9.50 are the same price");
    }
}
