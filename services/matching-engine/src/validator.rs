//! Admission validation
//!
//! An order is invalid if its price or units are non-positive, or if its id
//! has ever been admitted before. Nothing else is checked here: non-empty
//! ids and symbol routing are the command source's responsibility.

use std::collections::HashSet;

use types::errors::OrderError;
use types::ids::OrderId;
use types::order::Order;

/// Validate an order against the set of every id ever admitted
///
/// Duplicate detection runs against all ids ever seen, not just the ids
/// currently resting: an id whose earlier order was fully filled and
/// removed from the book is still taken.
pub fn validate(order: &Order, seen_ids: &HashSet<OrderId>) -> Result<(), OrderError> {
    if !order.price.is_positive() {
        return Err(OrderError::InvalidPrice(order.price));
    }

    if order.units.is_zero() {
        return Err(OrderError::InvalidUnits);
    }

    if seen_ids.contains(&order.order_id) {
        return Err(OrderError::DuplicateOrderId(order.order_id.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::numeric::{Price, Units};
    use types::order::Side;

    fn order(id: &str, price: Price, units: u64) -> Order {
        Order::new(id, "ACME", Side::Bid, price, Units::new(units))
    }

    #[test]
    fn test_valid_order_passes() {
        let seen = HashSet::new();
        assert!(validate(&order("o-1", Price::from_u64(10), 1), &seen).is_ok());
    }

    #[test]
    fn test_zero_price_rejected() {
        let seen = HashSet::new();
        let result = validate(&order("o-1", Price::new(Decimal::ZERO), 5), &seen);
        assert!(matches!(result, Err(OrderError::InvalidPrice(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let seen = HashSet::new();
        let result = validate(&order("o-1", Price::new(Decimal::from(-3)), 5), &seen);
        assert!(matches!(result, Err(OrderError::InvalidPrice(_))));
    }

    #[test]
    fn test_zero_units_rejected() {
        let seen = HashSet::new();
        let result = validate(&order("o-1", Price::from_u64(10), 0), &seen);
        assert_eq!(result, Err(OrderError::InvalidUnits));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut seen = HashSet::new();
        seen.insert(OrderId::new("o-1"));

        let result = validate(&order("o-1", Price::from_u64(10), 5), &seen);
        assert_eq!(result, Err(OrderError::DuplicateOrderId(OrderId::new("o-1"))));
    }

    #[test]
    fn test_price_checked_before_duplicate() {
        let mut seen = HashSet::new();
        seen.insert(OrderId::new("o-1"));

        let result = validate(&order("o-1", Price::new(Decimal::ZERO), 5), &seen);
        assert!(matches!(result, Err(OrderError::InvalidPrice(_))));
    }
}
