//! Cart Entities
//!
//! One cart per user. Item prices are captured at add time and
//! repriced at checkout; the cart keeps cached totals for display.

use chrono::{DateTime, Utc};
use kernel::id::{CartId, CartItemId, CourseId, UserId};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Cart {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            cart_id: CartId::new(),
            user_id,
            subtotal: Decimal::ZERO,
            total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute cached totals from the current items
    pub fn recalculate(&mut self, items: &[CartItem]) {
        self.subtotal = items.iter().map(|i| i.price).sum();
        self.total = self.subtotal;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct CartItem {
    pub cart_item_id: CartItemId,
    pub cart_id: CartId,
    pub course_id: CourseId,
    /// Effective price when the course was added
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(cart_id: CartId, course_id: CourseId, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            cart_item_id: CartItemId::new(),
            cart_id,
            course_id,
            price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_recalculate_sums_item_prices() {
        let mut cart = Cart::new(UserId::new());
        let items = vec![
            CartItem::new(cart.cart_id, CourseId::new(), dec!(49.99)),
            CartItem::new(cart.cart_id, CourseId::new(), dec!(10.00)),
        ];

        cart.recalculate(&items);
        assert_eq!(cart.subtotal, dec!(59.99));
        assert_eq!(cart.total, dec!(59.99));
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let mut cart = Cart::new(UserId::new());
        cart.recalculate(&[]);
        assert_eq!(cart.total, Decimal::ZERO);
    }
}
