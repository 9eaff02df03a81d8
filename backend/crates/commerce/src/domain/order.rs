//! Order Entities
//!
//! Orders are created `pending` at checkout and moved by the payment
//! webhook:
//!
//! ```text
//! pending -> paid -> refunded
//!         -> failed
//!         -> cancelled
//! ```

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CourseId, OrderId, OrderItemId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "failed" => Ok(OrderStatus::Failed),
            "refunded" => Ok(OrderStatus::Refunded),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(AppError::bad_request(format!("Invalid order status: {}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub order_number: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user_id: UserId, subtotal: Decimal, discount: Decimal) -> Self {
        let now = Utc::now();
        let order_number =
            platform::code::generate_order_number(&now.format("%Y%m%d").to_string());

        Self {
            order_id: OrderId::new(),
            user_id,
            order_number,
            subtotal,
            discount,
            total: subtotal - discount,
            status: OrderStatus::Pending,
            payment_method: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    pub fn mark_paid(&mut self, payment_method: Option<String>) {
        self.status = OrderStatus::Paid;
        self.payment_method = payment_method;
        self.paid_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self) {
        self.status = OrderStatus::Failed;
        self.updated_at = Utc::now();
    }

    pub fn mark_refunded(&mut self) {
        self.status = OrderStatus::Refunded;
        self.updated_at = Utc::now();
    }
}

/// Snapshot of a purchased course at order time
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub course_id: CourseId,
    pub course_title: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn new(order_id: OrderId, course_id: CourseId, course_title: String, price: Decimal) -> Self {
        Self {
            order_item_id: OrderItemId::new(),
            order_id,
            course_id,
            course_title,
            price,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_number_format() {
        let order = Order::new(UserId::new(), dec!(100), Decimal::ZERO);
        assert!(order.order_number.starts_with("ORD-"));
        // ORD- + YYYYMMDD + - + 8 hex chars
        assert_eq!(order.order_number.len(), 21);
    }

    #[test]
    fn test_total_is_subtotal_minus_discount() {
        let order = Order::new(UserId::new(), dec!(100), dec!(25));
        assert_eq!(order.total, dec!(75));
    }

    #[test]
    fn test_mark_paid_sets_paid_at() {
        let mut order = Order::new(UserId::new(), dec!(10), Decimal::ZERO);
        assert!(order.paid_at.is_none());

        order.mark_paid(Some("credit_card".into()));
        assert!(order.is_paid());
        assert!(order.paid_at.is_some());
        assert_eq!(order.payment_method.as_deref(), Some("credit_card"));
    }
}
