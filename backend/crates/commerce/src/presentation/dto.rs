//! Commerce DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Order, OrderItem, OrderStatus};
use crate::infra::postgres::CartItemDetail;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub course_slug: String,
    /// Price captured when the item was added
    pub price: Decimal,
    /// What the course costs right now
    pub current_price: Decimal,
}

impl From<CartItemDetail> for CartItemResponse {
    fn from(detail: CartItemDetail) -> Self {
        Self {
            id: detail.item.cart_item_id.into_uuid(),
            course_id: detail.item.course_id.into_uuid(),
            course_title: detail.course_title,
            course_slug: detail.course_slug,
            price: detail.item.price,
            current_price: detail.current_price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub subtotal: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub course_id: Uuid,
    pub course_title: String,
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            course_id: item.course_id.into_uuid(),
            course_title: item.course_title,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_number: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

impl OrderResponse {
    pub fn summary(order: Order) -> Self {
        Self::build(order, None)
    }

    pub fn with_items(order: Order, items: Vec<OrderItem>) -> Self {
        let items = items.into_iter().map(OrderItemResponse::from).collect();
        Self::build(order, Some(items))
    }

    fn build(order: Order, items: Option<Vec<OrderItemResponse>>) -> Self {
        Self {
            order_number: order.order_number,
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            status: order.status,
            payment_method: order.payment_method,
            paid_at: order.paid_at,
            created_at: order.created_at,
            items,
        }
    }
}

/// Printable receipt for a paid order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub order_number: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub order_number: String,
    pub status: OrderStatus,
}
