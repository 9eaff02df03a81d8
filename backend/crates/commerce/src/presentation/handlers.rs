//! Commerce HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use auth::CurrentUser;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CartItemId, CourseId};
use platform::crypto::{constant_time_eq, from_base64url, hmac_sha256};

use crate::config::CommerceConfig;
use crate::domain::{PaymentOutcome, WebhookEvent};
use crate::infra::postgres::PgCommerceStore;
use crate::presentation::dto::{
    AddToCartRequest, CartItemResponse, CartResponse, OrderItemResponse, OrderResponse,
    ReceiptResponse, WebhookAck,
};

#[derive(Clone)]
pub struct CommerceState {
    pub store: PgCommerceStore,
    pub config: Arc<CommerceConfig>,
}

// ---------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------

/// GET /api/v1/cart
pub async fn show_cart(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<CartResponse>> {
    let cart = state.store.get_or_create_cart(current.user_id).await?;
    let items = state.store.list_cart_items(cart.cart_id).await?;

    Ok(Json(CartResponse {
        items: items.into_iter().map(CartItemResponse::from).collect(),
        subtotal: cart.subtotal,
        total: cart.total,
    }))
}

/// POST /api/v1/cart/items
pub async fn add_to_cart(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<CartResponse>)> {
    let cart = state.store.get_or_create_cart(current.user_id).await?;
    state
        .store
        .add_to_cart(&cart, CourseId::from_uuid(req.course_id))
        .await?;

    let cart = state.store.get_or_create_cart(current.user_id).await?;
    let items = state.store.list_cart_items(cart.cart_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CartResponse {
            items: items.into_iter().map(CartItemResponse::from).collect(),
            subtotal: cart.subtotal,
            total: cart.total,
        }),
    ))
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_cart_item(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let cart = state.store.get_or_create_cart(current.user_id).await?;
    state
        .store
        .remove_cart_item(&cart, CartItemId::from_uuid(cart_item_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cart/refresh
pub async fn refresh_cart(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<CartResponse>> {
    let cart = state.store.get_or_create_cart(current.user_id).await?;
    state.store.refresh_cart_prices(&cart).await?;

    let cart = state.store.get_or_create_cart(current.user_id).await?;
    let items = state.store.list_cart_items(cart.cart_id).await?;

    Ok(Json(CartResponse {
        items: items.into_iter().map(CartItemResponse::from).collect(),
        subtotal: cart.subtotal,
        total: cart.total,
    }))
}

/// DELETE /api/v1/cart
pub async fn clear_cart(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<StatusCode> {
    let cart = state.store.get_or_create_cart(current.user_id).await?;
    state.store.clear_cart(&cart).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Checkout and orders
// ---------------------------------------------------------------------

/// POST /api/v1/checkout/process
pub async fn process_checkout(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let (order, items) = state.store.checkout(current.user_id).await?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total,
        "order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::with_items(order, items)),
    ))
}

/// GET /api/v1/checkout/orders
pub async fn list_orders(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = state.store.list_orders(current.user_id).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::summary).collect()))
}

/// GET /api/v1/checkout/orders/{order_number}
pub async fn show_order(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
    Path(order_number): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let (order, items) = state
        .store
        .find_order_by_number(&order_number)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.user_id != current.user_id {
        return Err(AppError::not_found("Order not found"));
    }

    Ok(Json(OrderResponse::with_items(order, items)))
}

/// GET /api/v1/checkout/receipts/{order_number}
pub async fn show_receipt(
    State(state): State<CommerceState>,
    Extension(current): Extension<CurrentUser>,
    Path(order_number): Path<String>,
) -> AppResult<Json<ReceiptResponse>> {
    let (order, items) = state
        .store
        .find_order_by_number(&order_number)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.user_id != current.user_id {
        return Err(AppError::not_found("Order not found"));
    }

    if !order.is_paid() {
        return Err(AppError::unprocessable("Order has not been paid"));
    }

    Ok(Json(ReceiptResponse {
        order_number: order.order_number,
        paid_at: order.paid_at,
        payment_method: order.payment_method,
        items: items.into_iter().map(OrderItemResponse::from).collect(),
        subtotal: order.subtotal,
        discount: order.discount,
        total: order.total,
    }))
}

// ---------------------------------------------------------------------
// Payment webhook
// ---------------------------------------------------------------------

/// POST /api/v1/webhooks/payment
///
/// The signature covers the raw body, so the body is read as bytes and
/// parsed only after verification.
pub async fn payment_webhook(
    State(state): State<CommerceState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    if state.config.verify_signatures {
        verify_signature(&state.config, &headers, &body)?;
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("Invalid webhook payload: {}", e)))?;

    let outcome =
        PaymentOutcome::from_gateway(&event.transaction_status, event.fraud_status.as_deref())?;

    tracing::info!(
        order_number = %event.order_number,
        transaction_status = %event.transaction_status,
        ?outcome,
        "payment webhook received"
    );

    let order = state.store.apply_webhook(&event, outcome).await?;

    Ok(Json(WebhookAck {
        order_number: order.order_number,
        status: order.status,
    }))
}

fn verify_signature(config: &CommerceConfig, headers: &HeaderMap, body: &[u8]) -> AppResult<()> {
    let signature = headers
        .get("x-webhook-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing webhook signature"))?;

    let provided = from_base64url(signature)
        .map_err(|_| AppError::unauthorized("Malformed webhook signature"))?;
    let expected = hmac_sha256(&config.webhook_secret, body);

    if !constant_time_eq(&provided, &expected) {
        return Err(AppError::unauthorized("Invalid webhook signature"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::to_base64url;

    fn signed_headers(config: &CommerceConfig, body: &[u8]) -> HeaderMap {
        let sig = to_base64url(&hmac_sha256(&config.webhook_secret, body));
        let mut headers = HeaderMap::new();
        headers.insert("x-webhook-signature", sig.parse().unwrap());
        headers
    }

    #[test]
    fn test_valid_signature_passes() {
        let config = CommerceConfig::for_tests();
        let body = br#"{"order_number":"ORD-20260830-DEADBEEF"}"#;
        let headers = signed_headers(&config, body);

        assert!(verify_signature(&config, &headers, body).is_ok());
    }

    #[test]
    fn test_tampered_body_fails() {
        let config = CommerceConfig::for_tests();
        let body = br#"{"gross_amount":"10.00"}"#;
        let headers = signed_headers(&config, body);

        let tampered = br#"{"gross_amount":"0.01"}"#;
        assert!(verify_signature(&config, &headers, tampered).is_err());
    }

    #[test]
    fn test_missing_signature_fails() {
        let config = CommerceConfig::for_tests();
        let err = verify_signature(&config, &HeaderMap::new(), b"{}").unwrap_err();
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::Unauthorized);
    }

    #[test]
    fn test_wrong_key_fails() {
        let config = CommerceConfig::for_tests();
        let mut other = CommerceConfig::for_tests();
        other.webhook_secret = [9u8; 32];

        let body = b"{}";
        let headers = signed_headers(&other, body);
        assert!(verify_signature(&config, &headers, body).is_err());
    }
}
