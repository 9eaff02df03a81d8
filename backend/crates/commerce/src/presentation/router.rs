//! Commerce Routers

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::config::CommerceConfig;
use crate::infra::postgres::PgCommerceStore;
use crate::presentation::handlers::{self, CommerceState};

/// Cart, checkout, and order history. Requires authentication.
pub fn checkout_router(store: PgCommerceStore, config: Arc<CommerceConfig>) -> Router {
    let state = CommerceState { store, config };

    Router::new()
        .route("/cart", get(handlers::show_cart).delete(handlers::clear_cart))
        .route("/cart/items", post(handlers::add_to_cart))
        .route("/cart/items/{id}", delete(handlers::remove_cart_item))
        .route("/cart/refresh", post(handlers::refresh_cart))
        .route("/checkout/process", post(handlers::process_checkout))
        .route("/checkout/orders", get(handlers::list_orders))
        .route("/checkout/orders/{order_number}", get(handlers::show_order))
        .route(
            "/checkout/receipts/{order_number}",
            get(handlers::show_receipt),
        )
        .with_state(state)
}

/// Gateway-facing webhook. Authenticated by signature, not session.
pub fn webhook_router(store: PgCommerceStore, config: Arc<CommerceConfig>) -> Router {
    let state = CommerceState { store, config };

    Router::new()
        .route("/payment", post(handlers::payment_webhook))
        .with_state(state)
}
