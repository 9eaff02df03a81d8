//! Commerce Backend Module
//!
//! Cart, checkout, orders, payments, and enrollments. The payment
//! webhook drives the order/enrollment state machine.
//!
//! - `domain/` - Entities and the payment outcome mapping
//! - `infra/` - PostgreSQL store with transactional state transitions
//! - `presentation/` - HTTP handlers, DTOs, routers

pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use config::CommerceConfig;
pub use infra::postgres::PgCommerceStore;
pub use presentation::router::{checkout_router, webhook_router};
