//! Domain Layer

pub mod cart;
pub mod enrollment;
pub mod order;
pub mod payment;

pub use cart::{Cart, CartItem};
pub use enrollment::Enrollment;
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{Payment, PaymentOutcome, WebhookEvent};
