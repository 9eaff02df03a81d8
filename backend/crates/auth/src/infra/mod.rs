//! Infrastructure Layer
//!
//! PostgreSQL repository implementations.

pub mod postgres;
