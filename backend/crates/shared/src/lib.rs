//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest core of vocabulary shared by every bounded context:
//! - Unified error type and result alias
//! - Typed entity IDs
//! - Pagination envelope for list endpoints
//!
//! Only things that are hard to change and mean the same thing in every
//! context belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod page;
