//! Catalog Backend Module
//!
//! Course catalog: categories, courses, sections, and lessons.
//!
//! - `domain/` - Entities and status machines for courses and lessons
//! - `infra/` - PostgreSQL store
//! - `presentation/` - HTTP handlers, DTOs, routers

pub mod domain;
pub mod infra;
pub mod presentation;

pub use infra::postgres::PgCatalogStore;
pub use presentation::router::{admin_router, instructor_router, public_router};
