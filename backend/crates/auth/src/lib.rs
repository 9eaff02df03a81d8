//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User registration/login with email + password
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Role-based access (Student, Instructor, Admin)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Sessions bound to client fingerprint (User-Agent)
//! - Automatic lockout after failed login attempts

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthLayerState, CurrentUser, require_admin, require_auth, require_instructor};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
