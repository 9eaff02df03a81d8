//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod token;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
