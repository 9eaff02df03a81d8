//! Value Object Module

pub mod email;
pub mod person_name;
pub mod public_id;
pub mod user_password;
pub mod user_role;
pub mod user_status;
