//! Utility functions

pub mod crypto;
pub mod pagination;
pub mod validation;

pub use crypto::{generate_secure_token, hash_token};
pub use pagination::page_offset;
pub use validation::{sanitize_string, validate_not_blank, validate_username};
