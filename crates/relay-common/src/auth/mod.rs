//! Credential verification

mod token;

pub use token::{Claims, TokenVerifier};
