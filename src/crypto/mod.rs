//! Cryptographic functions
//!
//! Argon2id password hashing for user credentials.

pub mod password;

pub use password::{HashParams, PasswordHasher};
