//! Argon2id password hashing.

pub mod hasher;

pub use hasher::PasswordHasher;
