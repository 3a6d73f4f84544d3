//! Shared utilities and common types for the CineSync backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT bearer token generation and validation
//! - Password hashing with Argon2id
//! - Common validation logic
//! - Offset pagination helpers

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
