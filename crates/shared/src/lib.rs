//! Shared utilities and common types for the TA Directory backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Token generation and hashing
//! - Cursor pagination helpers
//! - Email and search input validation

pub mod crypto;
pub mod pagination;
pub mod validation;
