//! Repository implementations for database operations.
//!
//! Each repository implements one of the domain storage traits over a
//! PostgreSQL pool.

pub mod audit_log;
pub mod claim;
pub mod identity;
pub mod invitation;

pub use audit_log::insert_audit_record;
pub use claim::ClaimRepository;
pub use identity::IdentityRepository;
pub use invitation::InvitationRepository;

use domain::errors::StoreError;

/// Converts a driver error into the domain storage error.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Builds a `LIKE` pattern matching `fragment` anywhere, escaping wildcards.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
