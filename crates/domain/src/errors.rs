//! Domain error types.
//!
//! Expected business outcomes (name mismatch, already claimed, per-item bulk
//! failures) are modelled as values, not errors. The types here cover failed
//! operations that a caller must handle explicitly.

use thiserror::Error;

/// Failure reported by a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Failure while executing a profile claim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Profile is not an unclaimed placeholder")]
    AlreadyClaimed,

    #[error("Profile was claimed by another user")]
    Conflict,

    #[error("Identity cannot claim profiles")]
    InvalidClaimant,

    #[error("Merge incomplete: expected {expected} assignments, found {actual}")]
    MergeIncomplete { expected: i64, actual: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while creating or accepting a single invitation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvitationError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("An active invitation already exists for {0}")]
    ActiveInvitationExists(String),

    #[error("Invitation not found")]
    NotFound,

    #[error("Invitation has already been used")]
    AlreadyUsed,

    #[error("Invitation has expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of a bulk dispatch request as a whole.
///
/// Individual item failures never surface here; they are counted in the
/// outcome instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BulkInvitationError {
    #[error("Bulk request has {requested} profiles; the maximum is {max}")]
    BatchTooLarge { requested: usize, max: usize },
}
