//! Profile merge engine.
//!
//! Executes an approved claim: the placeholder's assignments move to the
//! claiming account, the placeholder is marked consumed and an audit record
//! is written, all in one storage transaction. The preconditions are checked
//! again inside that transaction; an earlier eligibility result is never
//! trusted.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ClaimError;
use crate::models::{Identity, MergedSummary};

use super::store::ClaimStore;

/// Runs claims through a transactional [`ClaimStore`].
#[derive(Debug, Clone)]
pub struct ProfileMergeEngine<S> {
    store: S,
}

impl<S: ClaimStore> ProfileMergeEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Claim `profile_id` for `claimant_id` now.
    pub async fn claim(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
    ) -> Result<MergedSummary, ClaimError> {
        self.claim_at(profile_id, claimant_id, Utc::now()).await
    }

    /// Claim with an explicit timestamp for `claimed_at` and the audit record.
    pub async fn claim_at(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<MergedSummary, ClaimError> {
        if profile_id == claimant_id {
            return Err(ClaimError::InvalidClaimant);
        }

        match self.store.execute_claim(profile_id, claimant_id, at).await {
            Ok(transfer) => {
                let summary = MergedSummary::from(transfer);
                info!(
                    profile_id = %profile_id,
                    claimant_id = %claimant_id,
                    merged_assignments = summary.merged_assignments,
                    "Profile claimed"
                );
                Ok(summary)
            }
            Err(err) => {
                warn!(
                    profile_id = %profile_id,
                    claimant_id = %claimant_id,
                    error = %err,
                    "Profile claim rejected"
                );
                Err(err)
            }
        }
    }
}

/// Checks the claim preconditions against freshly read rows.
///
/// Storage backends call this inside their transaction, after locking the
/// placeholder row.
pub fn verify_claim_preconditions(profile: &Identity, claimant: &Identity) -> Result<(), ClaimError> {
    if claimant.id == profile.id || claimant.is_unclaimed {
        return Err(ClaimError::InvalidClaimant);
    }
    if !profile.is_unclaimed {
        return Err(ClaimError::AlreadyClaimed);
    }
    if profile.claimed_by.is_some() {
        return Err(ClaimError::Conflict);
    }
    Ok(())
}

/// Checks that a transfer neither dropped nor duplicated assignments.
pub fn verify_merge_counts(
    claimant_before: i64,
    profile_before: i64,
    claimant_after: i64,
    profile_after: i64,
) -> Result<(), ClaimError> {
    let expected = claimant_before + profile_before;
    if claimant_after != expected {
        return Err(ClaimError::MergeIncomplete {
            expected,
            actual: claimant_after,
        });
    }
    if profile_after != 0 {
        return Err(ClaimError::MergeIncomplete {
            expected: 0,
            actual: profile_after,
        });
    }
    Ok(())
}
