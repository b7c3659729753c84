//! Bulk invitation dispatch.
//!
//! Sends one invitation per placeholder profile, in input order, through the
//! single-invitation primitive. Item failures are collected rather than
//! propagated; the only request-level failure is an oversized batch.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::BulkInvitationError;
use crate::models::{
    BulkInviteItemResult, BulkInviteItemStatus, BulkInviteOutcome, NewInvitation,
    DEFAULT_INVITATION_EXPIRY_DAYS,
};

use super::store::{IdentityStore, InvitationCreator};

/// Limits applied to bulk requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkInvitationPolicy {
    /// Lifetime of each invitation created.
    pub expiry: Duration,
    /// Largest accepted batch; `None` means unbounded.
    pub max_batch_size: Option<usize>,
}

impl Default for BulkInvitationPolicy {
    fn default() -> Self {
        Self {
            expiry: Duration::days(DEFAULT_INVITATION_EXPIRY_DAYS),
            max_batch_size: None,
        }
    }
}

/// Running fold over per-item results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDispatchTally {
    outcome: BulkInviteOutcome,
}

impl BulkDispatchTally {
    pub fn record(mut self, item: BulkInviteItemResult) -> Self {
        match item.status {
            BulkInviteItemStatus::Sent => self.outcome.sent += 1,
            BulkInviteItemStatus::Failed => self.outcome.failed += 1,
        }
        self.outcome.results.push(item);
        self
    }

    pub fn finish(self) -> BulkInviteOutcome {
        self.outcome
    }
}

/// Invites placeholder profiles in bulk.
#[derive(Debug, Clone)]
pub struct BulkInvitationDispatcher<I, C> {
    identities: I,
    creator: C,
    policy: BulkInvitationPolicy,
}

impl<I: IdentityStore, C: InvitationCreator> BulkInvitationDispatcher<I, C> {
    pub fn new(identities: I, creator: C, policy: BulkInvitationPolicy) -> Self {
        Self {
            identities,
            creator,
            policy,
        }
    }

    pub async fn dispatch_bulk(
        &self,
        inviter_id: Uuid,
        profile_ids: &[Uuid],
        personal_message: Option<String>,
    ) -> Result<BulkInviteOutcome, BulkInvitationError> {
        self.dispatch_bulk_at(inviter_id, profile_ids, personal_message, Utc::now())
            .await
    }

    /// Dispatch with an explicit creation time for every invitation.
    pub async fn dispatch_bulk_at(
        &self,
        inviter_id: Uuid,
        profile_ids: &[Uuid],
        personal_message: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BulkInviteOutcome, BulkInvitationError> {
        if let Some(max) = self.policy.max_batch_size {
            if profile_ids.len() > max {
                return Err(BulkInvitationError::BatchTooLarge {
                    requested: profile_ids.len(),
                    max,
                });
            }
        }

        let mut tally = BulkDispatchTally::default();
        for &profile_id in profile_ids {
            let item = self
                .dispatch_one(inviter_id, profile_id, personal_message.as_deref(), now)
                .await;
            tally = tally.record(item);
        }

        let outcome = tally.finish();
        info!(
            inviter_id = %inviter_id,
            requested = profile_ids.len(),
            sent = outcome.sent,
            failed = outcome.failed,
            "Bulk invitation dispatch finished"
        );
        Ok(outcome)
    }

    async fn dispatch_one(
        &self,
        inviter_id: Uuid,
        profile_id: Uuid,
        personal_message: Option<&str>,
        now: DateTime<Utc>,
    ) -> BulkInviteItemResult {
        let profile = match self.identities.find_identity(profile_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return BulkInviteItemResult::failed(profile_id, "profile not found"),
            Err(e) => {
                warn!(profile_id = %profile_id, error = %e, "Profile lookup failed");
                return BulkInviteItemResult::failed(profile_id, e.to_string());
            }
        };

        let invitation = NewInvitation {
            invitee_email: profile.email,
            inviter_id,
            personal_message: personal_message.map(str::to_string),
            created_at: now,
            expires_at: now + self.policy.expiry,
        };

        match self.creator.create_invitation(invitation).await {
            Ok(edge) => BulkInviteItemResult::sent(profile_id, edge.id),
            Err(e) => {
                warn!(profile_id = %profile_id, error = %e, "Invitation not sent");
                BulkInviteItemResult::failed(profile_id, e.to_string())
            }
        }
    }
}
