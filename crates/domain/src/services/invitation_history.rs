//! Invitation history per address.

use chrono::{DateTime, Utc};
use tracing::info;

use shared::validation::normalize_email;

use crate::errors::{InvitationError, StoreError};
use crate::models::{InvitationEdge, InvitationHistoryEntry};

use super::store::InvitationStore;

/// Entries for `edges`, newest first, with status derived at `now`.
pub fn build_history(edges: &[InvitationEdge], now: DateTime<Utc>) -> Vec<InvitationHistoryEntry> {
    let mut entries: Vec<InvitationHistoryEntry> = edges
        .iter()
        .map(|edge| InvitationHistoryEntry::from_edge(edge, now))
        .collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    entries
}

#[derive(Debug, Clone)]
pub struct InvitationHistoryService<S> {
    store: S,
}

impl<S: InvitationStore> InvitationHistoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every invitation ever sent to `email`, including expired and used ones.
    pub async fn history(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvitationHistoryEntry>, StoreError> {
        let edges = self
            .store
            .invitations_for_email(&normalize_email(email))
            .await?;
        Ok(build_history(&edges, now))
    }

    /// Redeems an invitation token.
    pub async fn accept(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<InvitationEdge, InvitationError> {
        let edge = self.store.accept_invitation(token, at).await?;
        info!(invitation_id = %edge.id, inviter_id = %edge.inviter_id, "Invitation accepted");
        Ok(edge)
    }
}
