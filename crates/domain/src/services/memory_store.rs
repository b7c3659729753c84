//! In-memory directory backing the store traits.
//!
//! Used by the service tests and by the API when it runs without a database.
//! All state sits behind one async mutex, so each trait call is atomic.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use shared::crypto::generate_invitation_token;
use shared::validation::{normalize_email, validate_email_address};

use crate::errors::{ClaimError, InvitationError, StoreError};
use crate::models::{Assignment, AuditRecord, ClaimTransfer, Identity, InvitationEdge, NewInvitation};

use super::audit::audit_helpers;
use super::profile_merge::{verify_claim_preconditions, verify_merge_counts};
use super::store::{ClaimStore, IdentityStore, InvitationCreator, InvitationStore};

#[derive(Debug, Default)]
struct DirectoryState {
    identities: HashMap<Uuid, Identity>,
    assignments: Vec<Assignment>,
    invitations: Vec<InvitationEdge>,
    audit_log: Vec<AuditRecord>,
}

impl DirectoryState {
    fn count_assignments(&self, identity_id: Uuid) -> i64 {
        self.assignments
            .iter()
            .filter(|a| a.identity_id == identity_id)
            .count() as i64
    }
}

/// Shared in-memory directory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_identity(&self, identity: Identity) {
        self.state
            .lock()
            .await
            .identities
            .insert(identity.id, identity);
    }

    pub async fn insert_assignment(&self, assignment: Assignment) {
        self.state.lock().await.assignments.push(assignment);
    }

    /// Inserts an edge as-is, bypassing the active-invitation check.
    pub async fn insert_invitation(&self, edge: InvitationEdge) {
        self.state.lock().await.invitations.push(edge);
    }

    pub async fn identity(&self, id: Uuid) -> Option<Identity> {
        self.state.lock().await.identities.get(&id).cloned()
    }

    pub async fn assignments_for(&self, identity_id: Uuid) -> Vec<Assignment> {
        self.state
            .lock()
            .await
            .assignments
            .iter()
            .filter(|a| a.identity_id == identity_id)
            .cloned()
            .collect()
    }

    pub async fn audit_records(&self) -> Vec<AuditRecord> {
        self.state.lock().await.audit_log.clone()
    }

    pub async fn invitations(&self) -> Vec<InvitationEdge> {
        self.state.lock().await.invitations.clone()
    }
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryDirectory {
    async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        Ok(self.identity(id).await)
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let state = self.state.lock().await;
        let mut identities: Vec<Identity> = state.identities.values().cloned().collect();
        identities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(identities)
    }

    async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<Identity>, StoreError> {
        let state = self.state.lock().await;
        let mut profiles: Vec<&Identity> = state
            .identities
            .values()
            .filter(|i| i.is_claimable())
            .filter(|i| match search {
                Some(needle) => i.display_name().to_lowercase().contains(needle),
                None => true,
            })
            .filter(|i| match after {
                Some(position) => (i.created_at, i.id) > position,
                None => true,
            })
            .collect();
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(profiles
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_assignments(&self, identity_id: Uuid) -> Result<i64, StoreError> {
        Ok(self.state.lock().await.count_assignments(identity_id))
    }
}

#[async_trait::async_trait]
impl ClaimStore for InMemoryDirectory {
    async fn execute_claim(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimTransfer, ClaimError> {
        let mut state = self.state.lock().await;

        let mut profile = state
            .identities
            .get(&profile_id)
            .cloned()
            .ok_or_else(|| ClaimError::NotFound("profile".to_string()))?;
        let claimant = state
            .identities
            .get(&claimant_id)
            .cloned()
            .ok_or_else(|| ClaimError::NotFound("claimant".to_string()))?;

        verify_claim_preconditions(&profile, &claimant)?;

        let claimant_before = state.count_assignments(claimant_id);
        let profile_before = state.count_assignments(profile_id);

        // Work on a staged copy; the live state is only replaced on success.
        let mut staged = state.assignments.clone();
        let mut merged_assignment_ids = Vec::new();
        for assignment in staged.iter_mut().filter(|a| a.identity_id == profile_id) {
            assignment.identity_id = claimant_id;
            merged_assignment_ids.push(assignment.id);
        }

        let count = |id: Uuid| staged.iter().filter(|a| a.identity_id == id).count() as i64;
        verify_merge_counts(
            claimant_before,
            profile_before,
            count(claimant_id),
            count(profile_id),
        )?;

        profile.claimed_by = Some(claimant_id);
        profile.claimed_at = Some(claimed_at);

        let audit = audit_helpers::profile_claimed(
            claimant_id,
            profile_id,
            &profile.display_name(),
            &merged_assignment_ids,
            claimed_at,
        );

        state.assignments = staged;
        state.identities.insert(profile_id, profile.clone());
        state.audit_log.push(audit.clone());

        Ok(ClaimTransfer {
            profile,
            claimant_id,
            merged_assignment_ids,
            audit,
        })
    }
}

#[async_trait::async_trait]
impl InvitationStore for InMemoryDirectory {
    async fn list_invitations(&self) -> Result<Vec<InvitationEdge>, StoreError> {
        Ok(self.invitations().await)
    }

    async fn invitations_for_email(&self, email: &str) -> Result<Vec<InvitationEdge>, StoreError> {
        let email = normalize_email(email);
        let state = self.state.lock().await;
        let mut edges: Vec<InvitationEdge> = state
            .invitations
            .iter()
            .filter(|e| normalize_email(&e.invitee_email) == email)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(edges)
    }

    async fn accept_invitation(
        &self,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<InvitationEdge, InvitationError> {
        let mut state = self.state.lock().await;
        let edge = state
            .invitations
            .iter_mut()
            .find(|e| e.token == token)
            .ok_or(InvitationError::NotFound)?;

        if edge.used_at.is_some() {
            return Err(InvitationError::AlreadyUsed);
        }
        if edge.expires_at <= accepted_at {
            return Err(InvitationError::Expired);
        }

        edge.used_at = Some(accepted_at);
        Ok(edge.clone())
    }
}

#[async_trait::async_trait]
impl InvitationCreator for InMemoryDirectory {
    async fn create_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<InvitationEdge, InvitationError> {
        let email = normalize_email(&invitation.invitee_email);
        validate_email_address(&email)
            .map_err(|_| InvitationError::InvalidEmail(invitation.invitee_email.clone()))?;

        let mut state = self.state.lock().await;
        let now = invitation.created_at;
        if state
            .invitations
            .iter()
            .any(|e| normalize_email(&e.invitee_email) == email && e.is_active_at(now))
        {
            return Err(InvitationError::ActiveInvitationExists(email));
        }

        let edge = InvitationEdge {
            id: Uuid::new_v4(),
            invitee_email: email,
            inviter_id: invitation.inviter_id,
            token: generate_invitation_token(),
            personal_message: invitation.personal_message,
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
            used_at: None,
        };
        state.invitations.push(edge.clone());
        Ok(edge)
    }
}
