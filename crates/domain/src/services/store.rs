//! Storage traits consumed by the domain services.
//!
//! The persistence crate implements these over PostgreSQL;
//! [`InMemoryDirectory`](super::memory_store::InMemoryDirectory) implements
//! them for tests and local development.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{ClaimError, InvitationError, StoreError};
use crate::models::{ClaimTransfer, Identity, InvitationEdge, NewInvitation};

/// Read access to identity and assignment records.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError>;

    /// Unclaimed placeholders ordered by `(created_at, id)`, starting after
    /// the given position, optionally filtered by a lowercased name fragment.
    async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<Identity>, StoreError>;

    async fn count_assignments(&self, identity_id: Uuid) -> Result<i64, StoreError>;
}

/// Transactional claim execution.
///
/// Implementations must run re-verification, assignment transfer, the
/// `claimed_by` update and the audit insert as one atomic unit.
#[async_trait::async_trait]
pub trait ClaimStore: Send + Sync {
    async fn execute_claim(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimTransfer, ClaimError>;
}

/// Read access to invitation edges plus the acceptance transition.
#[async_trait::async_trait]
pub trait InvitationStore: Send + Sync {
    async fn list_invitations(&self) -> Result<Vec<InvitationEdge>, StoreError>;

    /// Edges for a normalized address, newest first.
    async fn invitations_for_email(&self, email: &str) -> Result<Vec<InvitationEdge>, StoreError>;

    /// Marks the invitation used. Used, expired and unknown tokens are rejected.
    async fn accept_invitation(
        &self,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<InvitationEdge, InvitationError>;
}

/// The single-invitation primitive.
///
/// Implementations validate the address and reject it while another
/// invitation to the same address is active.
#[async_trait::async_trait]
pub trait InvitationCreator: Send + Sync {
    async fn create_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<InvitationEdge, InvitationError>;
}

#[async_trait::async_trait]
impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        (**self).find_identity(id).await
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        (**self).list_identities().await
    }

    async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<Identity>, StoreError> {
        (**self).list_claimable(search, after, limit).await
    }

    async fn count_assignments(&self, identity_id: Uuid) -> Result<i64, StoreError> {
        (**self).count_assignments(identity_id).await
    }
}

#[async_trait::async_trait]
impl<T: InvitationCreator + ?Sized> InvitationCreator for Arc<T> {
    async fn create_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<InvitationEdge, InvitationError> {
        (**self).create_invitation(invitation).await
    }
}

#[async_trait::async_trait]
impl<T: ClaimStore + ?Sized> ClaimStore for Arc<T> {
    async fn execute_claim(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimTransfer, ClaimError> {
        (**self).execute_claim(profile_id, claimant_id, claimed_at).await
    }
}

#[async_trait::async_trait]
impl<T: InvitationStore + ?Sized> InvitationStore for Arc<T> {
    async fn list_invitations(&self) -> Result<Vec<InvitationEdge>, StoreError> {
        (**self).list_invitations().await
    }

    async fn invitations_for_email(&self, email: &str) -> Result<Vec<InvitationEdge>, StoreError> {
        (**self).invitations_for_email(email).await
    }

    async fn accept_invitation(
        &self,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<InvitationEdge, InvitationError> {
        (**self).accept_invitation(token, accepted_at).await
    }
}
