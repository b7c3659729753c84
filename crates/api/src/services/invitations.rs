//! Invitation creation with email delivery.

use async_trait::async_trait;
use domain::errors::InvitationError;
use domain::models::{InvitationEdge, NewInvitation};
use domain::services::InvitationCreator;
use std::sync::Arc;
use tracing::warn;

use super::email::EmailService;

/// Wraps a storage-level [`InvitationCreator`] and emails each new invitation.
///
/// A delivery failure is logged and does not undo the invitation; the edge
/// is already committed.
#[derive(Clone)]
pub struct NotifyingInvitationCreator {
    inner: Arc<dyn InvitationCreator>,
    email: EmailService,
    base_url: String,
}

impl NotifyingInvitationCreator {
    pub fn new(inner: Arc<dyn InvitationCreator>, email: EmailService, base_url: String) -> Self {
        Self {
            inner,
            email,
            base_url,
        }
    }

    fn accept_url(&self, token: &str) -> String {
        format!(
            "{}/api/v1/invitations/{}/accept",
            self.base_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl InvitationCreator for NotifyingInvitationCreator {
    async fn create_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<InvitationEdge, InvitationError> {
        let edge = self.inner.create_invitation(invitation).await?;

        let expires_in_days = (edge.expires_at - edge.created_at).num_days();
        if let Err(e) = self
            .email
            .send_invitation_email(
                &edge.invitee_email,
                &self.accept_url(&edge.token),
                edge.personal_message.as_deref(),
                expires_in_days,
            )
            .await
        {
            warn!(invitation_id = %edge.id, error = %e, "Failed to send invitation email");
        }

        Ok(edge)
    }
}
