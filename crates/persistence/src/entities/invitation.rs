//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InvitationEdge;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
///
/// Only the SHA-256 digest of a token is stored. The plaintext exists once,
/// in the edge returned at creation time.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub invitee_email: String,
    pub inviter_id: Uuid,
    pub token_hash: String,
    pub personal_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl InvitationEntity {
    /// Converts to a domain edge carrying the plaintext token.
    pub fn into_edge_with_token(self, token: String) -> InvitationEdge {
        InvitationEdge {
            token,
            ..self.into()
        }
    }
}

impl From<InvitationEntity> for InvitationEdge {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            invitee_email: entity.invitee_email,
            inviter_id: entity.inviter_id,
            token: entity.token_hash,
            personal_message: entity.personal_message,
            created_at: entity.created_at,
            expires_at: entity.expires_at,
            used_at: entity.used_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::crypto::sha256_hex;

    fn entity(token: &str) -> InvitationEntity {
        let now = Utc::now();
        InvitationEntity {
            id: Uuid::new_v4(),
            invitee_email: "new.ta@example.edu".to_string(),
            inviter_id: Uuid::new_v4(),
            token_hash: sha256_hex(token),
            personal_message: None,
            created_at: now,
            expires_at: now + Duration::days(14),
            used_at: None,
        }
    }

    #[test]
    fn test_stored_edge_carries_digest() {
        let edge: InvitationEdge = entity("plain-token").into();
        assert_eq!(edge.token, sha256_hex("plain-token"));
    }

    #[test]
    fn test_created_edge_carries_plaintext() {
        let entity = entity("plain-token");
        let id = entity.id;
        let edge = entity.into_edge_with_token("plain-token".to_string());
        assert_eq!(edge.id, id);
        assert_eq!(edge.token, "plain-token");
    }
}
