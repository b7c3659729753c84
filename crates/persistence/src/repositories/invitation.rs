//! Invitation repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::errors::{InvitationError, StoreError};
use domain::models::{InvitationEdge, NewInvitation};
use domain::services::{InvitationCreator, InvitationStore};
use shared::crypto::{generate_invitation_token, sha256_hex};
use shared::validation::{normalize_email, validate_email_address};
use sqlx::PgPool;
use tracing::info;

use super::store_error;
use crate::entities::InvitationEntity;
use crate::metrics::QueryTimer;

const INVITATION_COLUMNS: &str =
    "id, invitee_email, inviter_id, token_hash, personal_message, created_at, expires_at, used_at";

/// Repository for invitation edges.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every invitation edge.
    pub async fn list_all(&self) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations ORDER BY created_at, id",
            INVITATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List invitations for a normalized address, newest first.
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitations_by_email");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations WHERE invitee_email = $1 ORDER BY created_at DESC, id DESC",
            INVITATION_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert an invitation unless one is already active for the address.
    ///
    /// Creation for one address is serialized through a transaction-scoped
    /// advisory lock, so two concurrent requests cannot both pass the check.
    pub async fn create(
        &self,
        invitation: &NewInvitation,
        email: &str,
        token_hash: &str,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        let active = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM invitations
                WHERE invitee_email = $1 AND used_at IS NULL AND expires_at > $2
            )
            "#,
        )
        .bind(email)
        .bind(invitation.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if active {
            timer.record();
            return Ok(None);
        }

        let entity = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations (invitee_email, inviter_id, token_hash, personal_message, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(email)
        .bind(invitation.inviter_id)
        .bind(token_hash)
        .bind(invitation.personal_message.as_deref())
        .bind(invitation.created_at)
        .bind(invitation.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity))
    }

    /// Mark an invitation used, reporting why when it cannot be.
    pub async fn accept(
        &self,
        token_hash: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<Result<InvitationEntity, InvitationError>, sqlx::Error> {
        let timer = QueryTimer::new("accept_invitation");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations WHERE token_hash = $1 FOR UPDATE",
            INVITATION_COLUMNS
        ))
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let rejection = match &current {
            None => Some(InvitationError::NotFound),
            Some(row) if row.used_at.is_some() => Some(InvitationError::AlreadyUsed),
            Some(row) if row.expires_at <= accepted_at => Some(InvitationError::Expired),
            Some(_) => None,
        };
        if let Some(rejection) = rejection {
            timer.record();
            return Ok(Err(rejection));
        }

        let entity = sqlx::query_as::<_, InvitationEntity>(&format!(
            "UPDATE invitations SET used_at = $2 WHERE token_hash = $1 RETURNING {}",
            INVITATION_COLUMNS
        ))
        .bind(token_hash)
        .bind(accepted_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Ok(entity))
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn list_invitations(&self) -> Result<Vec<InvitationEdge>, StoreError> {
        self.list_all()
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn invitations_for_email(&self, email: &str) -> Result<Vec<InvitationEdge>, StoreError> {
        self.find_by_email(&normalize_email(email))
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn accept_invitation(
        &self,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<InvitationEdge, InvitationError> {
        let outcome = self
            .accept(&sha256_hex(token), accepted_at)
            .await
            .map_err(store_error)?;
        outcome.map(|entity| entity.into_edge_with_token(token.to_string()))
    }
}

#[async_trait]
impl InvitationCreator for InvitationRepository {
    async fn create_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<InvitationEdge, InvitationError> {
        let email = normalize_email(&invitation.invitee_email);
        validate_email_address(&email)
            .map_err(|_| InvitationError::InvalidEmail(invitation.invitee_email.clone()))?;

        let token = generate_invitation_token();
        let created = self
            .create(&invitation, &email, &sha256_hex(&token))
            .await
            .map_err(store_error)?;

        match created {
            Some(entity) => {
                info!(
                    invitation_id = %entity.id,
                    inviter_id = %entity.inviter_id,
                    "Invitation created"
                );
                Ok(entity.into_edge_with_token(token))
            }
            None => Err(InvitationError::ActiveInvitationExists(email)),
        }
    }
}
