//! Transactional profile claims.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::errors::ClaimError;
use domain::models::{ClaimTransfer, Identity};
use domain::services::{audit_helpers, verify_claim_preconditions, verify_merge_counts, ClaimStore};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::audit_log::insert_audit_record;
use super::identity::IDENTITY_COLUMNS;
use super::store_error;
use crate::entities::{AssignmentEntity, IdentityEntity};
use crate::metrics::QueryTimer;

/// Executes claims in a single transaction.
///
/// The placeholder row is locked with `FOR UPDATE` before any check, so a
/// concurrent claim on the same profile waits and then sees `claimed_by` set.
#[derive(Clone)]
pub struct ClaimRepository {
    pool: PgPool,
}

impl ClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn claim_in_tx(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimTransfer, ClaimError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let profile = lock_identity(&mut tx, profile_id)
            .await?
            .ok_or_else(|| ClaimError::NotFound("profile".to_string()))?;
        let claimant = lock_identity(&mut tx, claimant_id)
            .await?
            .ok_or_else(|| ClaimError::NotFound("claimant".to_string()))?;

        verify_claim_preconditions(&profile, &claimant)?;

        let claimant_before = count_assignments(&mut tx, claimant_id).await?;
        let profile_before = count_assignments(&mut tx, profile_id).await?;

        let moved = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            UPDATE assignments SET identity_id = $2
            WHERE identity_id = $1
            RETURNING id, identity_id, course_code, offering, workload_hours, created_at
            "#,
        )
        .bind(profile_id)
        .bind(claimant_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;

        // Any early return drops the transaction, which rolls it back.
        verify_merge_counts(
            claimant_before,
            profile_before,
            count_assignments(&mut tx, claimant_id).await?,
            count_assignments(&mut tx, profile_id).await?,
        )?;

        let updated = sqlx::query_as::<_, IdentityEntity>(&format!(
            r#"
            UPDATE identities SET claimed_by = $2, claimed_at = $3
            WHERE id = $1 AND claimed_by IS NULL
            RETURNING {}
            "#,
            IDENTITY_COLUMNS
        ))
        .bind(profile_id)
        .bind(claimant_id)
        .bind(claimed_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        .ok_or(ClaimError::Conflict)?;
        let profile: Identity = updated.into();

        let merged_assignment_ids: Vec<Uuid> = moved.iter().map(|a| a.id).collect();
        let audit = audit_helpers::profile_claimed(
            claimant_id,
            profile_id,
            &profile.display_name(),
            &merged_assignment_ids,
            claimed_at,
        );
        insert_audit_record(&mut tx, &audit)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(ClaimTransfer {
            profile,
            claimant_id,
            merged_assignment_ids,
            audit,
        })
    }
}

async fn lock_identity(conn: &mut PgConnection, id: Uuid) -> Result<Option<Identity>, ClaimError> {
    let row = sqlx::query_as::<_, IdentityEntity>(&format!(
        "SELECT {} FROM identities WHERE id = $1 FOR UPDATE",
        IDENTITY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(store_error)?;
    Ok(row.map(Into::into))
}

async fn count_assignments(conn: &mut PgConnection, identity_id: Uuid) -> Result<i64, ClaimError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments WHERE identity_id = $1")
        .bind(identity_id)
        .fetch_one(conn)
        .await
        .map_err(store_error)?;
    Ok(count)
}

#[async_trait]
impl ClaimStore for ClaimRepository {
    async fn execute_claim(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimTransfer, ClaimError> {
        let timer = QueryTimer::new("execute_claim");
        let result = self.claim_in_tx(profile_id, claimant_id, claimed_at).await;
        timer.record();
        result
    }
}
