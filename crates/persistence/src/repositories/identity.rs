//! Identity repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::errors::StoreError;
use domain::models::Identity;
use domain::services::IdentityStore;
use sqlx::PgPool;
use uuid::Uuid;

use super::{contains_pattern, store_error};
use crate::entities::IdentityEntity;
use crate::metrics::QueryTimer;

pub(crate) const IDENTITY_COLUMNS: &str = "id, email, first_name, last_name, graduation_year, program, location, role, is_unclaimed, claimed_by, claimed_at, created_at";

/// Repository for identity-related database operations.
#[derive(Clone)]
pub struct IdentityRepository {
    pool: PgPool,
}

impl IdentityRepository {
    /// Creates a new IdentityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an identity by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_identity_by_id");
        let result = sqlx::query_as::<_, IdentityEntity>(&format!(
            "SELECT {} FROM identities WHERE id = $1",
            IDENTITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every identity, oldest first.
    pub async fn list_all(&self) -> Result<Vec<IdentityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_identities");
        let result = sqlx::query_as::<_, IdentityEntity>(&format!(
            "SELECT {} FROM identities ORDER BY created_at, id",
            IDENTITY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List unclaimed placeholders after a keyset position.
    pub async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<IdentityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_claimable_identities");
        let pattern = search.map(contains_pattern);
        let (after_created_at, after_id) = match after {
            Some((created_at, id)) => (Some(created_at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, IdentityEntity>(&format!(
            r#"
            SELECT {}
            FROM identities
            WHERE is_unclaimed = true
              AND claimed_by IS NULL
              AND ($1::text IS NULL
                   OR LOWER(TRIM(first_name) || ' ' || TRIM(last_name)) LIKE $1 ESCAPE '\')
              AND ($2::timestamptz IS NULL OR (created_at, id) > ($2, $3))
            ORDER BY created_at, id
            LIMIT $4
            "#,
            IDENTITY_COLUMNS
        ))
        .bind(pattern)
        .bind(after_created_at)
        .bind(after_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count assignments held by an identity.
    pub async fn count_assignments(&self, identity_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_identity_assignments");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM assignments WHERE identity_id = $1
            "#,
        )
        .bind(identity_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl IdentityStore for IdentityRepository {
    async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        self.find_by_id(id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(store_error)
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        self.list_all()
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<Identity>, StoreError> {
        IdentityRepository::list_claimable(self, search, after, limit)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn count_assignments(&self, identity_id: Uuid) -> Result<i64, StoreError> {
        IdentityRepository::count_assignments(self, identity_id)
            .await
            .map_err(store_error)
    }
}
