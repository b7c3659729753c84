//! Identity entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Identity, IdentityRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for identity roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "identity_role", rename_all = "lowercase")]
pub enum IdentityRoleDb {
    Admin,
    Instructor,
    Ta,
    Alumni,
}

impl From<IdentityRoleDb> for IdentityRole {
    fn from(db: IdentityRoleDb) -> Self {
        match db {
            IdentityRoleDb::Admin => IdentityRole::Admin,
            IdentityRoleDb::Instructor => IdentityRole::Instructor,
            IdentityRoleDb::Ta => IdentityRole::Ta,
            IdentityRoleDb::Alumni => IdentityRole::Alumni,
        }
    }
}

impl From<IdentityRole> for IdentityRoleDb {
    fn from(role: IdentityRole) -> Self {
        match role {
            IdentityRole::Admin => IdentityRoleDb::Admin,
            IdentityRole::Instructor => IdentityRoleDb::Instructor,
            IdentityRole::Ta => IdentityRoleDb::Ta,
            IdentityRole::Alumni => IdentityRoleDb::Alumni,
        }
    }
}

/// Database row mapping for the identities table.
#[derive(Debug, Clone, FromRow)]
pub struct IdentityEntity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: Option<i32>,
    pub program: Option<String>,
    pub location: Option<String>,
    pub role: IdentityRoleDb,
    pub is_unclaimed: bool,
    pub claimed_by: Option<Uuid>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<IdentityEntity> for Identity {
    fn from(entity: IdentityEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            graduation_year: entity.graduation_year,
            program: entity.program,
            location: entity.location,
            role: entity.role.into(),
            is_unclaimed: entity.is_unclaimed,
            claimed_by: entity.claimed_by,
            claimed_at: entity.claimed_at,
            created_at: entity.created_at,
        }
    }
}
