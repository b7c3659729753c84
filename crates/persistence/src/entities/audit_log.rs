//! Audit log entity.

use chrono::{DateTime, Utc};
use domain::models::{AuditAction, AuditRecord};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for audit logs.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,

    /// Identity that performed the action.
    pub actor_id: Uuid,

    /// Action performed (e.g. `profile_claim`).
    pub action: String,

    pub resource_type: String,
    pub resource_id: String,
    pub resource_name: Option<String>,

    /// Action-specific payload.
    pub details: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl From<&AuditRecord> for AuditLogEntity {
    fn from(record: &AuditRecord) -> Self {
        Self {
            id: record.id,
            actor_id: record.actor_id,
            action: record.action.to_string(),
            resource_type: record.resource_type.clone(),
            resource_id: record.resource_id.clone(),
            resource_name: record.resource_name.clone(),
            details: record.details.clone(),
            timestamp: record.timestamp,
        }
    }
}

impl TryFrom<AuditLogEntity> for AuditRecord {
    type Error = String;

    fn try_from(entity: AuditLogEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            actor_id: entity.actor_id,
            action: entity.action.parse::<AuditAction>()?,
            resource_type: entity.resource_type,
            resource_id: entity.resource_id,
            resource_name: entity.resource_name,
            details: entity.details,
            timestamp: entity.timestamp,
        })
    }
}
