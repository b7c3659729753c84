//! Audit record construction.
//!
//! Storage backends write these records inside the same transaction as the
//! change they describe.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::models::{AuditAction, AuditRecord};

/// Builder for audit records with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    actor_id: Uuid,
    action: AuditAction,
    resource_type: String,
    resource_id: String,
    resource_name: Option<String>,
    details: Map<String, Value>,
}

impl AuditLogBuilder {
    /// Start a record for an action performed by an identity.
    pub fn user_action(actor_id: Uuid, action: AuditAction) -> Self {
        Self {
            actor_id,
            action,
            resource_type: String::new(),
            resource_id: String::new(),
            resource_name: None,
            details: Map::new(),
        }
    }

    /// Set the resource being acted upon.
    pub fn on_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = resource_type.into();
        self.resource_id = resource_id.into();
        self
    }

    /// Set the resource name.
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    /// Add one detail field.
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    pub fn build(self, timestamp: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id: Uuid::new_v4(),
            actor_id: self.actor_id,
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            resource_name: self.resource_name,
            details: Value::Object(self.details),
            timestamp,
        }
    }
}

/// Convenience functions for common audit record patterns.
pub mod audit_helpers {
    use super::*;

    /// Record for a committed profile claim.
    pub fn profile_claimed(
        claimant_id: Uuid,
        profile_id: Uuid,
        profile_name: &str,
        merged_assignment_ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> AuditRecord {
        AuditLogBuilder::user_action(claimant_id, AuditAction::ProfileClaim)
            .on_resource("profile", profile_id.to_string())
            .with_resource_name(profile_name)
            .with_detail("merged_assignment_ids", json!(merged_assignment_ids))
            .with_detail("merged_assignment_count", json!(merged_assignment_ids.len()))
            .build(at)
    }
}
