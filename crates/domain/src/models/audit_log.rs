//! Audit log domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ProfileClaim,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ProfileClaim => "profile_claim",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile_claim" => Ok(AuditAction::ProfileClaim),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

/// An audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub resource_name: Option<String>,
    /// Action-specific payload, e.g. merged assignment ids for a claim.
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_strings() {
        assert_eq!(AuditAction::ProfileClaim.to_string(), "profile_claim");
        assert_eq!(
            "profile_claim".parse::<AuditAction>().unwrap(),
            AuditAction::ProfileClaim
        );
        assert!("profile_delete".parse::<AuditAction>().is_err());
    }
}
