//! Invitation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Days an invitation stays redeemable unless configured otherwise.
pub const DEFAULT_INVITATION_EXPIRY_DAYS: i64 = 14;

/// A record that `inviter_id` invited `invitee_email`.
///
/// For any address at most one edge may be active (unused and unexpired).
/// Used edges are terminal; expired edges stay as history and do not block a
/// fresh invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationEdge {
    pub id: Uuid,
    pub invitee_email: String,
    pub inviter_id: Uuid,
    #[serde(skip_serializing)]
    pub token: String,
    pub personal_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl InvitationEdge {
    /// Status as of `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.used_at.is_some() {
            InvitationStatus::Accepted
        } else if self.expires_at <= now {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }

    /// Whether this edge blocks a new invitation to the same address.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == InvitationStatus::Pending
    }
}

/// Derived invitation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input to the single-invitation primitive.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub invitee_email: String,
    pub inviter_id: Uuid,
    pub personal_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Request to invite one address.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_personal_message"))]
    pub personal_message: Option<String>,
}

/// Request to invite several placeholder profiles at once.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BulkInviteRequest {
    pub profile_ids: Vec<Uuid>,

    #[validate(custom(function = "shared::validation::validate_personal_message"))]
    pub personal_message: Option<String>,
}

/// Per-item outcome status in a bulk dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkInviteItemStatus {
    Sent,
    Failed,
}

/// Outcome for one profile in a bulk dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkInviteItemResult {
    pub profile_id: Uuid,
    pub status: BulkInviteItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkInviteItemResult {
    pub fn sent(profile_id: Uuid, invitation_id: Uuid) -> Self {
        Self {
            profile_id,
            status: BulkInviteItemStatus::Sent,
            invitation_id: Some(invitation_id),
            error: None,
        }
    }

    pub fn failed(profile_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            profile_id,
            status: BulkInviteItemStatus::Failed,
            invitation_id: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregate result of a bulk dispatch. `sent + failed` equals the number
/// of profile ids submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkInviteOutcome {
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<BulkInviteItemResult>,
}

/// Query for an address's invitation history.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InvitationHistoryQuery {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

/// One row of invitation history with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationHistoryEntry {
    pub id: Uuid,
    pub invitee_email: String,
    pub inviter_id: Uuid,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl InvitationHistoryEntry {
    pub fn from_edge(edge: &InvitationEdge, now: DateTime<Utc>) -> Self {
        Self {
            id: edge.id,
            invitee_email: edge.invitee_email.clone(),
            inviter_id: edge.inviter_id,
            status: edge.status_at(now),
            created_at: edge.created_at,
            expires_at: edge.expires_at,
            used_at: edge.used_at,
        }
    }
}
