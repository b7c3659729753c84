//! Profile claim domain models.

use serde::Serialize;
use uuid::Uuid;

use super::audit_log::AuditRecord;
use super::identity::Identity;

/// Why a claim was or was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimReason {
    ProfileNotFound,
    CurrentUserNotFound,
    InvalidClaimant,
    AlreadyClaimed,
    ClaimedByAnotherUser,
    NameMismatch,
    MayClaim,
}

impl ClaimReason {
    /// Human-readable reason shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            ClaimReason::ProfileNotFound => "profile not found",
            ClaimReason::CurrentUserNotFound => "current user not found",
            ClaimReason::InvalidClaimant => "current user cannot claim profiles",
            ClaimReason::AlreadyClaimed => "already claimed",
            ClaimReason::ClaimedByAnotherUser => "already claimed by another user",
            ClaimReason::NameMismatch => "name does not match; only matching names may claim",
            ClaimReason::MayClaim => "may claim",
        }
    }

    /// Stable snake_case code, matching the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            ClaimReason::ProfileNotFound => "profile_not_found",
            ClaimReason::CurrentUserNotFound => "current_user_not_found",
            ClaimReason::InvalidClaimant => "invalid_claimant",
            ClaimReason::AlreadyClaimed => "already_claimed",
            ClaimReason::ClaimedByAnotherUser => "claimed_by_another_user",
            ClaimReason::NameMismatch => "name_mismatch",
            ClaimReason::MayClaim => "may_claim",
        }
    }
}

/// Profile details returned for UI confirmation before a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimProfileInfo {
    pub profile_id: Uuid,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: Option<i32>,
    pub program: Option<String>,
}

impl From<&Identity> for ClaimProfileInfo {
    fn from(profile: &Identity) -> Self {
        Self {
            profile_id: profile.id,
            display_name: profile.display_name(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            graduation_year: profile.graduation_year,
            program: profile.program.clone(),
        }
    }
}

/// Result of a claim eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimDecision {
    pub claimable: bool,
    pub reason_code: ClaimReason,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_info: Option<ClaimProfileInfo>,
}

impl ClaimDecision {
    pub fn declined(reason: ClaimReason) -> Self {
        Self {
            claimable: false,
            reason_code: reason,
            reason: reason.message().to_string(),
            profile_info: None,
        }
    }

    pub fn approved(profile: &Identity) -> Self {
        Self {
            claimable: true,
            reason_code: ClaimReason::MayClaim,
            reason: ClaimReason::MayClaim.message().to_string(),
            profile_info: Some(profile.into()),
        }
    }
}

/// What a storage backend reports after committing a claim.
#[derive(Debug, Clone)]
pub struct ClaimTransfer {
    /// The placeholder as committed, with `claimed_by` set.
    pub profile: Identity,
    pub claimant_id: Uuid,
    pub merged_assignment_ids: Vec<Uuid>,
    pub audit: AuditRecord,
}

/// Summary returned to the caller after a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MergedSummary {
    pub profile_id: Uuid,
    pub claimed_by: Uuid,
    pub profile_display_name: String,
    pub merged_assignments: usize,
    pub merged_assignment_ids: Vec<Uuid>,
}

impl From<ClaimTransfer> for MergedSummary {
    fn from(transfer: ClaimTransfer) -> Self {
        Self {
            profile_id: transfer.profile.id,
            claimed_by: transfer.claimant_id,
            profile_display_name: transfer.profile.display_name(),
            merged_assignments: transfer.merged_assignment_ids.len(),
            merged_assignment_ids: transfer.merged_assignment_ids,
        }
    }
}
