//! Placeholder profile routes: claimable listing, eligibility and claiming.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::{
    ClaimDecision, ClaimReason, ClaimableProfilesPage, ListClaimableProfilesQuery, MergedSummary,
};
use domain::services::{ClaimEligibilityService, ProfileMergeEngine};
use shared::pagination::{clamp_page_size, decode_cursor};
use shared::validation::normalize_search_query;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Requester;
use crate::middleware::metrics::{record_claim_rejected, record_profile_claimed};

/// List unclaimed placeholder profiles.
///
/// GET /api/v1/profiles/claimable?search=&cursor=&limit=
pub async fn list_claimable(
    State(state): State<AppState>,
    _requester: Requester,
    Query(query): Query<ListClaimableProfilesQuery>,
) -> Result<Json<ClaimableProfilesPage>, ApiError> {
    query.validate()?;

    let search = query.search.as_deref().and_then(normalize_search_query);
    let after = query.cursor.as_deref().map(decode_cursor).transpose()?;
    let limit = clamp_page_size(query.limit);

    let page = ClaimEligibilityService::new(state.identities.clone())
        .list_claimable(search.as_deref(), after, limit)
        .await?;
    Ok(Json(page))
}

/// Whether the requester may claim a profile. Never mutates.
///
/// GET /api/v1/profiles/:profile_id/claim-eligibility
pub async fn claim_eligibility(
    State(state): State<AppState>,
    requester: Requester,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ClaimDecision>, ApiError> {
    let decision = ClaimEligibilityService::new(state.identities.clone())
        .evaluate(profile_id, requester.identity_id)
        .await?;
    Ok(Json(decision))
}

/// Claim a profile, moving its assignments to the requester.
///
/// POST /api/v1/profiles/:profile_id/claim
pub async fn claim_profile(
    State(state): State<AppState>,
    requester: Requester,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<MergedSummary>, ApiError> {
    let decision = ClaimEligibilityService::new(state.identities.clone())
        .evaluate(profile_id, requester.identity_id)
        .await?;

    if !decision.claimable {
        record_claim_rejected(decision.reason_code.code());
        return Err(declined(&decision));
    }

    let summary = ProfileMergeEngine::new(state.claims.clone())
        .claim(profile_id, requester.identity_id)
        .await?;

    record_profile_claimed(summary.merged_assignments);
    info!(
        profile_id = %profile_id,
        claimant_id = %requester.identity_id,
        merged_assignments = summary.merged_assignments,
        "Claim request completed"
    );
    Ok(Json(summary))
}

fn declined(decision: &ClaimDecision) -> ApiError {
    let message = decision.reason.clone();
    match decision.reason_code {
        ClaimReason::ProfileNotFound | ClaimReason::CurrentUserNotFound => {
            ApiError::NotFound(message)
        }
        ClaimReason::AlreadyClaimed | ClaimReason::ClaimedByAnotherUser => {
            ApiError::Conflict(message)
        }
        ClaimReason::InvalidClaimant | ClaimReason::NameMismatch | ClaimReason::MayClaim => {
            ApiError::Forbidden(message)
        }
    }
}
