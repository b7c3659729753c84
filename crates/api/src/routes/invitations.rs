//! Invitation routes: sending, bulk dispatch, acceptance, the invitation
//! forest and per-address history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{
    BulkInviteOutcome, BulkInviteRequest, CreateInvitationRequest, ForestSummary,
    ForestSummaryQuery, InvitationEdge, InvitationHistoryEntry, InvitationHistoryQuery,
    InvitationNode, InvitationTreeQuery, NewInvitation,
};
use domain::services::{
    BulkInvitationDispatcher, BulkInvitationPolicy, InvitationGraphService,
    InvitationHistoryService, DEFAULT_TOP_INVITERS,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Requester;
use crate::middleware::metrics::{
    record_invitation_accepted, record_invitations_failed, record_invitations_sent,
};

/// Invitations may only be sent by identities the directory knows.
async fn require_known(state: &AppState, identity_id: Uuid) -> Result<(), ApiError> {
    match state.identities.find_identity(identity_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Unauthorized("Unknown requester identity".to_string())),
    }
}

/// Invite one address.
///
/// POST /api/v1/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    requester: Requester,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationEdge>), ApiError> {
    request.validate()?;
    require_known(&state, requester.identity_id).await?;

    let now = Utc::now();
    let edge = state
        .invitation_creator
        .create_invitation(NewInvitation {
            invitee_email: request.email,
            inviter_id: requester.identity_id,
            personal_message: request.personal_message,
            created_at: now,
            expires_at: now + state.config.invitations.expiry(),
        })
        .await?;

    record_invitations_sent(1);
    info!(
        invitation_id = %edge.id,
        inviter_id = %requester.identity_id,
        "Invitation created"
    );
    Ok((StatusCode::CREATED, Json(edge)))
}

/// Invite several placeholder profiles at their stored addresses.
///
/// POST /api/v1/invitations/bulk
///
/// Always 200 for an accepted batch; per-profile failures are in the body.
pub async fn bulk_invite(
    State(state): State<AppState>,
    requester: Requester,
    Json(request): Json<BulkInviteRequest>,
) -> Result<Json<BulkInviteOutcome>, ApiError> {
    request.validate()?;
    require_known(&state, requester.identity_id).await?;

    let policy = BulkInvitationPolicy {
        expiry: state.config.invitations.expiry(),
        max_batch_size: Some(state.config.invitations.max_bulk_size),
    };
    let outcome = BulkInvitationDispatcher::new(
        state.identities.clone(),
        state.invitation_creator.clone(),
        policy,
    )
    .dispatch_bulk(
        requester.identity_id,
        &request.profile_ids,
        request.personal_message,
    )
    .await?;

    record_invitations_sent(outcome.sent);
    record_invitations_failed(outcome.failed);
    Ok(Json(outcome))
}

/// Redeem an invitation token. The token itself is the credential.
///
/// POST /api/v1/invitations/:token/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InvitationEdge>, ApiError> {
    let edge = InvitationHistoryService::new(state.invitations.clone())
        .accept(&token, Utc::now())
        .await?;

    record_invitation_accepted();
    Ok(Json(edge))
}

/// The invitation forest, optionally filtered to matches and their ancestors.
///
/// GET /api/v1/invitations/tree?search=
pub async fn invitation_tree(
    State(state): State<AppState>,
    _requester: Requester,
    Query(query): Query<InvitationTreeQuery>,
) -> Result<Json<Vec<InvitationNode>>, ApiError> {
    query.validate()?;

    let forest = InvitationGraphService::new(state.identities.clone(), state.invitations.clone())
        .forest(query.search.as_deref())
        .await?;
    Ok(Json(forest))
}

/// GET /api/v1/invitations/tree/summary?top=
pub async fn invitation_tree_summary(
    State(state): State<AppState>,
    _requester: Requester,
    Query(query): Query<ForestSummaryQuery>,
) -> Result<Json<ForestSummary>, ApiError> {
    query.validate()?;

    let summary = InvitationGraphService::new(state.identities.clone(), state.invitations.clone())
        .summary(query.top.unwrap_or(DEFAULT_TOP_INVITERS))
        .await?;
    Ok(Json(summary))
}

/// Every invitation sent to one address, newest first.
///
/// GET /api/v1/invitations/history?email=
pub async fn invitation_history(
    State(state): State<AppState>,
    _requester: Requester,
    Query(query): Query<InvitationHistoryQuery>,
) -> Result<Json<Vec<InvitationHistoryEntry>>, ApiError> {
    query.validate()?;

    let history = InvitationHistoryService::new(state.invitations.clone())
        .history(&query.email, Utc::now())
        .await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{account, placeholder, TestDirectory};
    use axum::http::Method;
    use chrono::Duration;
    use domain::models::Identity;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use serde_json::json;

    async fn inviter(directory: &TestDirectory) -> Identity {
        directory
            .add(account("Grace", "Hopper", "grace@example.edu"))
            .await
    }

    #[tokio::test]
    async fn test_create_invitation() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        let email: String = SafeEmail().fake();

        let (status, body) = directory
            .request(
                Method::POST,
                "/api/v1/invitations",
                Some(me.id),
                Some(json!({ "email": email.to_uppercase(), "personal_message": "Welcome" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["invitee_email"], email.to_lowercase());
        assert_eq!(body["inviter_id"], me.id.to_string());
        assert!(body.get("token").is_none());

        let stored = directory.inner.invitations().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].expires_at - stored[0].created_at, Duration::days(14));
    }

    #[tokio::test]
    async fn test_create_invitation_rejects_active_duplicate() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        let body = json!({ "email": "new.ta@example.edu" });

        let (status, _) = directory
            .request(Method::POST, "/api/v1/invitations", Some(me.id), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = directory
            .request(Method::POST, "/api/v1/invitations", Some(me.id), Some(body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn test_create_invitation_validation() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;

        let (status, _) = directory
            .request(
                Method::POST,
                "/api/v1/invitations",
                Some(me.id),
                Some(json!({ "email": "not-an-email" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = directory
            .request(
                Method::POST,
                "/api/v1/invitations",
                Some(Uuid::new_v4()),
                Some(json!({ "email": "someone@example.edu" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(directory.inner.invitations().await.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_invite_reports_each_item() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        let first = directory.add(placeholder("Alan", "Turing", "alan@example.edu")).await;
        let second = directory.add(placeholder("Ada", "Lovelace", "ada@example.edu")).await;
        let missing = Uuid::new_v4();

        let (status, body) = directory
            .request(
                Method::POST,
                "/api/v1/invitations/bulk",
                Some(me.id),
                Some(json!({ "profile_ids": [first.id, missing, second.id] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sent"], 2);
        assert_eq!(body["failed"], 1);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results[0]["profile_id"], first.id.to_string());
        assert_eq!(results[1]["status"], "failed");
        assert_eq!(results[1]["error"], "profile not found");
        assert_eq!(results[2]["status"], "sent");
    }

    #[tokio::test]
    async fn test_bulk_invite_rejects_oversized_batch() {
        let directory = TestDirectory::with_config(&[("invitations.max_bulk_size", "1")]);
        let me = inviter(&directory).await;
        let first = directory.add(placeholder("Alan", "Turing", "alan@example.edu")).await;
        let second = directory.add(placeholder("Ada", "Lovelace", "ada@example.edu")).await;

        let (status, _) = directory
            .request(
                Method::POST,
                "/api/v1/invitations/bulk",
                Some(me.id),
                Some(json!({ "profile_ids": [first.id, second.id] })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(directory.inner.invitations().await.is_empty());
    }

    #[tokio::test]
    async fn test_accept_invitation_once() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        directory
            .request(
                Method::POST,
                "/api/v1/invitations",
                Some(me.id),
                Some(json!({ "email": "new.ta@example.edu" })),
            )
            .await;
        let token = directory.inner.invitations().await[0].token.clone();
        let path = format!("/api/v1/invitations/{}/accept", token);

        let (status, body) = directory.request(Method::POST, &path, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["used_at"].is_string());

        let (status, _) = directory.request(Method::POST, &path, None, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = directory
            .request(Method::POST, "/api/v1/invitations/unknown/accept", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invitation_tree_and_summary() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        directory.add(account("Alan", "Turing", "alan@example.edu")).await;
        directory.add(account("Ada", "Lovelace", "ada@example.edu")).await;
        for email in ["alan@example.edu", "ada@example.edu"] {
            directory
                .request(
                    Method::POST,
                    "/api/v1/invitations",
                    Some(me.id),
                    Some(json!({ "email": email })),
                )
                .await;
        }

        let (status, body) = directory
            .request(Method::GET, "/api/v1/invitations/tree", Some(me.id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let roots = body.as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["identity"]["email"], "grace@example.edu");
        assert_eq!(roots[0]["total_descendants"], 2);

        let (status, body) = directory
            .request(
                Method::GET,
                "/api/v1/invitations/tree?search=lovelace",
                Some(me.id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let children = body[0]["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["matched"], true);
        assert!(body[0].get("matched").is_none());

        let (status, body) = directory
            .request(Method::GET, "/api/v1/invitations/tree/summary", Some(me.id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_identities"], 3);
        assert_eq!(body["root_count"], 1);
        assert_eq!(body["top_inviters"][0]["direct_invitees"], 2);

        let (status, _) = directory
            .request(
                Method::GET,
                "/api/v1/invitations/tree/summary?top=0",
                Some(me.id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invitation_history() {
        let directory = TestDirectory::new();
        let me = inviter(&directory).await;
        directory
            .request(
                Method::POST,
                "/api/v1/invitations",
                Some(me.id),
                Some(json!({ "email": "new.ta@example.edu" })),
            )
            .await;

        let (status, body) = directory
            .request(
                Method::GET,
                "/api/v1/invitations/history?email=New.TA%40example.edu",
                Some(me.id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["status"], "pending");

        let (status, _) = directory
            .request(
                Method::GET,
                "/api/v1/invitations/history?email=bogus",
                Some(me.id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
