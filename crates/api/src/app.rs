use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    ClaimStore, IdentityStore, InMemoryDirectory, InvitationCreator, InvitationStore,
};
use persistence::repositories::{ClaimRepository, IdentityRepository, InvitationRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, invitations, profiles};
use crate::services::{EmailService, NotifyingInvitationCreator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identities: Arc<dyn IdentityStore>,
    pub claims: Arc<dyn ClaimStore>,
    pub invitations: Arc<dyn InvitationStore>,
    /// Creates invitations and emails the invitee.
    pub invitation_creator: Arc<dyn InvitationCreator>,
    /// Present when backed by PostgreSQL; used for health and pool metrics.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn postgres(config: Config, pool: PgPool) -> Self {
        let config = Arc::new(config);
        let invitations = Arc::new(InvitationRepository::new(pool.clone()));

        Self {
            identities: Arc::new(IdentityRepository::new(pool.clone())),
            claims: Arc::new(ClaimRepository::new(pool.clone())),
            invitation_creator: notifying_creator(&config, invitations.clone()),
            invitations,
            pool: Some(pool),
            config,
        }
    }

    /// State over an in-process directory, for tests.
    pub fn in_memory(config: Config, directory: InMemoryDirectory) -> Self {
        let config = Arc::new(config);
        let directory = Arc::new(directory);

        Self {
            identities: directory.clone(),
            claims: directory.clone(),
            invitation_creator: notifying_creator(&config, directory.clone()),
            invitations: directory,
            pool: None,
            config,
        }
    }
}

fn notifying_creator(
    config: &Config,
    inner: Arc<dyn InvitationCreator>,
) -> Arc<dyn InvitationCreator> {
    Arc::new(NotifyingInvitationCreator::new(
        inner,
        EmailService::new(config.email.clone()),
        config.invitations.base_url.clone(),
    ))
}

pub fn create_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Requester-scoped routes reject missing X-Identity-Id in the extractor.
    let api_routes = Router::new()
        .route("/api/v1/profiles/claimable", get(profiles::list_claimable))
        .route(
            "/api/v1/profiles/:profile_id/claim-eligibility",
            get(profiles::claim_eligibility),
        )
        .route("/api/v1/profiles/:profile_id/claim", post(profiles::claim_profile))
        .route("/api/v1/invitations", post(invitations::create_invitation))
        .route("/api/v1/invitations/bulk", post(invitations::bulk_invite))
        .route("/api/v1/invitations/tree", get(invitations::invitation_tree))
        .route(
            "/api/v1/invitations/tree/summary",
            get(invitations::invitation_tree_summary),
        )
        .route(
            "/api/v1/invitations/history",
            get(invitations::invitation_history),
        )
        .route(
            "/api/v1/invitations/:token/accept",
            post(invitations::accept_invitation),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Bottom layers run first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
