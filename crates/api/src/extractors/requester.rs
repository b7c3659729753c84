//! Requester identity extractor.
//!
//! Authentication happens upstream; the gateway forwards the signed-in
//! identity as `X-Identity-Id`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

pub const IDENTITY_HEADER: &str = "x-identity-id";

/// The identity making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub identity_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(IDENTITY_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Missing X-Identity-Id header".to_string()))?;

        let identity_id = value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| ApiError::Unauthorized("Invalid X-Identity-Id header".to_string()))?;

        Ok(Requester { identity_id })
    }
}
