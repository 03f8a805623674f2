//! Caller authentication.
//!
//! Handlers take a `CallerProfile` argument; the extractor asks the configured
//! `ProfileResolver` for the acting profile and rejects the request with 401
//! before the handler runs if none can be resolved.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileId};
use crate::state::AppState;
use crate::store::Store;

pub const PROFILE_ID_HEADER: &str = "profile_id";

/// Resolves the acting profile from request headers.
/// Swap the implementation in `AppState` to change the authentication scheme.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Profile, AppError>;
}

/// Trusts the `profile_id` header and loads that profile from the store.
pub struct HeaderProfileResolver {
    store: Arc<dyn Store>,
}

impl HeaderProfileResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

fn parse_profile_id(headers: &HeaderMap) -> Result<ProfileId, AppError> {
    let raw = headers
        .get(PROFILE_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing '{PROFILE_ID_HEADER}' header")))?;
    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<ProfileId>().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("Invalid '{PROFILE_ID_HEADER}' header")))
}

#[async_trait]
impl ProfileResolver for HeaderProfileResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Profile, AppError> {
        let id = parse_profile_id(headers)?;
        let profile = self
            .store
            .find_profile(id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown profile {id}")))?;
        debug!("Resolved caller profile {} ({})", profile.id, profile.kind.as_str());
        Ok(profile)
    }
}

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct CallerProfile(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for CallerProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let profile = state.resolver.resolve(&parts.headers).await?;
        Ok(CallerProfile(profile))
    }
}
