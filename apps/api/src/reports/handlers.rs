use axum::{extract::State, response::Response};
use serde::Deserialize;
use tracing::debug;

use crate::auth::CallerProfile;
use crate::errors::AppError;
use crate::extract::Query;
use crate::reports::service::{best_clients, best_profession, parse_limit, parse_range};
use crate::routes::respond_collection;
use crate::state::AppState;

/// Raw query values; parsed in the service so bad input yields a JSON 400.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}

/// GET /admin/best-profession?start=&end=
pub async fn handle_best_profession(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
    Query(params): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    debug!("Profile {} requested best profession for {range:?}", caller.id);
    let best = best_profession(state.store.as_ref(), &range).await?;
    Ok(respond_collection(best.into_iter().collect::<Vec<_>>()))
}

/// GET /admin/best-clients?start=&end=&limit=
pub async fn handle_best_clients(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
    Query(params): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let range = parse_range(params.start.as_deref(), params.end.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;
    debug!("Profile {} requested best {limit} clients for {range:?}", caller.id);
    let clients = best_clients(state.store.as_ref(), &range, limit).await?;
    Ok(respond_collection(clients))
}
