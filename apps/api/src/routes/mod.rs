pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::balances::handlers as balances;
use crate::contracts::handlers as contracts;
use crate::jobs::handlers as jobs;
use crate::reports::handlers as reports;
use crate::state::AppState;

/// 200 with the JSON array, or 204 with no body when there is nothing to return.
pub fn respond_collection<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(items).into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/contracts", get(contracts::handle_list_contracts))
        .route("/contracts/:id", get(contracts::handle_get_contract))
        .route("/jobs/unpaid", get(jobs::handle_list_unpaid))
        .route("/jobs/:job_id/pay", post(jobs::handle_pay_job))
        .route("/balances/deposit/:user_id", get(balances::handle_deposit))
        .route(
            "/admin/best-profession",
            get(reports::handle_best_profession),
        )
        .route("/admin/best-clients", get(reports::handle_best_clients))
        .with_state(state)
}
