use axum::{
    extract::State,
    response::Response,
    Json,
};

use crate::auth::CallerProfile;
use crate::errors::AppError;
use crate::extract::Path;
use crate::jobs::service::{list_unpaid_jobs, pay_job};
use crate::models::job::{Job, JobId};
use crate::routes::respond_collection;
use crate::state::AppState;

/// GET /jobs/unpaid
pub async fn handle_list_unpaid(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
) -> Result<Response, AppError> {
    let jobs = list_unpaid_jobs(state.store.as_ref(), &caller).await?;
    Ok(respond_collection(jobs))
}

/// POST /jobs/:job_id/pay
pub async fn handle_pay_job(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
    Path(job_id): Path<JobId>,
) -> Result<Json<Job>, AppError> {
    let job = pay_job(state.store.as_ref(), job_id, &caller).await?;
    Ok(Json(job))
}
