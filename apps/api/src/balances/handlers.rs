use axum::{extract::State, Json};
use tracing::debug;

use crate::auth::CallerProfile;
use crate::balances::service::{deposit, DepositReceipt};
use crate::errors::AppError;
use crate::extract::Path;
use crate::models::profile::ProfileId;
use crate::state::AppState;

/// GET /balances/deposit/:userId
pub async fn handle_deposit(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
    Path(user_id): Path<ProfileId>,
) -> Result<Json<DepositReceipt>, AppError> {
    debug!("Profile {} requested a deposit for profile {user_id}", caller.id);
    let receipt = deposit(state.store.as_ref(), user_id).await?;
    Ok(Json(receipt))
}
