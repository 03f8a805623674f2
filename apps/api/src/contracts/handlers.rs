use axum::{
    extract::State,
    response::Response,
    Json,
};

use crate::auth::CallerProfile;
use crate::contracts::service::{get_contract, list_contracts};
use crate::errors::AppError;
use crate::extract::Path;
use crate::models::contract::{Contract, ContractId};
use crate::routes::respond_collection;
use crate::state::AppState;

/// GET /contracts/:id
pub async fn handle_get_contract(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
    Path(id): Path<ContractId>,
) -> Result<Json<Contract>, AppError> {
    let contract = get_contract(state.store.as_ref(), id, &caller).await?;
    Ok(Json(contract))
}

/// GET /contracts
pub async fn handle_list_contracts(
    State(state): State<AppState>,
    CallerProfile(caller): CallerProfile,
) -> Result<Response, AppError> {
    let contracts = list_contracts(state.store.as_ref(), &caller).await?;
    Ok(respond_collection(contracts))
}
