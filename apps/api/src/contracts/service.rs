use tracing::debug;

use crate::errors::AppError;
use crate::models::contract::{Contract, ContractId};
use crate::models::profile::Profile;
use crate::store::Store;

/// A contract the caller is party to.
/// Anyone else's contract is indistinguishable from a missing one.
pub async fn get_contract(
    store: &dyn Store,
    id: ContractId,
    caller: &Profile,
) -> Result<Contract, AppError> {
    store
        .find_contract_for_party(id, caller.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Contract {id} not found for profile {}", caller.id))
        })
}

/// The caller's non-terminated contracts.
pub async fn list_contracts(
    store: &dyn Store,
    caller: &Profile,
) -> Result<Vec<Contract>, AppError> {
    let contracts = store.list_active_contracts(caller.id).await?;
    debug!("Profile {} has {} active contracts", caller.id, contracts.len());
    Ok(contracts)
}
