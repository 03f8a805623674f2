use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::ProfileId;
use crate::store::Store;

/// Share of a client's paid-job spend that may be deposited.
pub const DEPOSIT_CAP_RATIO: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    pub profile_id: ProfileId,
    pub paid_total: f64,
    pub deposited: f64,
    pub balance: f64,
}

/// floor(25% of the paid total). A client with no paid jobs gets 0.
pub fn deposit_cap(paid_total: Option<f64>) -> f64 {
    let total = paid_total.unwrap_or(0.0).max(0.0);
    (total * DEPOSIT_CAP_RATIO).floor()
}

/// Credits the target with the capped deposit and returns the new balance.
pub async fn deposit(store: &dyn Store, target: ProfileId) -> Result<DepositReceipt, AppError> {
    let profile = store
        .find_profile(target)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {target} not found")))?;

    let paid_total = store.paid_total_for_client(target).await?;
    let amount = deposit_cap(paid_total);

    if amount <= 0.0 {
        info!("Profile {target} has nothing to deposit (paid total {paid_total:?})");
        return Ok(DepositReceipt {
            profile_id: target,
            paid_total: paid_total.unwrap_or(0.0),
            deposited: 0.0,
            balance: profile.balance,
        });
    }

    let updated = store
        .credit_balance(target, amount)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {target} not found")))?;

    info!(
        "Deposited {amount} into profile {target}; balance now {}",
        updated.balance
    );
    Ok(DepositReceipt {
        profile_id: target,
        paid_total: paid_total.unwrap_or(0.0),
        deposited: amount,
        balance: updated.balance,
    })
}
