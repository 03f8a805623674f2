//! Store — the only path from services to persisted Profiles, Contracts and Jobs.
//!
//! Production: `PgStore` (sqlx over PostgreSQL).
//! Tests: `memory::MemoryStore`, same trait, no database.
//!
//! `AppState` holds an `Arc<dyn Store>`; services take `&dyn Store`.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::contract::{Contract, ContractId};
use crate::models::job::{Job, JobId, PaymentOutcome};
use crate::models::profile::{Profile, ProfileId};
use crate::models::report::{ClientSpend, DateRange, ProfessionEarnings};

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, AppError>;

    /// The contract, only if `profile_id` is its client or contractor.
    async fn find_contract_for_party(
        &self,
        contract_id: ContractId,
        profile_id: ProfileId,
    ) -> Result<Option<Contract>, AppError>;

    /// Non-terminated contracts where `profile_id` is either party, ordered by id.
    async fn list_active_contracts(&self, profile_id: ProfileId)
        -> Result<Vec<Contract>, AppError>;

    /// Unpaid jobs on the profile's non-terminated contracts, ordered by id.
    async fn list_unpaid_jobs(&self, profile_id: ProfileId) -> Result<Vec<Job>, AppError>;

    /// Sum of paid job prices over contracts where `client_id` is the client.
    /// `None` when the client has no paid jobs at all.
    async fn paid_total_for_client(&self, client_id: ProfileId) -> Result<Option<f64>, AppError>;

    /// Atomically adds `amount` to the profile's balance. `None` if the profile does not exist.
    async fn credit_balance(
        &self,
        profile_id: ProfileId,
        amount: f64,
    ) -> Result<Option<Profile>, AppError>;

    /// Pays a job from the client's balance to the contractor's, all or nothing.
    async fn pay_job(&self, job_id: JobId, client_id: ProfileId)
        -> Result<PaymentOutcome, AppError>;

    /// Paid-job totals per contractor profession, payment date within `range`. Unordered.
    async fn earnings_by_profession(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ProfessionEarnings>, AppError>;

    /// Paid-job totals per client, payment date within `range`. Unordered.
    async fn spend_by_client(&self, range: &DateRange) -> Result<Vec<ClientSpend>, AppError>;
}
