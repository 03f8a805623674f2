//! In-memory `Store` for service and router tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::errors::AppError;
use crate::models::contract::{Contract, ContractId, ContractStatus};
use crate::models::job::{Job, JobId, PaymentOutcome, PaymentRefusal};
use crate::models::profile::{Profile, ProfileId, ProfileType};
use crate::models::report::{ClientSpend, DateRange, ProfessionEarnings};

use super::Store;

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    contracts: Vec<Contract>,
    jobs: Vec<Job>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.tables.lock().unwrap().profiles.push(profile);
        self
    }

    pub fn with_contract(self, contract: Contract) -> Self {
        self.tables.lock().unwrap().contracts.push(contract);
        self
    }

    pub fn with_job(self, job: Job) -> Self {
        self.tables.lock().unwrap().jobs.push(job);
        self
    }

    pub fn profile(&self, id: ProfileId) -> Option<Profile> {
        self.tables
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn job(&self, id: JobId) -> Option<Job> {
        self.tables
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
    }
}

pub fn profile(
    id: ProfileId,
    first: &str,
    last: &str,
    profession: &str,
    balance: f64,
    kind: ProfileType,
) -> Profile {
    Profile {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        profession: profession.to_string(),
        balance,
        kind,
    }
}

pub fn contract(
    id: ContractId,
    client_id: ProfileId,
    contractor_id: ProfileId,
    status: ContractStatus,
) -> Contract {
    Contract {
        id,
        terms: "bla bla bla".to_string(),
        status,
        client_id,
        contractor_id,
    }
}

pub fn unpaid_job(id: JobId, contract_id: ContractId, price: f64) -> Job {
    Job {
        id,
        description: "work".to_string(),
        price,
        paid: None,
        payment_date: None,
        contract_id,
    }
}

pub fn paid_job(id: JobId, contract_id: ContractId, price: f64, paid_at: DateTime<Utc>) -> Job {
    Job {
        id,
        description: "work".to_string(),
        price,
        paid: Some(true),
        payment_date: Some(paid_at),
        contract_id,
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// The marketplace fixture shared by most tests.
///
/// Clients 1-4 and 9 (9 has no contracts), contractors 5-8.
/// Contract 1 is terminated. Paid jobs fall between 2020-08-10 and 2020-08-17.
pub fn seeded() -> MemoryStore {
    use ContractStatus::*;
    use ProfileType::*;

    MemoryStore::new()
        .with_profile(profile(1, "Harry", "Potter", "Wizard", 1150.0, Client))
        .with_profile(profile(2, "Mr", "Robot", "Hacker", 231.11, Client))
        .with_profile(profile(3, "John", "Snow", "Knows nothing", 451.3, Client))
        .with_profile(profile(4, "Ash", "Kethcum", "Pokemon master", 1.3, Client))
        .with_profile(profile(5, "John", "Lenon", "Musician", 64.0, Contractor))
        .with_profile(profile(6, "Linus", "Torvalds", "Programmer", 1214.0, Contractor))
        .with_profile(profile(7, "Alan", "Turing", "Programmer", 22.0, Contractor))
        .with_profile(profile(8, "Aragorn", "Elessar", "Fighter", 314.0, Contractor))
        .with_profile(profile(9, "Hermione", "Granger", "Witch", 0.0, Client))
        .with_contract(contract(1, 1, 5, Terminated))
        .with_contract(contract(2, 1, 6, InProgress))
        .with_contract(contract(3, 2, 6, InProgress))
        .with_contract(contract(4, 2, 7, InProgress))
        .with_contract(contract(5, 3, 8, New))
        .with_contract(contract(6, 3, 7, InProgress))
        .with_contract(contract(7, 4, 7, InProgress))
        .with_contract(contract(8, 4, 6, InProgress))
        .with_contract(contract(9, 4, 8, InProgress))
        .with_job(unpaid_job(1, 1, 200.0))
        .with_job(unpaid_job(2, 2, 201.0))
        .with_job(unpaid_job(3, 3, 202.0))
        .with_job(unpaid_job(4, 4, 200.0))
        .with_job(unpaid_job(5, 7, 200.0))
        .with_job(paid_job(6, 7, 2020.0, at(2020, 8, 15, 19)))
        .with_job(paid_job(7, 7, 200.0, at(2020, 8, 15, 19)))
        .with_job(paid_job(8, 2, 121.0, at(2020, 8, 15, 19)))
        .with_job(paid_job(9, 3, 121.0, at(2020, 8, 14, 23)))
        .with_job(paid_job(10, 3, 21.0, at(2020, 8, 17, 19)))
        .with_job(paid_job(11, 4, 21.0, at(2020, 8, 10, 19)))
        .with_job(paid_job(12, 5, 121.0, at(2020, 8, 10, 19)))
}

impl Tables {
    fn contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    fn paid_in(&self, range: &DateRange) -> impl Iterator<Item = (&Job, &Contract)> + '_ {
        let range = *range;
        self.jobs
            .iter()
            .filter(move |j| {
                j.is_paid() && j.payment_date.is_some_and(|paid_at| range.contains(paid_at))
            })
            .filter_map(move |j| self.contract(j.contract_id).map(|c| (j, c)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, AppError> {
        Ok(self.profile(id))
    }

    async fn find_contract_for_party(
        &self,
        contract_id: ContractId,
        profile_id: ProfileId,
    ) -> Result<Option<Contract>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .contract(contract_id)
            .filter(|c| c.involves(profile_id))
            .cloned())
    }

    async fn list_active_contracts(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Contract>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut contracts: Vec<Contract> = tables
            .contracts
            .iter()
            .filter(|c| c.is_active() && c.involves(profile_id))
            .cloned()
            .collect();
        contracts.sort_by_key(|c| c.id);
        Ok(contracts)
    }

    async fn list_unpaid_jobs(&self, profile_id: ProfileId) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|j| !j.is_paid())
            .filter(|j| {
                tables
                    .contract(j.contract_id)
                    .is_some_and(|c| c.is_active() && c.involves(profile_id))
            })
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        Ok(jobs)
    }

    async fn paid_total_for_client(&self, client_id: ProfileId) -> Result<Option<f64>, AppError> {
        let tables = self.tables.lock().unwrap();
        let prices: Vec<f64> = tables
            .jobs
            .iter()
            .filter(|j| j.is_paid())
            .filter(|j| {
                tables
                    .contract(j.contract_id)
                    .is_some_and(|c| c.client_id == client_id)
            })
            .map(|j| j.price)
            .collect();
        if prices.is_empty() {
            return Ok(None);
        }
        Ok(Some(prices.iter().sum()))
    }

    async fn credit_balance(
        &self,
        profile_id: ProfileId,
        amount: f64,
    ) -> Result<Option<Profile>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .map(|p| {
                p.balance += amount;
                p.clone()
            }))
    }

    async fn pay_job(
        &self,
        job_id: JobId,
        client_id: ProfileId,
    ) -> Result<PaymentOutcome, AppError> {
        let mut tables = self.tables.lock().unwrap();

        let Some(job) = tables.jobs.iter().find(|j| j.id == job_id).cloned() else {
            return Ok(PaymentOutcome::Refused(PaymentRefusal::NotFound));
        };
        let Some(contract) = tables.contract(job.contract_id).cloned() else {
            return Ok(PaymentOutcome::Refused(PaymentRefusal::NotFound));
        };
        let Some(client) = tables.profiles.iter().find(|p| p.id == client_id).cloned() else {
            return Ok(PaymentOutcome::Refused(PaymentRefusal::NotFound));
        };
        if let Err(refusal) = job.check_payable(&contract, &client) {
            return Ok(PaymentOutcome::Refused(refusal));
        }

        for p in tables.profiles.iter_mut() {
            if p.id == contract.client_id {
                p.balance -= job.price;
            } else if p.id == contract.contractor_id {
                p.balance += job.price;
            }
        }
        let stored = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .expect("job was found above");
        stored.paid = Some(true);
        stored.payment_date = Some(Utc::now());
        Ok(PaymentOutcome::Paid(stored.clone()))
    }

    async fn earnings_by_profession(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ProfessionEarnings>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (job, contract) in tables.paid_in(range) {
            let contractor = tables
                .profiles
                .iter()
                .find(|p| p.id == contract.contractor_id);
            if let Some(contractor) = contractor {
                *totals.entry(contractor.profession.clone()).or_default() += job.price;
            }
        }
        Ok(totals
            .into_iter()
            .map(|(profession, earned)| ProfessionEarnings { profession, earned })
            .collect())
    }

    async fn spend_by_client(&self, range: &DateRange) -> Result<Vec<ClientSpend>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut totals: BTreeMap<ProfileId, f64> = BTreeMap::new();
        for (job, contract) in tables.paid_in(range) {
            *totals.entry(contract.client_id).or_default() += job.price;
        }
        Ok(totals
            .into_iter()
            .filter_map(|(id, paid)| {
                tables.profiles.iter().find(|p| p.id == id).map(|p| ClientSpend {
                    id,
                    full_name: p.full_name(),
                    paid,
                })
            })
            .collect())
    }
}

/// Resolves profiles from an inner `MemoryStore` but fails every other call,
/// standing in for a database that went away mid-request.
pub struct FailingStore {
    pub inner: MemoryStore,
}

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, AppError> {
        self.inner.find_profile(id).await
    }

    async fn find_contract_for_party(
        &self,
        _contract_id: ContractId,
        _profile_id: ProfileId,
    ) -> Result<Option<Contract>, AppError> {
        Err(unavailable())
    }

    async fn list_active_contracts(
        &self,
        _profile_id: ProfileId,
    ) -> Result<Vec<Contract>, AppError> {
        Err(unavailable())
    }

    async fn list_unpaid_jobs(&self, _profile_id: ProfileId) -> Result<Vec<Job>, AppError> {
        Err(unavailable())
    }

    async fn paid_total_for_client(&self, _client_id: ProfileId) -> Result<Option<f64>, AppError> {
        Err(unavailable())
    }

    async fn credit_balance(
        &self,
        _profile_id: ProfileId,
        _amount: f64,
    ) -> Result<Option<Profile>, AppError> {
        Err(unavailable())
    }

    async fn pay_job(
        &self,
        _job_id: JobId,
        _client_id: ProfileId,
    ) -> Result<PaymentOutcome, AppError> {
        Err(unavailable())
    }

    async fn earnings_by_profession(
        &self,
        _range: &DateRange,
    ) -> Result<Vec<ProfessionEarnings>, AppError> {
        Err(unavailable())
    }

    async fn spend_by_client(&self, _range: &DateRange) -> Result<Vec<ClientSpend>, AppError> {
        Err(unavailable())
    }
}
