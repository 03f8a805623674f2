use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::contract::{Contract, ContractId};
use crate::models::job::{Job, JobId, PaymentOutcome, PaymentRefusal};
use crate::models::profile::{Profile, ProfileId};
use crate::models::report::{ClientSpend, DateRange, ProfessionEarnings};
use crate::models::UnknownVariant;

use super::Store;

const PROFILE_COLUMNS: &str = "id, first_name, last_name, profession, balance, type AS kind";
const CONTRACT_COLUMNS: &str = "id, terms, status, client_id, contractor_id";

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: i64,
    first_name: String,
    last_name: String,
    profession: String,
    balance: f64,
    kind: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = UnknownVariant;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            profession: row.profession,
            balance: row.balance,
            kind: row.kind.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ContractRow {
    id: i64,
    terms: String,
    status: String,
    client_id: i64,
    contractor_id: i64,
}

impl TryFrom<ContractRow> for Contract {
    type Error = UnknownVariant;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Contract {
            id: row.id,
            terms: row.terms,
            status: row.status.parse()?,
            client_id: row.client_id,
            contractor_id: row.contractor_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: i64,
    description: String,
    price: f64,
    paid: Option<bool>,
    payment_date: Option<DateTime<Utc>>,
    contract_id: i64,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            description: row.description,
            price: row.price,
            paid: row.paid,
            payment_date: row.payment_date,
            contract_id: row.contract_id,
        }
    }
}

/// Job joined with its contract, as locked by `pay_job`.
#[derive(Debug, FromRow)]
struct JobContractRow {
    #[sqlx(flatten)]
    job: JobRow,
    terms: String,
    status: String,
    client_id: i64,
    contractor_id: i64,
}

fn to_domain<T, R>(row: R) -> Result<T, AppError>
where
    T: TryFrom<R, Error = UnknownVariant>,
{
    T::try_from(row).map_err(|e| AppError::Internal(e.into()))
}

/// PostgreSQL-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, AppError> {
        let row: Option<ProfileRow> =
            sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(to_domain).transpose()
    }

    async fn find_contract_for_party(
        &self,
        contract_id: ContractId,
        profile_id: ProfileId,
    ) -> Result<Option<Contract>, AppError> {
        let row: Option<ContractRow> = sqlx::query_as(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts \
             WHERE id = $1 AND (client_id = $2 OR contractor_id = $2)"
        ))
        .bind(contract_id)
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(to_domain).transpose()
    }

    async fn list_active_contracts(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Contract>, AppError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts \
             WHERE status <> 'terminated' AND (client_id = $1 OR contractor_id = $1) \
             ORDER BY id"
        ))
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn list_unpaid_jobs(&self, profile_id: ProfileId) -> Result<Vec<Job>, AppError> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT j.id, j.description, j.price, j.paid, j.payment_date, j.contract_id
            FROM jobs j
            JOIN contracts c ON c.id = j.contract_id
            WHERE (j.paid IS NULL OR j.paid = FALSE)
              AND c.status <> 'terminated'
              AND (c.client_id = $1 OR c.contractor_id = $1)
            ORDER BY j.id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn paid_total_for_client(&self, client_id: ProfileId) -> Result<Option<f64>, AppError> {
        let total: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT SUM(j.price)
            FROM jobs j
            JOIN contracts c ON c.id = j.contract_id
            WHERE c.client_id = $1 AND j.paid IS TRUE
            "#,
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn credit_balance(
        &self,
        profile_id: ProfileId,
        amount: f64,
    ) -> Result<Option<Profile>, AppError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "UPDATE profiles SET balance = balance + $2, updated_at = now() \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        row.map(to_domain).transpose()
    }

    async fn pay_job(
        &self,
        job_id: JobId,
        client_id: ProfileId,
    ) -> Result<PaymentOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<JobContractRow> = sqlx::query_as(
            r#"
            SELECT j.id, j.description, j.price, j.paid, j.payment_date, j.contract_id,
                   c.terms, c.status, c.client_id, c.contractor_id
            FROM jobs j
            JOIN contracts c ON c.id = j.contract_id
            WHERE j.id = $1 AND c.client_id = $2
            FOR UPDATE OF j
            "#,
        )
        .bind(job_id)
        .bind(client_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(locked) = locked else {
            return Ok(PaymentOutcome::Refused(PaymentRefusal::NotFound));
        };
        let contract: Contract = to_domain(ContractRow {
            id: locked.job.contract_id,
            terms: locked.terms,
            status: locked.status,
            client_id: locked.client_id,
            contractor_id: locked.contractor_id,
        })?;
        let job = Job::from(locked.job);

        // Lock both parties in id order so concurrent payments cannot deadlock.
        let party_rows: Vec<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(vec![contract.client_id, contract.contractor_id])
        .fetch_all(&mut *tx)
        .await?;
        let parties: Vec<Profile> = party_rows
            .into_iter()
            .map(to_domain)
            .collect::<Result<_, _>>()?;
        let client = parties
            .iter()
            .find(|p| p.id == contract.client_id)
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "client {} of contract {} is missing",
                    contract.client_id,
                    contract.id
                ))
            })?;

        if let Err(refusal) = job.check_payable(&contract, client) {
            return Ok(PaymentOutcome::Refused(refusal));
        }

        sqlx::query("UPDATE profiles SET balance = balance - $2, updated_at = now() WHERE id = $1")
            .bind(contract.client_id)
            .bind(job.price)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE profiles SET balance = balance + $2, updated_at = now() WHERE id = $1")
            .bind(contract.contractor_id)
            .bind(job.price)
            .execute(&mut *tx)
            .await?;
        let paid: JobRow = sqlx::query_as(
            r#"
            UPDATE jobs SET paid = TRUE, payment_date = now(), updated_at = now()
            WHERE id = $1
            RETURNING id, description, price, paid, payment_date, contract_id
            "#,
        )
        .bind(job.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            "Job {} paid: {} moved from profile {} to profile {}",
            job.id, job.price, contract.client_id, contract.contractor_id
        );
        Ok(PaymentOutcome::Paid(Job::from(paid)))
    }

    async fn earnings_by_profession(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ProfessionEarnings>, AppError> {
        let (from, until) = range.bounds();
        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"
            SELECT p.profession, SUM(j.price)
            FROM jobs j
            JOIN contracts c ON c.id = j.contract_id
            JOIN profiles p ON p.id = c.contractor_id
            WHERE j.paid IS TRUE AND j.payment_date >= $1 AND j.payment_date < $2
            GROUP BY p.profession
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(profession, earned)| ProfessionEarnings { profession, earned })
            .collect())
    }

    async fn spend_by_client(&self, range: &DateRange) -> Result<Vec<ClientSpend>, AppError> {
        let (from, until) = range.bounds();
        let rows: Vec<(i64, String, String, f64)> = sqlx::query_as(
            r#"
            SELECT p.id, p.first_name, p.last_name, SUM(j.price)
            FROM jobs j
            JOIN contracts c ON c.id = j.contract_id
            JOIN profiles p ON p.id = c.client_id
            WHERE j.paid IS TRUE AND j.payment_date >= $1 AND j.payment_date < $2
            GROUP BY p.id, p.first_name, p.last_name
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, first_name, last_name, paid)| ClientSpend {
                id,
                full_name: format!("{first_name} {last_name}"),
                paid,
            })
            .collect())
    }
}
