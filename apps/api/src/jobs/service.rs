use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::job::{Job, JobId, PaymentOutcome, PaymentRefusal};
use crate::models::profile::Profile;
use crate::store::Store;

/// Unpaid jobs on the caller's active contracts.
pub async fn list_unpaid_jobs(
    store: &dyn Store,
    caller: &Profile,
) -> Result<Vec<Job>, AppError> {
    let jobs = store.list_unpaid_jobs(caller.id).await?;
    debug!("Profile {} has {} unpaid jobs", caller.id, jobs.len());
    Ok(jobs)
}

/// Pays `job_id` from the caller's balance to the contractor's.
///
/// Only clients pay, and only for jobs on their own contracts.
pub async fn pay_job(
    store: &dyn Store,
    job_id: JobId,
    caller: &Profile,
) -> Result<Job, AppError> {
    if !caller.is_client() {
        return Err(AppError::Forbidden(format!(
            "Profile {} is not a client and cannot pay jobs",
            caller.id
        )));
    }

    match store.pay_job(job_id, caller.id).await? {
        PaymentOutcome::Paid(job) => {
            info!("Profile {} paid job {} ({})", caller.id, job.id, job.price);
            Ok(job)
        }
        PaymentOutcome::Refused(refusal) => Err(refusal_to_error(job_id, refusal)),
    }
}

fn refusal_to_error(job_id: JobId, refusal: PaymentRefusal) -> AppError {
    match refusal {
        PaymentRefusal::NotFound => AppError::NotFound(format!("Job {job_id} not found")),
        PaymentRefusal::AlreadyPaid => AppError::Conflict(format!("Job {job_id} is already paid")),
        PaymentRefusal::ContractTerminated => AppError::UnprocessableEntity(format!(
            "Job {job_id} belongs to a terminated contract"
        )),
        PaymentRefusal::InsufficientBalance { balance, price } => {
            AppError::UnprocessableEntity(format!(
                "Insufficient balance: {balance} available, job {job_id} costs {price}"
            ))
        }
    }
}
