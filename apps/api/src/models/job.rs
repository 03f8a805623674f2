use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contract::{Contract, ContractId};
use super::profile::Profile;

pub type JobId = i64;

/// A billable unit of work under a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub description: String,
    pub price: f64,
    /// `None` and `Some(false)` both mean unpaid.
    pub paid: Option<bool>,
    #[serde(rename = "paymentDate")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(rename = "ContractId")]
    pub contract_id: ContractId,
}

/// Why a job payment was refused. Nothing is written when any of these apply.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentRefusal {
    /// Job missing, or not on a contract where the payer is the client.
    NotFound,
    AlreadyPaid,
    ContractTerminated,
    InsufficientBalance { balance: f64, price: f64 },
}

/// Result of a payment attempt that reached the store without failing.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid(Job),
    Refused(PaymentRefusal),
}

impl Job {
    pub fn is_paid(&self) -> bool {
        self.paid == Some(true)
    }

    /// Checks whether `payer` may pay this job under `contract`.
    pub fn check_payable(
        &self,
        contract: &Contract,
        payer: &Profile,
    ) -> Result<(), PaymentRefusal> {
        if contract.id != self.contract_id || contract.client_id != payer.id {
            return Err(PaymentRefusal::NotFound);
        }
        if self.is_paid() {
            return Err(PaymentRefusal::AlreadyPaid);
        }
        if !contract.is_active() {
            return Err(PaymentRefusal::ContractTerminated);
        }
        if payer.balance < self.price {
            return Err(PaymentRefusal::InsufficientBalance {
                balance: payer.balance,
                price: self.price,
            });
        }
        Ok(())
    }
}
