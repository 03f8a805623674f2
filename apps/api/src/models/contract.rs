#![allow(dead_code)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::ProfileId;
use super::UnknownVariant;

pub type ContractId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::New => "new",
            ContractStatus::InProgress => "in_progress",
            ContractStatus::Terminated => "terminated",
        }
    }
}

impl FromStr for ContractStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContractStatus::New),
            "in_progress" => Ok(ContractStatus::InProgress),
            "terminated" => Ok(ContractStatus::Terminated),
            other => Err(UnknownVariant {
                kind: "contract status",
                value: other.to_string(),
            }),
        }
    }
}

/// Agreement between one client and one contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub terms: String,
    pub status: ContractStatus,
    #[serde(rename = "ClientId")]
    pub client_id: ProfileId,
    #[serde(rename = "ContractorId")]
    pub contractor_id: ProfileId,
}

impl Contract {
    /// Terminated contracts drop out of every "active" listing.
    pub fn is_active(&self) -> bool {
        self.status != ContractStatus::Terminated
    }

    /// True when the profile is either party of the contract.
    pub fn involves(&self, profile_id: ProfileId) -> bool {
        self.client_id == profile_id || self.contractor_id == profile_id
    }
}
