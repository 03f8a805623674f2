#![allow(dead_code)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UnknownVariant;

pub type ProfileId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Client,
    Contractor,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Client => "client",
            ProfileType::Contractor => "contractor",
        }
    }
}

impl FromStr for ProfileType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(ProfileType::Client),
            "contractor" => Ok(ProfileType::Contractor),
            other => Err(UnknownVariant {
                kind: "profile type",
                value: other.to_string(),
            }),
        }
    }
}

/// A marketplace account. Clients hire work, contractors perform it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub profession: String,
    pub balance: f64,
    #[serde(rename = "type")]
    pub kind: ProfileType,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_client(&self) -> bool {
        self.kind == ProfileType::Client
    }
}
