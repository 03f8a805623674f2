pub mod contract;
pub mod job;
pub mod profile;
pub mod report;

use thiserror::Error;

/// A stored enum column held a value this build does not know about.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
