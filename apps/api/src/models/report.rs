use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::profile::ProfileId;

/// Inclusive range of whole UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// First day after `end`.
    until: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `start > end` and an `end` with no following day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!("start ({start}) must not be after end ({end})"));
        }
        let until = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| format!("end ({end}) is out of range"))?;
        Ok(Self { start, end, until })
    }

    /// Half-open timestamp bounds `[start 00:00, end + 1 day 00:00)`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let lower = self.start.and_time(NaiveTime::MIN).and_utc();
        let upper = self.until.and_time(NaiveTime::MIN).and_utc();
        (lower, upper)
    }

    #[cfg(test)]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let (lower, upper) = self.bounds();
        at >= lower && at < upper
    }
}

/// Total paid to contractors of one profession.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub earned: f64,
}

/// Total paid by one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSpend {
    pub id: ProfileId,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub paid: f64,
}
