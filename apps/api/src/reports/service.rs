use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate};

use crate::errors::AppError;
use crate::models::report::{ClientSpend, DateRange, ProfessionEarnings};
use crate::store::Store;

pub const DEFAULT_BEST_CLIENTS_LIMIT: usize = 2;
pub const MAX_BEST_CLIENTS_LIMIT: usize = 100;

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (truncated to its UTC date).
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc().date()))
        .map_err(|_| {
            AppError::Validation(format!(
                "'{field}' must be a date (YYYY-MM-DD) or RFC 3339 timestamp, got '{raw}'"
            ))
        })
}

/// Builds the inclusive report range from raw `start`/`end` query values.
pub fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, AppError> {
    let start = start.ok_or_else(|| AppError::Validation("'start' is required".to_string()))?;
    let end = end.ok_or_else(|| AppError::Validation("'end' is required".to_string()))?;
    DateRange::new(parse_date("start", start)?, parse_date("end", end)?)
        .map_err(AppError::Validation)
}

pub fn parse_limit(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_BEST_CLIENTS_LIMIT);
    };
    match raw.trim().parse::<usize>() {
        Ok(limit) if (1..=MAX_BEST_CLIENTS_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(AppError::Validation(format!(
            "'limit' must be an integer between 1 and {MAX_BEST_CLIENTS_LIMIT}, got '{raw}'"
        ))),
    }
}

/// Highest earner wins; equal totals fall back to the alphabetically first profession.
pub fn pick_best_profession(earnings: Vec<ProfessionEarnings>) -> Option<ProfessionEarnings> {
    earnings.into_iter().min_by(|a, b| {
        b.earned
            .total_cmp(&a.earned)
            .then_with(|| a.profession.cmp(&b.profession))
    })
}

/// Biggest spenders first, ties by profile id, truncated to `limit`.
pub fn rank_clients(mut spend: Vec<ClientSpend>, limit: usize) -> Vec<ClientSpend> {
    spend.sort_by(|a, b| match b.paid.total_cmp(&a.paid) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    spend.truncate(limit);
    spend
}

/// The profession whose contractors earned the most from jobs paid within `range`.
pub async fn best_profession(
    store: &dyn Store,
    range: &DateRange,
) -> Result<Option<ProfessionEarnings>, AppError> {
    let earnings = store.earnings_by_profession(range).await?;
    Ok(pick_best_profession(earnings))
}

/// Clients who paid the most for jobs within `range`.
pub async fn best_clients(
    store: &dyn Store,
    range: &DateRange,
    limit: usize,
) -> Result<Vec<ClientSpend>, AppError> {
    let spend = store.spend_by_client(range).await?;
    Ok(rank_clients(spend, limit))
}
