/// Time handling and query types shared by both services
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::errors::ServiceError;

/// Offset of the reference zone all transaction timestamps are stored in (UTC-05:00, no DST)
pub const REFERENCE_OFFSET_SECS: i32 = -5 * 3600;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Converts an instant into naive wall-clock time of the reference zone.
pub fn to_reference_zone(instant: DateTime<Utc>) -> Result<NaiveDateTime, ServiceError> {
    let zone = FixedOffset::east_opt(REFERENCE_OFFSET_SECS)
        .ok_or_else(|| ServiceError::InternalError("Invalid reference offset".to_string()))?;
    Ok(instant.with_timezone(&zone).naive_local())
}

enum ParsedTime {
    Instant(DateTime<Utc>),
    Naive(NaiveDateTime),
}

fn parse_time(raw: &str) -> Option<ParsedTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTime::Instant(dt.with_timezone(&Utc)));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ParsedTime::Naive(naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(ParsedTime::Naive)
}

/// Timestamp stored for a new transaction.
///
/// The caller's value (or `now` when absent) is read as UTC and shifted into the
/// reference zone. Values carrying an explicit offset are first brought to UTC;
/// offset-less values are taken to already be UTC.
pub fn normalize_timestamp(
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> Result<NaiveDateTime, ServiceError> {
    let instant = match raw.filter(|s| !s.trim().is_empty()) {
        None => now,
        Some(raw) => match parse_time(raw) {
            Some(ParsedTime::Instant(instant)) => instant,
            Some(ParsedTime::Naive(naive)) => naive.and_utc(),
            None => {
                return Err(ServiceError::BadRequest(format!(
                    "Invalid timestamp: {}",
                    raw
                )))
            }
        },
    };
    to_reference_zone(instant)
}

/// Parses a history bound. Naive values already are reference-zone wall-clock
/// times; offset-bearing values get converted so they compare against stored rows.
pub fn parse_filter_bound(raw: &str, field: &str) -> Result<NaiveDateTime, ServiceError> {
    match parse_time(raw) {
        Some(ParsedTime::Naive(naive)) => Ok(naive),
        Some(ParsedTime::Instant(instant)) => to_reference_zone(instant),
        None => Err(ServiceError::BadRequest(format!(
            "Invalid {}: {}",
            field, raw
        ))),
    }
}

/// Query string of a history lookup, as accepted by both services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Inclusive lower bound on the timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(example = "2024-01-01")]
    pub from_date: Option<String>,
    /// Inclusive upper bound on the timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(example = "2024-01-31")]
    pub to_date: Option<String>,
    /// Case-insensitive transaction type; empty means any
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    #[param(example = "sale")]
    pub kind: Option<String>,
}

/// Parsed history filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    /// Lowercased type to match
    pub kind: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl HistoryParams {
    pub fn to_filter(&self) -> Result<HistoryFilter, ServiceError> {
        Ok(HistoryFilter {
            from: non_empty(&self.from_date)
                .map(|raw| parse_filter_bound(raw, "fromDate"))
                .transpose()?,
            to: non_empty(&self.to_date)
                .map(|raw| parse_filter_bound(raw, "toDate"))
                .transpose()?,
            kind: self
                .kind
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        })
    }
}
