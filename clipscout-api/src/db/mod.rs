//! Database access for clipscout-api
//!
//! Schema lives in `clipscout_common::db`; this module holds the queries.

pub mod results;
pub mod searches;

use chrono::{DateTime, SecondsFormat, Utc};
use clipscout_common::{Error, Result};
use uuid::Uuid;

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidRow(format!("Failed to parse {}: {}", column, e)))
}

pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::InvalidRow(format!("Failed to parse {}: {}", column, e)))
}
