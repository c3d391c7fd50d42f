//! Quantitative statistics attached to registry records.
//!
//! A statistic is an independent datum about a record, contributed by a
//! third-party source: a value, a type tag, a date, and the contributing
//! source. Statistics are append-only; the only validation on intake is
//! numeric coercion of the value and date parsing. Deletion is restricted
//! to the contributing source (or a privileged override), enforced by the
//! registry facade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Result type for statistic intake.
pub type StatisticResult<T> = Result<T, StatisticError>;

/// A rejected statistic payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatisticError {
    /// The value is absent or cannot be coerced to a number.
    #[error("statistic value {0}")]
    InvalidValue(String),

    /// The type tag is absent or not a string.
    #[error("statistic type is missing or not a string")]
    InvalidType,

    /// The date cannot be parsed.
    #[error("statistic date '{0}' is not an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidDate(String),
}

/// A single quantitative datum about a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    /// Opaque identifier for this statistic.
    pub id: String,

    /// Id of the record this statistic is about.
    pub about: String,

    /// The numerical value, whatever it measures.
    pub value: f64,

    /// Name of the kind of statistic (e.g. `"item_count"`).
    #[serde(rename = "type")]
    pub stat_type: String,

    /// Date the statistic was generated.
    pub date: DateTime<Utc>,

    /// Identity of the third party that contributed it.
    pub source: String,
}

impl Statistic {
    /// Creates a statistic from already-typed parts.
    pub fn new(
        about: impl Into<String>,
        value: f64,
        stat_type: impl Into<String>,
        date: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            about: about.into(),
            value,
            stat_type: stat_type.into(),
            date,
            source: source.into(),
        }
    }

    /// Creates a statistic from a raw caller payload `{value, type, date?}`.
    ///
    /// The value coerces from any JSON number or numeric string; the date
    /// accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates and defaults
    /// to `now` when absent. Other keys in the payload are ignored.
    pub fn from_raw(
        about: &str,
        raw: &Value,
        source: &str,
        now: DateTime<Utc>,
    ) -> StatisticResult<Self> {
        let value = match raw.get("value") {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| StatisticError::InvalidValue(format!("'{}' is out of range", n)))?,
            Some(Value::String(s)) => s
                .parse::<f64>()
                .map_err(|_| StatisticError::InvalidValue(format!("'{}' is not numeric", s)))?,
            Some(other) => {
                return Err(StatisticError::InvalidValue(format!(
                    "has unsupported shape '{}'",
                    other
                )))
            }
            None => return Err(StatisticError::InvalidValue("is missing".into())),
        };

        let stat_type = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or(StatisticError::InvalidType)?
            .to_string();

        let date = match raw.get("date").and_then(Value::as_str) {
            Some(s) => parse_date(s)?,
            None => now,
        };

        Ok(Self::new(about, value, stat_type, date, source))
    }
}

/// Parses an RFC 3339 timestamp or a bare date (taken as midnight UTC).
fn parse_date(s: &str) -> StatisticResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(StatisticError::InvalidDate(s.to_string()))
}
