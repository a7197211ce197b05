//! Validation of raw stored records.
//!
//! The collection is read back from a host store that other code (or older
//! versions) may have written to. Each element is classified instead of
//! deserialized wholesale so one bad record cannot poison the whole read.

use crate::link::SavedLink;
use jiff::Timestamp;
use serde_json::Value;
use thiserror::Error;

/// Why a stored record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("record is not an object")]
    NotAnObject,
    #[error("`url` is missing or not a string")]
    UrlNotAString,
    #[error("`url` is empty")]
    EmptyUrl,
    #[error("`savedAt` is missing or not a number")]
    SavedAtNotANumber,
    #[error("`savedAt` is not a finite number")]
    SavedAtNotFinite,
    #[error("`savedAt` is outside the representable time range")]
    SavedAtOutOfRange,
}

/// Outcome of validating one stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCheck {
    Valid(SavedLink),
    Rejected { raw: Value, reason: RejectReason },
}

impl RecordCheck {
    /// Classifies a single raw record.
    pub fn check(raw: Value) -> Self {
        match validate(&raw) {
            Ok(link) => RecordCheck::Valid(link),
            Err(reason) => RecordCheck::Rejected { raw, reason },
        }
    }

    /// Returns the link if the record was valid.
    pub fn valid(self) -> Option<SavedLink> {
        match self {
            RecordCheck::Valid(link) => Some(link),
            RecordCheck::Rejected { .. } => None,
        }
    }
}

/// Classifies every element of a stored collection.
///
/// Returns `None` if `value` is not an array at all.
pub fn check_records(value: Value) -> Option<Vec<RecordCheck>> {
    match value {
        Value::Array(items) => Some(items.into_iter().map(RecordCheck::check).collect()),
        _ => None,
    }
}

fn validate(raw: &Value) -> Result<SavedLink, RejectReason> {
    let object = raw.as_object().ok_or(RejectReason::NotAnObject)?;

    let url = object
        .get("url")
        .and_then(Value::as_str)
        .ok_or(RejectReason::UrlNotAString)?;
    if url.is_empty() {
        return Err(RejectReason::EmptyUrl);
    }

    let saved_at = object
        .get("savedAt")
        .ok_or(RejectReason::SavedAtNotANumber)?;
    let saved_at = parse_millis(saved_at)?;

    Ok(SavedLink::new(url, saved_at))
}

fn parse_millis(value: &Value) -> Result<i64, RejectReason> {
    let Value::Number(number) = value else {
        return Err(RejectReason::SavedAtNotANumber);
    };

    let millis = match number.as_i64() {
        Some(millis) => millis,
        None => {
            let float = number.as_f64().ok_or(RejectReason::SavedAtNotANumber)?;
            if !float.is_finite() {
                return Err(RejectReason::SavedAtNotFinite);
            }
            let floored = float.floor();
            if floored < i64::MIN as f64 || floored > i64::MAX as f64 {
                return Err(RejectReason::SavedAtOutOfRange);
            }
            floored as i64
        }
    };

    Timestamp::from_millisecond(millis).map_err(|_| RejectReason::SavedAtOutOfRange)?;
    Ok(millis)
}
