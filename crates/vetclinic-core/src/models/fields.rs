//! Field-level checks shared by the create/patch payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ClinicError, ClinicResult};

use super::EMPTY_FIELDS;

/// Canonical storage format for appointment and invoice dates.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted naive layouts, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Trim a text field, treating blank input as absent.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reject a patch that sets a required text field to blank.
pub(crate) fn patch_text(value: Option<String>) -> ClinicResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => match present(Some(v)) {
            Some(trimmed) => Ok(Some(trimmed)),
            None => Err(ClinicError::validation(EMPTY_FIELDS)),
        },
    }
}

pub(crate) fn non_negative_amount(value: f64, message: &str) -> ClinicResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ClinicError::validation(message))
    }
}

/// Normalize a client-supplied date/time to `YYYY-MM-DDTHH:MM:SS`.
///
/// RFC 3339 inputs carrying an offset are converted to UTC; naive inputs
/// (including the `datetime-local` form layout) are stored as given; a bare
/// date means midnight.
pub fn normalize_timestamp(raw: &str) -> ClinicResult<String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc().format(TIMESTAMP_FORMAT).to_string());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    Err(ClinicError::validation(format!("Fecha inválida: {}", raw)))
}
