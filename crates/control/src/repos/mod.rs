//! Control plane repositories
//!
//! Database access layer for control plane entities.

mod licenses;
mod profiles;

pub use licenses::LicenseRepo;
pub use profiles::ProfileRepo;

use chrono::{DateTime, Utc};

use crate::error::{ControlError, Result};

/// Read a text column, treating NULL as empty
fn text_at(row: &turso::Row, idx: usize) -> Result<String> {
    let value = row.get_value(idx)?;
    Ok(value.as_text().cloned().unwrap_or_default())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ControlError::invalid("datetime", e.to_string()))
}

fn parse_optional_datetime(s: &str) -> Result<Option<DateTime<Utc>>> {
    if s.is_empty() {
        Ok(None)
    } else {
        parse_datetime(s).map(Some)
    }
}
