//! The manifest record and its on-disk JSON form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// `integ_loc` sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegLoc {
    pub name: String,
}

/// One cycle's outcome as seen by downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub channel: String,
    pub integ_loc: IntegLoc,
    /// Base names of the transferred tables.
    pub tables: Vec<String>,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub cycle_begin: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub cycle_end: String,
    pub initial_load: bool,
}

impl Manifest {
    /// Indented JSON with keys sorted at every level.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        // Going through `Value` sorts object keys.
        let value = serde_json::to_value(self)?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn utc(unix_secs: i64) -> Result<DateTime<Utc>, EnvError> {
    DateTime::from_timestamp(unix_secs, 0).ok_or(EnvError::TimestampOutOfRange(unix_secs))
}

/// Canonical manifest timestamp, e.g. `2023-11-14T22:13:20Z`.
pub fn utc_tstamp(unix_secs: i64) -> Result<String, EnvError> {
    Ok(utc(unix_secs)?.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Compact filename timestamp, e.g. `20231114221320`.
pub fn integ_tstamp(unix_secs: i64) -> Result<String, EnvError> {
    Ok(utc(unix_secs)?.format("%Y%m%d%H%M%S").to_string())
}
