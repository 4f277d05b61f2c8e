//! Environment Context Loader.
//!
//! The orchestrator hands cycle metadata to the agent through environment
//! variables. Values that are too long for the calling environment may be
//! moved into an overflow JSON file named by `$HVR_LONG_ENVIRONMENT`; keys
//! loaded from that file win over the plain environment.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EnvError;

pub const BEGIN_TSTAMP: &str = "HVR_AGENT_BEGIN_TSTAMP";
pub const END_TSTAMP: &str = "HVR_AGENT_END_TSTAMP";
pub const TBL_NAMES: &str = "HVR_TBL_NAMES";
pub const BASE_NAMES: &str = "HVR_BASE_NAMES";
pub const TBL_NROWS: &str = "HVR_TBL_NROWS";
pub const TBL_CAP_TSTAMP: &str = "HVR_TBL_CAP_TSTAMP";
pub const LOC_STATEDIR: &str = "HVR_LOC_STATEDIR";
pub const WARN_ABBR: &str = "HVR_MANIFEST_AGENT_WARN_ABBR";
pub const LONG_ENVIRONMENT: &str = "HVR_LONG_ENVIRONMENT";

/// Prefix of user-defined context variables.
pub const USER_VAR_PREFIX: &str = "HVR_VAR_";

/// Marker the orchestrator appends to an abbreviated value.
pub const TRUNCATION_MARKER: &str = "...";

/// Variables whose truncation would silently corrupt the manifest.
pub const CRITICAL_VARS: &[&str] = &[
    BEGIN_TSTAMP,
    END_TSTAMP,
    TBL_NAMES,
    BASE_NAMES,
    TBL_NROWS,
    LOC_STATEDIR,
];

/// Snapshot of the agent's environment, overflow file included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentEnv {
    vars: BTreeMap<String, String>,
}

impl AgentEnv {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        }))
    }

    /// Build from explicit key/value pairs, expanding the overflow file if
    /// one of the pairs names it.
    ///
    /// A missing or malformed overflow file is logged and skipped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let plain: Vec<(String, String)> = pairs.into_iter().collect();
        let mut vars = BTreeMap::new();

        if let Some((_, path)) = plain.iter().find(|(k, _)| k == LONG_ENVIRONMENT) {
            match read_overflow(Path::new(path)) {
                Ok(extra) => vars.extend(extra),
                Err(e) => tracing::warn!(
                    "W_JX0E00: Warning: An error occurred while processing ${LONG_ENVIRONMENT}. \
                     Will continue without processing this file. Error: {e}"
                ),
            }
        }

        for (k, v) in plain {
            vars.entry(k).or_insert(v);
        }
        AgentEnv { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// `HVR_VAR_*` entries keyed by their lower-cased name.
    pub fn user_variables(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(k, _)| k.starts_with(USER_VAR_PREFIX))
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect()
    }

    /// Variable names exempted from the truncation check.
    fn truncation_exemptions(&self) -> Vec<&str> {
        self.get(WARN_ABBR)
            .map(|v| v.split(':').collect())
            .unwrap_or_default()
    }

    /// Fail if any critical variable carries the truncation marker, unless
    /// `$HVR_MANIFEST_AGENT_WARN_ABBR` lists it; exempted variables only warn.
    pub fn verify_not_truncated(&self) -> Result<(), EnvError> {
        let exempt = self.truncation_exemptions();
        for &name in CRITICAL_VARS {
            let Some(value) = self.get(name) else { continue };
            if !value.ends_with(TRUNCATION_MARKER) {
                continue;
            }
            let len = value.chars().count();
            if exempt.contains(&name) {
                tracing::warn!(
                    "W_JX0E00: Warning: environment variable ${name} is truncated at {len} \
                     characters possibly due to long size. This is ignored because of ${WARN_ABBR}."
                );
            } else {
                return Err(EnvError::Truncated {
                    var: name.to_owned(),
                    len,
                    value: value.to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn read_overflow(path: &Path) -> Result<Vec<(String, String)>, EnvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EnvError::OverflowRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| EnvError::OverflowParse {
            path: path.to_path_buf(),
            source,
        })?;
    let serde_json::Value::Object(map) = value else {
        return Err(EnvError::OverflowNotObject(path.to_path_buf()));
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
