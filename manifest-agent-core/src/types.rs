//! Domain types for a single replication cycle.
//!
//! A [`CycleContext`] is built once per invocation from an
//! [`AgentEnv`](crate::env::AgentEnv) and is read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use crate::env::{
    AgentEnv, BASE_NAMES, BEGIN_TSTAMP, END_TSTAMP, TBL_CAP_TSTAMP, TBL_NAMES, TBL_NROWS,
};
use crate::error::EnvError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of the replication channel that ran the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelName(pub String);

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ChannelName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChannelName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Name of the integrate location the cycle wrote to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationName(pub String);

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LocationName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LocationName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The kind of cycle that just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleMode {
    /// `integ_end`: an incremental integrate cycle.
    Integrate,
    /// `refr_write_end`: a full refresh.
    Refresh,
}

impl CycleMode {
    /// Map an agent mode argument to a cycle mode.
    ///
    /// Returns `None` for modes this agent does not act on.
    pub fn from_agent_mode(mode: &str) -> Option<Self> {
        match mode {
            "integ_end" => Some(CycleMode::Integrate),
            "refr_write_end" => Some(CycleMode::Refresh),
            _ => None,
        }
    }

    /// `true` for a refresh; recorded as `initial_load` in the manifest.
    pub fn is_initial_load(self) -> bool {
        matches!(self, CycleMode::Refresh)
    }
}

impl fmt::Display for CycleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleMode::Integrate => write!(f, "integ_end"),
            CycleMode::Refresh => write!(f, "refr_write_end"),
        }
    }
}

/// A colon-separated "one entry per table" list from the environment.
///
/// An empty value is kept distinct from an absent one: upstream uses the
/// empty string for both "no tables" and "one table with an empty entry".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PerTableList {
    #[default]
    Absent,
    Blank,
    Entries(Vec<String>),
}

impl PerTableList {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => PerTableList::Absent,
            Some("") => PerTableList::Blank,
            Some(v) => PerTableList::Entries(v.split(':').map(str::to_owned).collect()),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, PerTableList::Absent)
    }

    /// Entries as supplied; a blank list yields none.
    pub fn entries(&self) -> &[String] {
        match self {
            PerTableList::Entries(v) => v,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// CycleContext
// ---------------------------------------------------------------------------

/// Immutable snapshot of everything the orchestrator told us about one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleContext {
    pub mode: CycleMode,
    pub channel: ChannelName,
    pub location: LocationName,
    /// Explicit begin timestamp, if the orchestrator supplied one.
    pub cycle_begin: Option<i64>,
    /// Explicit end timestamp; may be earlier than `cycle_begin`.
    pub cycle_end: Option<i64>,
    pub table_names: Vec<String>,
    pub base_names: PerTableList,
    pub row_counts: PerTableList,
    pub capture_tstamps: PerTableList,
    /// Keyed by lower-cased variable name, e.g. `hvr_var_region`.
    pub user_variables: BTreeMap<String, String>,
}

impl CycleContext {
    /// Build the context for `mode` from a loaded environment.
    pub fn from_env(
        env: &AgentEnv,
        mode: CycleMode,
        channel: ChannelName,
        location: LocationName,
    ) -> Result<Self, EnvError> {
        let table_names = match env.get(TBL_NAMES) {
            None | Some("") => Vec::new(),
            Some(v) => v.split(':').map(str::to_owned).collect(),
        };

        Ok(CycleContext {
            mode,
            channel,
            location,
            cycle_begin: parse_tstamp(env, BEGIN_TSTAMP)?,
            cycle_end: parse_tstamp(env, END_TSTAMP)?,
            table_names,
            base_names: PerTableList::parse(env.get(BASE_NAMES)),
            row_counts: PerTableList::parse(env.get(TBL_NROWS)),
            capture_tstamps: PerTableList::parse(env.get(TBL_CAP_TSTAMP)),
            user_variables: env.user_variables(),
        })
    }

    /// Every per-table list paired with the variable it came from, in the
    /// order they are cross-checked.
    pub fn per_table_lists(&self) -> [(&'static str, &PerTableList); 3] {
        [
            (BASE_NAMES, &self.base_names),
            (TBL_NROWS, &self.row_counts),
            (TBL_CAP_TSTAMP, &self.capture_tstamps),
        ]
    }

    /// Total rows reported for the cycle, when every row count is numeric.
    pub fn total_rows(&self) -> Option<u64> {
        let counts = self.row_counts.entries();
        if counts.is_empty() {
            return None;
        }
        counts.iter().map(|c| c.trim().parse::<u64>().ok()).sum()
    }
}

fn parse_tstamp(env: &AgentEnv, var: &str) -> Result<Option<i64>, EnvError> {
    env.get(var)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| EnvError::InvalidTimestamp {
                    var: var.to_owned(),
                    value: raw.to_owned(),
                })
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
