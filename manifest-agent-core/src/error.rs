//! Error types for manifest-agent-core.

use std::path::PathBuf;

use thiserror::Error;

/// Violations of the environment contract between the orchestrator and the
/// agent. Every variant names the offending variable or value.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A critical variable was abbreviated by the calling environment.
    #[error(
        "Environment variable ${var} is truncated at {len} characters possibly due to long size. \
         This environment variable is important for the manifest agent to function as intended. \
         Refusing to continue. Truncated value: {{ {value} }}"
    )]
    Truncated {
        var: String,
        len: usize,
        value: String,
    },

    /// The `$HVR_LONG_ENVIRONMENT` overflow file could not be read.
    #[error("cannot read overflow file '{}': {source}", .path.display())]
    OverflowRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The overflow file is not valid JSON.
    #[error("cannot parse overflow file '{}': {source}", .path.display())]
    OverflowParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The overflow file parsed, but its top-level value is not an object.
    #[error("overflow file '{}' does not hold a JSON object", .0.display())]
    OverflowNotObject(PathBuf),

    /// A timestamp variable did not hold an integer number of epoch seconds.
    #[error("environment variable ${var} is not an integer epoch timestamp: '{value}'")]
    InvalidTimestamp { var: String, value: String },

    /// An epoch timestamp chrono cannot represent as a UTC date.
    #[error("timestamp {0} is outside the representable UTC range")]
    TimestampOutOfRange(i64),

    /// `HVR_TBL_NAMES` is non-empty but there is nothing to check it against.
    #[error(
        "Cannot find any environment variable to cross check number of tables in HVR_TBL_NAMES. \
         Expected to find at least one of [{candidates}] in environment."
    )]
    NoCrossCheck { candidates: String },

    /// A per-table list disagrees with `HVR_TBL_NAMES` on the number of tables.
    #[error(
        "Cross checking HVR_TBL_NAMES environment variable to {var} failed. \
         HVR_TBL_NAMES mentions {table_count} tables, {var} has {var_count} tables \
         ({tables:?} vs '{value}')."
    )]
    CrossCheckMismatch {
        var: String,
        table_count: usize,
        var_count: usize,
        tables: Vec<String>,
        value: String,
    },

    /// Neither `-s` nor `$HVR_LOC_STATEDIR` supplied a state directory.
    #[error("Option -s (or $HVR_LOC_STATEDIR) must be specified")]
    StateDirUnset,

    /// The state directory is a URL rather than a local path.
    #[error("Option -s (or $HVR_LOC_STATEDIR) '{0}' cannot be a URL")]
    StateDirRemote(String),

    /// The state directory does not exist on the local filesystem.
    #[error("Option -s (or $HVR_LOC_STATEDIR) '{}' does not exist", .0.display())]
    StateDirNotFound(PathBuf),
}
