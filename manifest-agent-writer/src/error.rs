//! Error types for manifest-agent-writer.

use std::path::PathBuf;

use thiserror::Error;

use manifest_agent_core::EnvError;
use manifest_agent_renderer::TemplateError;

/// All errors that can abort a cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The environment contract was violated.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// The filename template could not be compiled or rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// No `-m` template was supplied.
    #[error("Option -m must be specified")]
    MissingTemplate,

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest serialization error.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`CycleError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CycleError {
    CycleError::Io {
        path: path.into(),
        source,
    }
}
