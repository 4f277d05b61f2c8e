//! Error types for manifest-agent-renderer.

use thiserror::Error;

/// All errors that can arise from compiling or rendering a filename template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template is the empty string.
    #[error("Option -m must not be empty")]
    Empty,

    /// A `{hvr_var_*}` placeholder names a variable absent from the environment.
    #[error(
        "Option -m contains a context variable that does not exist in HVR_VAR_ environment vars: \
         {referenced:?} vs {known:?}"
    )]
    UnknownVariable {
        referenced: Vec<String>,
        known: Vec<String>,
    },

    /// A placeholder that is neither reserved nor a user variable.
    #[error(
        "Option -m contains placeholder {{{0}}} which is neither {{hvr_tbl_name}}, \
         {{hvr_integ_tstamp}} nor an HVR_VAR_ context variable"
    )]
    UnknownPlaceholder(String),

    /// A placeholder had no value at render time.
    #[error("no value for placeholder {{{0}}} in manifest filename template")]
    Unbound(String),

    /// The recognizer pattern failed to compile.
    #[error("recognizer pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
