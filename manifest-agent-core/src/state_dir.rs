//! State directory resolution.
//!
//! Only local filesystem paths are accepted; a URL-style value is rejected
//! with any embedded credentials stripped from the diagnostic.

use std::path::PathBuf;

use crate::env::{AgentEnv, LOC_STATEDIR};
use crate::error::EnvError;

/// Resolve the directory manifests are written under.
///
/// `override_dir` (the `-s` option) wins over `$HVR_LOC_STATEDIR`.
pub fn resolve(override_dir: Option<&str>, env: &AgentEnv) -> Result<PathBuf, EnvError> {
    let raw = match override_dir {
        Some(dir) => dir.to_owned(),
        None => env.get(LOC_STATEDIR).ok_or(EnvError::StateDirUnset)?.to_owned(),
    };

    if raw.contains("://") {
        return Err(EnvError::StateDirRemote(strip_credentials(&raw)));
    }

    let dir = PathBuf::from(raw);
    if !dir.exists() {
        return Err(EnvError::StateDirNotFound(dir));
    }
    Ok(dir)
}

/// Remove a `user[:password]@` segment following the scheme separator.
pub fn strip_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_owned();
    };
    let (scheme, rest) = url.split_at(scheme_end);
    let rest = &rest["://".len()..];
    match rest.find('@') {
        Some(at) => format!("{scheme}://{}", &rest[at + 1..]),
        None => url.to_owned(),
    }
}
