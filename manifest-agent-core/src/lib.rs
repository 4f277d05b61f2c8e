//! Manifest agent core library: cycle context, environment contract,
//! cross-validation and the manifest record.
//!
//! - [`env`]: environment capture, overflow file, truncation check
//! - [`types`]: [`CycleContext`] and friends
//! - [`validate`]: per-table list cross-check
//! - [`state_dir`]: where manifests are written
//! - [`manifest`]: the [`Manifest`] record and timestamp formats
//! - [`error`]: [`EnvError`]

pub mod env;
pub mod error;
pub mod manifest;
pub mod state_dir;
pub mod types;
pub mod validate;

pub use env::AgentEnv;
pub use error::EnvError;
pub use manifest::{IntegLoc, Manifest};
pub use types::{ChannelName, CycleContext, CycleMode, LocationName, PerTableList};
pub use validate::validate;
