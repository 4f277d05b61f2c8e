//! `manifest-agent integ_end|refr_write_end <chn> <loc> "<userargs>"`

use anyhow::{anyhow, Result};
use clap::Parser;

use manifest_agent_core::{AgentEnv, ChannelName, CycleMode, LocationName};
use manifest_agent_writer::{pipeline, CycleOutcome, CycleRequest};

use super::usage_line;

/// Options carried in the single user-argument string.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(
    name = "userargs",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct UserArgs {
    /// Manifest filename template, e.g. `manifest-{hvr_integ_tstamp}.json`.
    #[arg(short = 'm', value_name = "MANI_FEXPR", allow_hyphen_values = true)]
    pub template: Option<String>,

    /// State directory; defaults to `$HVR_LOC_STATEDIR`.
    #[arg(short = 's', value_name = "STATEDIR")]
    pub state_dir: Option<String>,

    /// Accepted for compatibility; ignored.
    #[arg(short = 'i', hide = true)]
    pub reserved_i: Option<String>,

    /// Accepted for compatibility; ignored.
    #[arg(short = 'v', hide = true)]
    pub reserved_v: Option<String>,
}

impl UserArgs {
    /// Split `raw` on whitespace and parse it as short options.
    pub fn parse_str(raw: &str) -> Result<Self> {
        UserArgs::try_parse_from(raw.split_whitespace())
            .map_err(|e| anyhow!("invalid userargs: {}", usage_line(&e)))
    }
}

/// Write the manifest for a completed integrate or refresh cycle.
pub fn run(
    mode: CycleMode,
    channel: String,
    location: String,
    userargs: Option<&str>,
    env: AgentEnv,
    now: i64,
) -> Result<CycleOutcome> {
    let args = UserArgs::parse_str(userargs.unwrap_or_default())?;
    tracing::debug!("{mode} for channel '{channel}', location '{location}': {args:?}");

    let prepared = pipeline::prepare(
        CycleRequest {
            mode,
            channel: ChannelName::from(channel),
            location: LocationName::from(location),
            template: args.template,
            state_dir: args.state_dir,
        },
        env,
    )?;
    Ok(pipeline::run(&prepared, now)?)
}
