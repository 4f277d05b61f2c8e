//! Manifest agent: a post-cycle hook that writes one manifest per
//! integrate or refresh cycle.
//!
//! # Usage
//!
//! ```text
//! manifest-agent <mode> <chn> <loc> ["-m mani_fexpr [-s statedir]"]
//! ```
//!
//! | Mode             | Action                                  | Exit |
//! |------------------|-----------------------------------------|------|
//! | `integ_end`      | write manifest, `initial_load: false`   | 0    |
//! | `refr_write_end` | write manifest, `initial_load: true`    | 0    |
//! | anything else    | nothing                                 | 2    |
//!
//! Any error exits 1 with a single `F_JX0E00:` line on stderr.

mod commands;

use std::process::ExitCode;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{error::ErrorKind, Parser};

use manifest_agent_core::{AgentEnv, CycleMode};
use manifest_agent_writer::CycleOutcome;

/// Exit status for a mode this agent does not act on.
const EXIT_NOT_APPLICABLE: u8 = 2;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "manifest-agent",
    version,
    about = "Write a cycle manifest after each integrate or refresh cycle",
    long_about = None,
)]
struct Cli {
    /// Agent mode: `integ_end` or `refr_write_end`; other modes are ignored.
    #[arg(allow_hyphen_values = true)]
    mode: String,

    /// Channel name.
    #[arg(allow_hyphen_values = true)]
    channel: String,

    /// Integrate location name.
    #[arg(allow_hyphen_values = true)]
    location: String,

    /// User arguments as one string: "-m mani_fexpr [-s statedir]".
    #[arg(allow_hyphen_values = true)]
    userargs: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("F_JX0E00: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => bail!(
            "{} (usage: manifest-agent <mode> <chn> <loc> [userargs])",
            commands::usage_line(&e)
        ),
    };

    let Some(mode) = CycleMode::from_agent_mode(&cli.mode) else {
        tracing::debug!("mode '{}' ignored", cli.mode);
        return Ok(ExitCode::from(EXIT_NOT_APPLICABLE));
    };

    let outcome = commands::cycle_end::run(
        mode,
        cli.channel,
        cli.location,
        cli.userargs.as_deref(),
        AgentEnv::from_process(),
        Utc::now().timestamp(),
    )?;

    if let CycleOutcome::Written { path } = outcome {
        println!("Written manifest {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
