//! Cycle pipeline: Loader → Cross-Validator → Assembler → Atomic Writer.
//!
//! [`prepare`] performs every check that only depends on the invocation
//! (template, state directory) so usage errors surface before any cycle
//! processing. [`run`] then handles the cycle itself.

use std::path::PathBuf;
use std::time::Duration;

use manifest_agent_core::{
    state_dir, validate, AgentEnv, ChannelName, CycleContext, CycleMode, LocationName,
};
use manifest_agent_renderer::CompiledTemplate;

use crate::assemble::assemble;
use crate::error::CycleError;
use crate::writer::write_manifest;

/// What the caller asked for, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRequest {
    pub mode: CycleMode,
    pub channel: ChannelName,
    pub location: LocationName,
    /// `-m`: manifest filename template.
    pub template: Option<String>,
    /// `-s`: state directory override.
    pub state_dir: Option<String>,
}

/// A request whose template and state directory have been validated.
#[derive(Debug, Clone)]
pub struct PreparedCycle {
    pub mode: CycleMode,
    pub channel: ChannelName,
    pub location: LocationName,
    pub template: CompiledTemplate,
    pub state_dir: PathBuf,
    pub env: AgentEnv,
}

/// Outcome of a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A manifest was installed at `path`.
    Written { path: PathBuf },
    /// No tables took part in the cycle; nothing was written.
    NothingToReport,
}

/// Validate the invocation against `env`.
pub fn prepare(request: CycleRequest, env: AgentEnv) -> Result<PreparedCycle, CycleError> {
    let template = request
        .template
        .as_deref()
        .map(|src| CompiledTemplate::compile(src, &env.user_variables()))
        .transpose()?;
    let state_dir = state_dir::resolve(request.state_dir.as_deref(), &env)?;
    let template = template.ok_or(CycleError::MissingTemplate)?;
    template.ensure_renderable()?;

    Ok(PreparedCycle {
        mode: request.mode,
        channel: request.channel,
        location: request.location,
        template,
        state_dir,
        env,
    })
}

/// Process the cycle, sleeping for real on a zero-duration cycle.
pub fn run(prepared: &PreparedCycle, now: i64) -> Result<CycleOutcome, CycleError> {
    run_with_pause(prepared, now, std::thread::sleep)
}

/// [`run`] with an injectable pause.
pub fn run_with_pause(
    prepared: &PreparedCycle,
    now: i64,
    pause: impl FnOnce(Duration),
) -> Result<CycleOutcome, CycleError> {
    prepared.env.verify_not_truncated()?;

    let ctx = CycleContext::from_env(
        &prepared.env,
        prepared.mode,
        prepared.channel.clone(),
        prepared.location.clone(),
    )?;
    validate(&ctx)?;
    if let Some(rows) = ctx.total_rows() {
        tracing::debug!("{} table(s), {rows} row(s) in cycle", ctx.table_names.len());
    }

    let Some(assembled) = assemble(&ctx, &prepared.template, now, pause)? else {
        return Ok(CycleOutcome::NothingToReport);
    };

    let path = prepared.state_dir.join(&assembled.file_name);
    write_manifest(&path, &assembled.manifest)?;
    Ok(CycleOutcome::Written { path })
}
