//! Manifest Assembler.
//!
//! Turns a validated [`CycleContext`] into a [`Manifest`] plus the filename
//! it must be written under.

use std::time::Duration;

use manifest_agent_core::{
    manifest::{integ_tstamp, utc_tstamp},
    CycleContext, EnvError, IntegLoc, Manifest,
};
use manifest_agent_renderer::{CompiledTemplate, RenderValues};

use crate::error::CycleError;

/// Stall applied after a zero-duration cycle so the next cycle cannot end
/// in the same second.
pub const COLLISION_PAUSE: Duration = Duration::from_secs(1);

/// A manifest ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub manifest: Manifest,
    /// Relative to the state directory; may contain subdirectories.
    pub file_name: String,
}

/// Build the manifest for `ctx`, or `None` when no tables were transferred.
///
/// Missing begin/end timestamps default to `now`. When the orchestrator
/// supplied both and they are equal, the end timestamp is moved one second
/// forward and `pause` is called with [`COLLISION_PAUSE`].
pub fn assemble(
    ctx: &CycleContext,
    template: &CompiledTemplate,
    now: i64,
    pause: impl FnOnce(Duration),
) -> Result<Option<Assembled>, CycleError> {
    let cycle_begin = ctx.cycle_begin.unwrap_or(now);
    let mut cycle_end = ctx.cycle_end.unwrap_or(now);

    if let (Some(begin), Some(end)) = (ctx.cycle_begin, ctx.cycle_end) {
        if begin == end {
            tracing::debug!("zero-duration cycle at {end}; bumping end and pausing");
            cycle_end = end.checked_add(1).ok_or(EnvError::TimestampOutOfRange(end))?;
            pause(COLLISION_PAUSE);
        }
    }

    if ctx.table_names.is_empty() {
        tracing::debug!("no tables in cycle; nothing to report");
        return Ok(None);
    }

    let tstamp = integ_tstamp(cycle_end)?;
    let table_name = if template.references_table_name() {
        if ctx.table_names.len() > 1 {
            tracing::warn!(
                "W_JX0E00: Warning: manifest filename template '{template}' uses {{hvr_tbl_name}} \
                 but {} tables took part in this cycle; naming the manifest after '{}' only",
                ctx.table_names.len(),
                ctx.table_names[0]
            );
        }
        ctx.table_names.first().map(String::as_str)
    } else {
        None
    };

    let file_name = template.render(RenderValues {
        table_name,
        integ_tstamp: Some(&tstamp),
    })?;

    let manifest = Manifest {
        channel: ctx.channel.to_string(),
        integ_loc: IntegLoc {
            name: ctx.location.to_string(),
        },
        tables: ctx.base_names.entries().to_vec(),
        cycle_begin: utc_tstamp(cycle_begin)?,
        cycle_end: utc_tstamp(cycle_end)?,
        initial_load: ctx.mode.is_initial_load(),
    };

    Ok(Some(Assembled {
        manifest,
        file_name,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_agent_core::{ChannelName, CycleMode, LocationName, PerTableList};
    use std::cell::Cell;
    use std::collections::BTreeMap;

    const NOW: i64 = 1_700_000_500;

    fn ctx(begin: Option<i64>, end: Option<i64>, tables: &[&str]) -> CycleContext {
        CycleContext {
            mode: CycleMode::Integrate,
            channel: ChannelName::from("chn"),
            location: LocationName::from("tgt"),
            cycle_begin: begin,
            cycle_end: end,
            table_names: tables.iter().map(|t| t.to_string()).collect(),
            base_names: PerTableList::Entries(
                tables.iter().map(|t| t.to_uppercase()).collect(),
            ),
            row_counts: PerTableList::Absent,
            capture_tstamps: PerTableList::Absent,
            user_variables: BTreeMap::new(),
        }
    }

    fn template(src: &str) -> CompiledTemplate {
        CompiledTemplate::compile(src, &BTreeMap::new()).unwrap()
    }

    fn no_pause(_: Duration) {
        panic!("unexpected pause");
    }

    #[test]
    fn timestamp_template_uses_cycle_end() {
        let c = ctx(Some(1_699_999_990), Some(1_700_000_000), &["orders"]);
        let out = assemble(&c, &template("manifest-{hvr_integ_tstamp}.json"), NOW, no_pause)
            .unwrap()
            .unwrap();
        assert_eq!(out.file_name, "manifest-20231114221320.json");
        assert_eq!(out.manifest.cycle_end, "2023-11-14T22:13:20Z");
        assert_eq!(out.manifest.cycle_begin, "2023-11-14T22:13:10Z");
        assert!(!out.manifest.initial_load);
    }

    #[test]
    fn tables_come_from_base_names() {
        let c = ctx(Some(1), Some(2), &["dbo.orders", "dbo.lines"]);
        let out = assemble(&c, &template("m.json"), NOW, no_pause)
            .unwrap()
            .unwrap();
        assert_eq!(out.manifest.tables, vec!["DBO.ORDERS", "DBO.LINES"]);
        assert_eq!(out.manifest.channel, "chn");
        assert_eq!(out.manifest.integ_loc.name, "tgt");
    }

    #[test]
    fn table_placeholder_uses_first_table() {
        let c = ctx(Some(1), Some(2), &["orders", "lines"]);
        let out = assemble(&c, &template("out/{hvr_tbl_name}.json"), NOW, no_pause)
            .unwrap()
            .unwrap();
        assert_eq!(out.file_name, "out/orders.json");
        assert_eq!(out.manifest.tables.len(), 2);
    }

    #[test]
    fn missing_timestamps_default_to_now_without_pausing() {
        let c = ctx(None, None, &["orders"]);
        let out = assemble(&c, &template("{hvr_integ_tstamp}"), NOW, no_pause)
            .unwrap()
            .unwrap();
        assert_eq!(out.manifest.cycle_begin, out.manifest.cycle_end);
        assert_eq!(out.file_name, integ_tstamp(NOW).unwrap());
    }

    #[test]
    fn zero_duration_cycle_bumps_end_and_pauses_once() {
        let paused = Cell::new(0);
        let c = ctx(Some(1_700_000_000), Some(1_700_000_000), &["orders"]);
        let out = assemble(&c, &template("{hvr_integ_tstamp}"), NOW, |d| {
            assert_eq!(d, COLLISION_PAUSE);
            paused.set(paused.get() + 1);
        })
        .unwrap()
        .unwrap();
        assert_eq!(paused.get(), 1);
        assert_eq!(out.file_name, "20231114221321");
        assert_eq!(out.manifest.cycle_begin, "2023-11-14T22:13:20Z");
        assert_eq!(out.manifest.cycle_end, "2023-11-14T22:13:21Z");
    }

    #[test]
    fn zero_duration_cycle_at_max_timestamp_is_out_of_range() {
        let c = ctx(Some(i64::MAX), Some(i64::MAX), &["orders"]);
        let err = assemble(&c, &template("{hvr_integ_tstamp}"), NOW, |_| {}).unwrap_err();
        assert!(
            matches!(err, CycleError::Env(EnvError::TimestampOutOfRange(t)) if t == i64::MAX),
            "got: {err}"
        );
    }

    #[test]
    fn end_before_begin_is_tolerated() {
        let c = ctx(Some(1_700_000_000), Some(1_699_999_000), &["orders"]);
        let out = assemble(&c, &template("m.json"), NOW, no_pause).unwrap().unwrap();
        assert!(out.manifest.cycle_end < out.manifest.cycle_begin);
    }

    #[test]
    fn no_tables_produces_no_manifest() {
        let c = ctx(Some(1), Some(2), &[]);
        assert!(assemble(&c, &template("m.json"), NOW, no_pause)
            .unwrap()
            .is_none());
    }

    #[test]
    fn refresh_sets_initial_load() {
        let mut c = ctx(Some(1), Some(2), &["orders"]);
        c.mode = CycleMode::Refresh;
        let out = assemble(&c, &template("m.json"), NOW, no_pause).unwrap().unwrap();
        assert!(out.manifest.initial_load);
    }
}
