//! Cross-Validator: every per-table list must agree with `HVR_TBL_NAMES`
//! on the number of tables before a manifest is assembled.

use crate::env::TBL_NAMES;
use crate::error::EnvError;
use crate::types::{CycleContext, PerTableList};

/// Check table counts across the per-table lists of `ctx`.
///
/// With no tables there is nothing to check. Otherwise at least one
/// per-table list must be present and each present list must have one
/// entry per table. A blank list counts as a single entry.
pub fn validate(ctx: &CycleContext) -> Result<(), EnvError> {
    let table_count = ctx.table_names.len();
    if table_count == 0 {
        return Ok(());
    }

    let lists = ctx.per_table_lists();
    if !lists.iter().any(|(_, list)| list.is_present()) {
        let candidates = lists.iter().map(|(name, _)| *name).collect::<Vec<_>>();
        return Err(EnvError::NoCrossCheck {
            candidates: candidates.join(", "),
        });
    }

    for (var, list) in lists {
        let var_count = match list {
            PerTableList::Absent => continue,
            PerTableList::Blank => 1,
            PerTableList::Entries(entries) => entries.len(),
        };
        if var_count != table_count {
            return Err(EnvError::CrossCheckMismatch {
                var: var.to_owned(),
                table_count,
                var_count,
                tables: ctx.table_names.clone(),
                value: list.entries().join(":"),
            });
        }
    }

    tracing::debug!("{TBL_NAMES} cross-checked: {table_count} table(s)");
    Ok(())
}
