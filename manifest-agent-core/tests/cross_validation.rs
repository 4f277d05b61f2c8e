//! Cross-validation and environment contract tests, driven through
//! [`AgentEnv`] the way the agent sees its environment.

use assert_fs::prelude::*;
use manifest_agent_core::{
    validate, AgentEnv, ChannelName, CycleContext, CycleMode, EnvError, LocationName,
};
use predicates::prelude::predicate;
use rstest::rstest;

fn context(pairs: &[(&str, &str)]) -> CycleContext {
    let env = AgentEnv::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    CycleContext::from_env(
        &env,
        CycleMode::Refresh,
        ChannelName::from("chn"),
        LocationName::from("tgt"),
    )
    .expect("context")
}

// ---------------------------------------------------------------------------
// 1. Table counts
// ---------------------------------------------------------------------------

#[rstest]
#[case("a", "A", true)]
#[case("a:b:c", "A:B:C", true)]
#[case("a:b:c", "A:B", false)]
#[case("a", "A:B", false)]
#[case("a", "", true)]
#[case("a:b", "", false)]
#[case("", "A:B", true)]
#[case("", "", true)]
fn base_names_must_match_table_count(
    #[case] tables: &str,
    #[case] bases: &str,
    #[case] ok: bool,
) {
    let ctx = context(&[("HVR_TBL_NAMES", tables), ("HVR_BASE_NAMES", bases)]);
    assert_eq!(validate(&ctx).is_ok(), ok, "tables={tables:?} bases={bases:?}");
}

#[rstest]
#[case("HVR_BASE_NAMES")]
#[case("HVR_TBL_NROWS")]
#[case("HVR_TBL_CAP_TSTAMP")]
fn any_single_per_table_list_is_enough(#[case] var: &str) {
    let ctx = context(&[("HVR_TBL_NAMES", "a:b"), (var, "x:y")]);
    validate(&ctx).expect("one matching per-table list suffices");
}

#[test]
fn row_count_mismatch_reports_both_counts() {
    let ctx = context(&[
        ("HVR_TBL_NAMES", "a:b:c"),
        ("HVR_BASE_NAMES", "A:B:C"),
        ("HVR_TBL_NROWS", "1:2"),
    ]);
    let err = validate(&ctx).unwrap_err();
    assert!(matches!(err, EnvError::CrossCheckMismatch { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("HVR_TBL_NROWS"), "got: {msg}");
    assert!(msg.contains("mentions 3 tables"), "got: {msg}");
    assert!(msg.contains("has 2 tables"), "got: {msg}");
    assert!(msg.contains("'1:2'"), "got: {msg}");
}

#[test]
fn tables_without_per_table_lists_are_rejected() {
    let ctx = context(&[("HVR_TBL_NAMES", "orders")]);
    let err = validate(&ctx).unwrap_err();
    assert!(matches!(err, EnvError::NoCrossCheck { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Overflow file
// ---------------------------------------------------------------------------

#[test]
fn overflow_file_supplies_untruncated_values() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let overflow = dir.child("long_env.json");
    overflow
        .write_str(r#"{"HVR_TBL_NAMES": "a:b:c", "HVR_BASE_NAMES": "A:B:C"}"#)
        .expect("write overflow");
    overflow.assert(predicate::path::exists());

    let path = overflow.path().to_string_lossy().to_string();
    let env = AgentEnv::from_pairs(
        [
            ("HVR_LONG_ENVIRONMENT", path.as_str()),
            ("HVR_TBL_NAMES", "a:b..."),
            ("HVR_BASE_NAMES", "A:B..."),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    env.verify_not_truncated()
        .expect("overflow values replace the truncated ones");
    let ctx = CycleContext::from_env(
        &env,
        CycleMode::Integrate,
        ChannelName::from("chn"),
        LocationName::from("tgt"),
    )
    .expect("context");
    assert_eq!(ctx.table_names.len(), 3);
    validate(&ctx).expect("counts agree");
}

#[test]
fn truncated_value_without_overflow_file_is_fatal() {
    let env = AgentEnv::from_pairs(
        [("HVR_TBL_NAMES", "a:b...")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    let err = env.verify_not_truncated().unwrap_err();
    assert!(err.to_string().contains("Refusing to continue"), "got: {err}");
}
