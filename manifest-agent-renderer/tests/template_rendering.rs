use std::collections::BTreeMap;

use manifest_agent_renderer::{CompiledTemplate, RenderValues, TemplateError};
use rstest::rstest;

fn variables() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("hvr_var_env".to_string(), "prod".to_string()),
        ("hvr_var_team".to_string(), "data+ops (eu)".to_string()),
    ])
}

const VALUES: RenderValues<'static> = RenderValues {
    table_name: Some("orders"),
    integ_tstamp: Some("20231114221320"),
};

// ---------------------------------------------------------------------------
// Rendered names are recognized by the template's own pattern
// ---------------------------------------------------------------------------

#[rstest]
#[case("manifest-{hvr_integ_tstamp}.json")]
#[case("out/{hvr_tbl_name}.json")]
#[case("{hvr_var_env}/{hvr_tbl_name}/{hvr_integ_tstamp}.json")]
#[case("{hvr_var_team}-{hvr_integ_tstamp}.manifest")]
#[case("[{hvr_tbl_name}]{{x.json")]
#[case("plain-name.json")]
#[case("{hvr_tbl_name}{hvr_tbl_name}.json")]
fn rendered_name_matches_recognizer(#[case] template: &str) {
    let compiled = CompiledTemplate::compile(template, &variables()).expect("compile");
    let name = compiled.render(VALUES).expect("render");

    let open = compiled.recognizer(None).expect("pattern");
    assert!(open.is_match(&name), "{name} !~ {}", open.as_str());

    let pinned = compiled.recognizer(Some("orders")).expect("pattern");
    assert!(pinned.is_match(&name), "{name} !~ {}", pinned.as_str());
}

#[test]
fn timestamp_template_renders_compact_utc() {
    let compiled =
        CompiledTemplate::compile("manifest-{hvr_integ_tstamp}.json", &BTreeMap::new()).unwrap();
    assert_eq!(
        compiled.render(VALUES).unwrap(),
        "manifest-20231114221320.json"
    );
}

#[test]
fn table_per_manifest_template() {
    let compiled = CompiledTemplate::compile("out/{hvr_tbl_name}.json", &BTreeMap::new()).unwrap();
    assert!(compiled.references_table_name());
    assert_eq!(compiled.render(VALUES).unwrap(), "out/orders.json");
}

// ---------------------------------------------------------------------------
// Recognizers select the right files out of a directory listing
// ---------------------------------------------------------------------------

#[test]
fn recognizer_filters_a_listing() {
    let compiled = CompiledTemplate::compile(
        "{hvr_var_env}-{hvr_tbl_name}-{hvr_integ_tstamp}.json",
        &variables(),
    )
    .unwrap();
    let listing = [
        "prod-orders-20231114221320.json",
        "prod-lines-20231114221321.json",
        "test-orders-20231114221320.json",
        "prod-orders-20231114221320.json_tmp",
        "prod-orders-latest.json",
    ];

    let any_table = compiled.recognizer(None).unwrap();
    let tables: Vec<&str> = listing
        .iter()
        .filter_map(|f| any_table.captures(f))
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    assert_eq!(tables, vec!["orders", "lines"]);

    let orders_only = compiled.recognizer(Some("orders")).unwrap();
    let hits = listing.iter().filter(|f| orders_only.is_match(f)).count();
    assert_eq!(hits, 1);
}

#[test]
fn wildcard_matches_in_recognizer_but_cannot_render() {
    let compiled = CompiledTemplate::compile("{batch}-{hvr_integ_tstamp}.json", &BTreeMap::new())
        .expect("wildcards compile");
    assert!(compiled
        .recognizer(None)
        .unwrap()
        .is_match("nightly-20231114221320.json"));
    assert!(matches!(
        compiled.render(VALUES),
        Err(TemplateError::Unbound(ref name)) if name == "batch"
    ));
}
