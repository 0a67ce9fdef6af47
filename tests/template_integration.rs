//! Integration tests for placeholder extraction, reconciliation and rendering

use std::collections::{BTreeMap, HashMap};

use pretty_assertions::assert_eq;
use prompt_hub::template::{
    extract_placeholders, reconcile, render, render_with, resolve_variables, MissingValue,
    VariableSet,
};

const REVIEW_PROMPT: &str = "You are reviewing {{language}} code.\n\
Focus on {{focus}} and keep it under {{limit}} words.\n\
Reply in {{language}}.";

#[test]
fn test_placeholders_in_first_use_order() {
    assert_eq!(
        extract_placeholders(REVIEW_PROMPT),
        vec!["language", "focus", "limit"]
    );
}

#[test]
fn test_every_placeholder_gets_a_variable() {
    let vars = resolve_variables(REVIEW_PROMPT, &VariableSet::new());
    let names: Vec<_> = vars.names().collect();
    assert_eq!(names, vec!["language", "focus", "limit"]);
    assert!(vars.iter().all(|(_, value)| value.is_empty()));
}

#[test]
fn test_editing_text_keeps_values_for_surviving_names() {
    let mut vars = resolve_variables(REVIEW_PROMPT, &VariableSet::new());
    assert!(vars.set("language", "Rust"));
    assert!(vars.set("focus", "error handling"));

    let edited = "Review this {{language}} snippet for {{audience}}.";
    let vars = resolve_variables(edited, &vars);

    assert_eq!(vars.get("language"), Some("Rust"));
    assert_eq!(vars.get("audience"), Some(""));
    assert!(!vars.contains("focus"));
    assert!(!vars.contains("limit"));
    assert_eq!(vars.len(), 2);
}

#[test]
fn test_render_fills_every_occurrence() {
    let vars: VariableSet = [("language", "Rust"), ("focus", "lifetimes"), ("limit", "200")]
        .into_iter()
        .collect();

    assert_eq!(
        render(REVIEW_PROMPT, &vars),
        "You are reviewing Rust code.\n\
Focus on lifetimes and keep it under 200 words.\n\
Reply in Rust."
    );
}

#[test]
fn test_render_missing_values() {
    let vars: VariableSet = [("language", "Rust")].into_iter().collect();
    let template = "{{language}} / {{focus}}";

    assert_eq!(render(template, &vars), "Rust / ");
    assert_eq!(
        render_with(template, &vars, MissingValue::Empty),
        "Rust / "
    );
    assert_eq!(
        render_with(template, &vars, MissingValue::Verbatim),
        "Rust / {{focus}}"
    );
}

#[test]
fn test_render_from_plain_maps() {
    let template = "Hello {{name}}";

    let mut hash = HashMap::new();
    hash.insert("name".to_string(), "Ada".to_string());
    assert_eq!(render(template, &hash), "Hello Ada");

    let mut btree = BTreeMap::new();
    btree.insert("name".to_string(), "Grace".to_string());
    assert_eq!(render(template, &btree), "Hello Grace");
}

#[test]
fn test_text_without_placeholders_is_unchanged() {
    let plain = "Nothing to fill in {here} or { {there} }.";
    assert!(extract_placeholders(plain).is_empty());
    assert_eq!(render(plain, &VariableSet::new()), plain);
}

#[test]
fn test_malformed_sequences_are_left_alone() {
    let template = "{{ name }} {{first-name}} {{}} {{ok}}";
    assert_eq!(extract_placeholders(template), vec!["ok"]);

    let vars: VariableSet = [("ok", "yes")].into_iter().collect();
    assert_eq!(
        render(template, &vars),
        "{{ name }} {{first-name}} {{}} yes"
    );
}

#[test]
fn test_values_are_inserted_literally() {
    let template = "{{a}} and {{b}}";
    let vars: VariableSet = [("a", "{{b}}"), ("b", "$1 costs $2")].into_iter().collect();
    assert_eq!(render(template, &vars), "{{b}} and $1 costs $2");
}

#[test]
fn test_rendering_all_names_leaves_no_placeholders() {
    let names = extract_placeholders(REVIEW_PROMPT);
    let mut vars = reconcile(&names, &VariableSet::new());
    for name in &names {
        vars.set(name, "x");
    }
    let rendered = render(REVIEW_PROMPT, &vars);
    assert!(extract_placeholders(&rendered).is_empty());
}

#[test]
fn test_insert_order_is_kept() {
    let mut vars = VariableSet::new();
    vars.insert("zeta", "1");
    vars.insert("alpha", "2");
    vars.insert("zeta", "3");

    let pairs: Vec<_> = vars.iter().collect();
    assert_eq!(pairs, vec![("zeta", "3"), ("alpha", "2")]);
}

#[test]
fn test_reconcile_is_idempotent() {
    let templates = ["", "{{a}} {{b}} {{a}}", "x {{ y }} {{z}}", "{{{q}}}"];
    let previous: VariableSet = [("a", "1"), ("z", "2"), ("stale", "s")]
        .into_iter()
        .collect();

    for template in templates {
        let names = extract_placeholders(template);
        let once = reconcile(&names, &previous);
        let twice = reconcile(&names, &once);

        assert_eq!(once, twice, "template: {:?}", template);
        assert!(!once.contains("stale"));
        assert_eq!(render(template, &once), render(template, &twice));
    }
}

#[test]
fn test_repeated_runs_give_identical_results() {
    let previous: VariableSet = [("language", "Rust"), ("limit", "50")].into_iter().collect();

    let first_names = extract_placeholders(REVIEW_PROMPT);
    let first_vars = reconcile(&first_names, &previous);
    let first_text = render(REVIEW_PROMPT, &first_vars);

    for _ in 0..3 {
        let names = extract_placeholders(REVIEW_PROMPT);
        let vars = reconcile(&names, &previous);
        assert_eq!(names, first_names);
        assert_eq!(vars, first_vars);
        assert_eq!(render(REVIEW_PROMPT, &vars), first_text);
    }
    assert_eq!(
        first_text,
        "You are reviewing Rust code.\nFocus on  and keep it under 50 words.\nReply in Rust."
    );
}
