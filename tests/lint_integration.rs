//! Integration tests for template lint

use prompt_hub::template::lint::{check, format_warnings};
use prompt_hub::template::{extract_placeholders, LintCategory};

const TRUE_POSITIVES: &str = "Dear {{ name }},\n\
Your order {{}} ships to {{ship-to}}.\n\
Ref: {{a}b}} and {{a{b}}.\n\
Total: {{total";

const TRUE_NEGATIVES: &str = "Dear {{name}},\n\
Your order {{order_id}} ships to {{address}}.\n\
JSON stays as is: {\"total\": {\"amount\": 3}}\n\
Triple braces wrap a placeholder: {{{order_id}}}";

#[test]
fn test_true_positives_all_categories() {
    let warnings = check(TRUE_POSITIVES);

    let categories: Vec<LintCategory> = warnings.iter().map(|w| w.category).collect();
    assert_eq!(
        categories,
        vec![
            LintCategory::Spacing,
            LintCategory::Empty,
            LintCategory::Name,
            LintCategory::Name,
            LintCategory::Name,
            LintCategory::Unclosed,
        ]
    );

    // Nothing flagged is picked up as a placeholder
    assert!(extract_placeholders(TRUE_POSITIVES).is_empty());
}

#[test]
fn test_true_negatives_clean() {
    let warnings = check(TRUE_NEGATIVES);
    assert!(warnings.is_empty(), "Expected no warnings, got: {:?}", warnings);
}

#[test]
fn test_warning_messages() {
    let summary: Vec<String> = check(TRUE_POSITIVES)
        .iter()
        .map(|w| format!("{}: {}", w.category, w.message))
        .collect();

    insta::assert_snapshot!(summary.join("\n"), @r#"
    spacing: whitespace inside braces; write {{name}}
    empty: placeholder has no name
    name: 'ship-to' is not a valid name (letters, digits and underscore only)
    name: 'a}b' is not a valid name (letters, digits and underscore only)
    name: 'a{b' is not a valid name (letters, digits and underscore only)
    unclosed: '{{' is never closed
    "#);
}

#[test]
fn test_spans_point_at_the_sequence() {
    let flagged: Vec<&str> = check(TRUE_POSITIVES)
        .iter()
        .map(|w| &TRUE_POSITIVES[w.span.clone()])
        .collect();
    assert_eq!(
        flagged,
        vec!["{{ name }}", "{{}}", "{{ship-to}}", "{{a}b}}", "{{a{b}}", "{{"]
    );
}

#[test]
fn test_report_names_file_and_category() {
    let warnings = check(TRUE_POSITIVES);
    let report = format_warnings(TRUE_POSITIVES, "order.txt", &warnings, false);

    assert!(report.contains("order.txt"));
    assert!(report.contains("[spacing]"));
    assert!(report.contains("[unclosed]"));
}

#[test]
fn test_report_handles_multibyte_text() {
    let source = "Grüße an {{ wer }} ✓";
    let warnings = check(source);
    assert_eq!(warnings.len(), 1);

    let report = format_warnings(source, "greeting.txt", &warnings, false);
    assert!(report.contains("[spacing]"));
}

#[test]
fn test_plain_report_has_no_escape_codes() {
    let warnings = check(TRUE_POSITIVES);
    let plain = format_warnings(TRUE_POSITIVES, "order.txt", &warnings, false);
    assert!(!plain.contains('\u{1b}'));
    assert!(plain.contains("[name]"));
}
