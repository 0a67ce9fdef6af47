//! Lint for double-brace sequences that will not be treated as placeholders.
//!
//! The resolver silently leaves `{{ name }}`, `{{first-name}}` and friends in
//! the text. This pass points them out so authors can fix them before a test
//! run sends them to a model verbatim.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use regex::Regex;

use super::resolver::is_valid_name;

/// Any `{{...}}` pair without nested braces
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]*)\}\}").expect("candidate pattern should be valid")
});

/// A lint warning about a sequence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
    /// Byte range in the template
    pub span: Range<usize>,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Spacing,
    Empty,
    Name,
    Unclosed,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Spacing => write!(f, "spacing"),
            LintCategory::Empty => write!(f, "empty"),
            LintCategory::Name => write!(f, "name"),
            LintCategory::Unclosed => write!(f, "unclosed"),
        }
    }
}

/// Run all lint checks on a template.
pub fn check(template: &str) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let covered = check_candidates(template, &mut warnings);
    check_unclosed(template, &covered, &mut warnings);
    warnings.sort_by_key(|w| w.span.start);
    warnings
}

/// Flag `{{...}}` pairs whose content is not a valid name. Returns the spans of
/// every pair seen so the unclosed check can skip them.
fn check_candidates(template: &str, warnings: &mut Vec<LintWarning>) -> Vec<Range<usize>> {
    let mut covered = Vec::new();
    for caps in CANDIDATE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        covered.push(whole.range());

        let inner = &caps[1];
        if is_valid_name(inner) {
            continue;
        }

        let trimmed = inner.trim();
        let (category, message) = if trimmed.is_empty() {
            (LintCategory::Empty, "placeholder has no name".to_string())
        } else if is_valid_name(trimmed) {
            (
                LintCategory::Spacing,
                format!("whitespace inside braces; write {{{{{}}}}}", trimmed),
            )
        } else {
            (LintCategory::Name, invalid_name_message(trimmed))
        };

        warnings.push(LintWarning {
            category,
            message,
            span: whole.range(),
        });
    }
    covered
}

/// Flag `{{` openers the candidate pattern did not pair up: either never
/// closed before the next opener, or closed with a stray brace in between
/// (`{{a}b}}`, `{{a{b}}`).
fn check_unclosed(template: &str, covered: &[Range<usize>], warnings: &mut Vec<LintWarning>) {
    for (idx, _) in template.match_indices("{{") {
        if covered.iter().any(|r| r.contains(&idx)) {
            continue;
        }
        let rest = &template[idx + 2..];
        let close = match (rest.find("}}"), rest.find("{{")) {
            (None, _) => None,
            (Some(close), Some(open)) if open < close => None,
            (Some(close), _) => Some(close),
        };

        match close {
            None => warnings.push(LintWarning {
                category: LintCategory::Unclosed,
                message: "'{{' is never closed".to_string(),
                span: idx..idx + 2,
            }),
            Some(close) => {
                let span = idx..idx + 2 + close + 2;
                // `{{{x}}}` wraps a real placeholder
                if covered.iter().any(|r| r.start < span.end && span.start < r.end) {
                    continue;
                }
                warnings.push(LintWarning {
                    category: LintCategory::Name,
                    message: invalid_name_message(rest[..close].trim()),
                    span,
                });
            }
        }
    }
}

fn invalid_name_message(name: &str) -> String {
    format!(
        "'{}' is not a valid name (letters, digits and underscore only)",
        name
    )
}

/// Format warnings with source context using ariadne
pub fn format_warnings(
    source: &str,
    filename: &str,
    warnings: &[LintWarning],
    color: bool,
) -> String {
    let mut buf = Vec::new();
    for warning in warnings {
        // ariadne counts chars, spans are bytes
        let start = source[..warning.span.start].chars().count();
        let end = start + source[warning.span.clone()].chars().count();

        let report = Report::build(ReportKind::Warning, filename, start)
            .with_config(Config::default().with_color(color))
            .with_message(format!("[{}] {}", warning.category, warning.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&warning.message)
                    .with_color(Color::Yellow),
            )
            .finish();

        if let Err(e) = report.write((filename, Source::from(source)), &mut buf) {
            tracing::warn!("failed to format lint report: {}", e);
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
