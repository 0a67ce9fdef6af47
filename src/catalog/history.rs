//! Version history views

use chrono::{DateTime, NaiveDateTime};

use super::record::{Prompt, PromptVersion};

/// Recorded versions of a prompt, as stored
pub fn history(prompt: &Prompt) -> &[PromptVersion] {
    &prompt.versions
}

/// A selectable version in the playground
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChoice {
    pub version: u32,
    pub label: String,
    pub current: bool,
}

/// Current version first, then every recorded version not equal to it
pub fn version_choices(prompt: &Prompt) -> Vec<VersionChoice> {
    let mut choices = vec![VersionChoice {
        version: prompt.version,
        label: format!("Current (v{})", prompt.version),
        current: true,
    }];
    choices.extend(
        prompt
            .versions
            .iter()
            .filter(|v| v.version != prompt.version)
            .map(|v| VersionChoice {
                version: v.version,
                label: format!("Version {}", v.version),
                current: false,
            }),
    );
    choices
}

/// Render a backend timestamp like `Mar 1, 2024, 10:00 AM`.
///
/// Accepts RFC 3339 or naive ISO 8601 (with or without fractional seconds);
/// anything else comes back unchanged.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%b %-d, %Y, %-I:%M %p";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn version(v: u32) -> PromptVersion {
        PromptVersion {
            id: v as i64 + 100,
            prompt_id: 1,
            version: v,
            text: format!("text v{}", v),
            meta: None,
            created_at: "2024-03-01T10:00:00".into(),
        }
    }

    fn prompt_with(current: u32, versions: Vec<PromptVersion>) -> Prompt {
        Prompt {
            id: 1,
            name: "p".into(),
            description: None,
            text: "current".into(),
            tags: vec![],
            meta: None,
            version: current,
            versions,
        }
    }

    #[test]
    fn test_version_choices_current_first() {
        let prompt = prompt_with(3, vec![version(1), version(2)]);
        let labels: Vec<_> = version_choices(&prompt)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Current (v3)", "Version 1", "Version 2"]);
    }

    #[test]
    fn test_version_choices_skips_duplicate_of_current() {
        let prompt = prompt_with(2, vec![version(1), version(2)]);
        let versions: Vec<_> = version_choices(&prompt)
            .into_iter()
            .map(|c| c.version)
            .collect();
        assert_eq!(versions, vec![2, 1]);
    }

    #[test]
    fn test_history_as_stored() {
        let prompt = prompt_with(3, vec![version(2), version(1)]);
        let versions: Vec<_> = history(&prompt).iter().map(|v| v.version).collect();
        assert_eq!(versions, vec![2, 1]);
    }

    #[test]
    fn test_format_timestamp_naive() {
        assert_eq!(format_timestamp("2024-03-01T10:05:00"), "Mar 1, 2024, 10:05 AM");
        assert_eq!(
            format_timestamp("2024-12-24T18:30:00.123456"),
            "Dec 24, 2024, 6:30 PM"
        );
    }

    #[test]
    fn test_format_timestamp_rfc3339() {
        assert_eq!(
            format_timestamp("2024-03-01T00:15:00+00:00"),
            "Mar 1, 2024, 12:15 AM"
        );
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
