//! Create/edit form state for a prompt

use thiserror::Error;

use crate::template::extract_placeholders;

use super::record::{Metadata, Prompt, PromptDraft};

/// Errors when turning a form into a request body
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank
    #[error("{field} is required")]
    Required { field: &'static str },
}

/// Editable fields of the prompt dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    pub name: String,
    pub description: String,
    pub text: String,
    pub tags: Vec<String>,
    pub meta: Metadata,
}

impl PromptForm {
    /// Blank form for a new prompt
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing prompt
    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            name: prompt.name.clone(),
            description: prompt.description.clone().unwrap_or_default(),
            text: prompt.text.clone(),
            tags: prompt.tag_names().map(str::to_string).collect(),
            meta: prompt.meta.clone().unwrap_or_default(),
        }
    }

    /// Add a tag. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Add a metadata entry. Both parts must be non-empty and the key new.
    pub fn add_meta(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim();
        if key.is_empty() || value.is_empty() || self.meta.contains_key(key) {
            return false;
        }
        self.meta.insert(key, value);
        true
    }

    pub fn remove_meta(&mut self, key: &str) -> bool {
        self.meta.remove(key).is_some()
    }

    /// Placeholders currently used by the text
    pub fn placeholders(&self) -> Vec<String> {
        extract_placeholders(&self.text)
    }

    /// Validate and build the request body
    pub fn to_draft(&self) -> Result<PromptDraft, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Required { field: "name" });
        }
        if self.text.trim().is_empty() {
            return Err(FormError::Required { field: "text" });
        }

        Ok(PromptDraft {
            name: self.name.clone(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            text: self.text.clone(),
            tags: self.tags.clone(),
            meta: if self.meta.is_empty() {
                None
            } else {
                Some(self.meta.clone())
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::Tag;
    use pretty_assertions::assert_eq;

    fn filled() -> PromptForm {
        PromptForm {
            name: "summary".into(),
            text: "Summarize {{doc}} in {{n}} words".into(),
            ..PromptForm::new()
        }
    }

    #[test]
    fn test_add_tag_rejects_blank_and_duplicate() {
        let mut form = PromptForm::new();
        assert!(form.add_tag("email"));
        assert!(!form.add_tag("email"));
        assert!(!form.add_tag("  "));
        assert!(form.add_tag(" work "));
        assert_eq!(form.tags, vec!["email", "work"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut form = PromptForm::new();
        form.add_tag("a");
        assert!(form.remove_tag("a"));
        assert!(!form.remove_tag("a"));
    }

    #[test]
    fn test_add_meta_rules() {
        let mut form = PromptForm::new();
        assert!(form.add_meta("model", "gpt-4"));
        assert!(!form.add_meta("model", "other"));
        assert!(!form.add_meta("", "x"));
        assert!(!form.add_meta("k", ""));
        assert_eq!(form.meta.get("model"), Some("gpt-4"));
        assert!(form.remove_meta("model"));
        assert!(form.meta.is_empty());
    }

    #[test]
    fn test_to_draft_requires_name_and_text() {
        let mut form = filled();
        form.name = " ".into();
        assert_eq!(form.to_draft(), Err(FormError::Required { field: "name" }));

        let mut form = filled();
        form.text.clear();
        assert_eq!(form.to_draft(), Err(FormError::Required { field: "text" }));
    }

    #[test]
    fn test_to_draft_nulls_empty_optionals() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.description, None);
        assert_eq!(draft.meta, None);

        let mut form = filled();
        form.description = "desc".into();
        form.add_meta("k", "v");
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.description.as_deref(), Some("desc"));
        assert_eq!(draft.meta.unwrap().get("k"), Some("v"));
    }

    #[test]
    fn test_draft_meta_keeps_entry_order() {
        let mut form = filled();
        form.add_meta("zeta", "1");
        form.add_meta("alpha", "2");
        let draft = form.to_draft().unwrap();
        let json = serde_json::to_string(&draft.meta).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_from_prompt_round_trips_fields() {
        let prompt = Prompt {
            id: 3,
            name: "n".into(),
            description: Some("d".into()),
            text: "{{x}}".into(),
            tags: vec![Tag {
                id: 1,
                name: "t".into(),
            }],
            meta: Some([("a", "b")].into_iter().collect()),
            version: 1,
            versions: vec![],
        };
        let form = PromptForm::from_prompt(&prompt);
        assert_eq!(form.description, "d");
        assert_eq!(form.tags, vec!["t"]);
        assert_eq!(form.meta.get("a"), Some("b"));
        assert_eq!(form.placeholders(), vec!["x"]);
    }
}
