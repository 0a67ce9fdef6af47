//! List filtering by search text and tag

use super::record::Prompt;

/// Search text and tag selection for the prompt list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl PromptFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text; blank text clears it
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(search.into());
        self
    }

    /// Select a tag; blank clears the selection ("All")
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = non_blank(tag.into());
        self
    }

    /// Query parameters for the list endpoint, empty values omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.as_str()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.as_str()));
        }
        pairs
    }

    /// Check a prompt against this filter.
    ///
    /// Search is a case-insensitive substring match over name, description and
    /// text. Tag must match a tag name exactly.
    pub fn matches(&self, prompt: &Prompt) -> bool {
        if let Some(tag) = &self.tag {
            if !prompt.has_tag(tag) {
                return false;
            }
        }
        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                let found = |s: &str| s.to_lowercase().contains(&needle);
                found(&prompt.name)
                    || prompt.description.as_deref().is_some_and(|d| found(d))
                    || found(&prompt.text)
            }
            None => true,
        }
    }

    /// Keep only matching prompts, preserving order
    pub fn apply<'a>(&self, prompts: &'a [Prompt]) -> Vec<&'a Prompt> {
        prompts.iter().filter(|p| self.matches(p)).collect()
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Distinct tag names across prompts, in first-seen order
pub fn all_tags(prompts: &[Prompt]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for name in prompts.iter().flat_map(|p| p.tag_names()) {
        if !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
