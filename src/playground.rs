//! Side-by-side playground state
//!
//! Holds the selected prompt and version, the two model panels and the
//! variable set. The variable set is recomputed from the selected text every
//! time the selection changes, keeping values for names that survive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::Prompt;
use crate::config::PlaygroundConfig;
use crate::template::{extract_placeholders, reconcile, render_with, MissingValue, VariableSet};

/// Errors from playground operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaygroundError {
    /// No prompt has been selected yet
    #[error("Please select a prompt")]
    NoPromptSelected,

    /// The selected prompt has no such version
    #[error("prompt '{prompt}' has no version {version}")]
    UnknownVersion { prompt: String, version: u32 },
}

/// Body of a playground test request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaygroundRequest {
    pub prompt_id: i64,
    /// `None` means the current version
    pub version: Option<u32>,
    pub models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableSet>,
}

/// Model outputs keyed by model id
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaygroundResponse {
    #[serde(default)]
    pub responses: HashMap<String, String>,
}

/// What each panel should display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelResponses {
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Playground {
    prompt: Option<Prompt>,
    version: Option<u32>,
    pub left_model: String,
    pub right_model: String,
    /// When set, only the left model is queried and both panels show its answer
    pub sync: bool,
    variables: VariableSet,
    missing: MissingValue,
}

impl Playground {
    pub fn new(config: &PlaygroundConfig) -> Self {
        Self {
            prompt: None,
            version: None,
            left_model: config.left_model.clone(),
            right_model: config.right_model.clone(),
            sync: config.sync,
            variables: VariableSet::new(),
            missing: MissingValue::default(),
        }
    }

    /// Set the policy used by [`Playground::preview`]
    pub fn with_missing(mut self, missing: MissingValue) -> Self {
        self.missing = missing;
        self
    }

    /// Select a prompt at its current version
    pub fn select_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.version = None;
        self.refresh_variables();
    }

    /// Select a specific version of the selected prompt
    pub fn select_version(&mut self, version: u32) -> Result<(), PlaygroundError> {
        let prompt = self
            .prompt
            .as_ref()
            .ok_or(PlaygroundError::NoPromptSelected)?;
        if prompt.text_for_version(version).is_none() {
            return Err(PlaygroundError::UnknownVersion {
                prompt: prompt.name.clone(),
                version,
            });
        }
        self.version = if version == prompt.version {
            None
        } else {
            Some(version)
        };
        self.refresh_variables();
        Ok(())
    }

    pub fn selected_prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn selected_version(&self) -> Option<u32> {
        self.version
    }

    /// Text of the selected prompt at the selected version
    pub fn template(&self) -> Option<&str> {
        let prompt = self.prompt.as_ref()?;
        match self.version {
            Some(v) => prompt.text_for_version(v),
            None => Some(&prompt.text),
        }
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// Edit one variable. Unknown names are ignored.
    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.variables.set(name, value)
    }

    fn refresh_variables(&mut self) {
        let names = self.template().map(extract_placeholders).unwrap_or_default();
        self.variables = reconcile(&names, &self.variables);
        debug!(
            variables = ?self.variables.names().collect::<Vec<_>>(),
            "recomputed playground variables"
        );
    }

    /// The selected text with current values substituted
    pub fn preview(&self) -> Option<String> {
        self.template()
            .map(|t| render_with(t, &self.variables, self.missing))
    }

    /// Models to query for the current sync setting
    pub fn models(&self) -> Vec<String> {
        if self.sync {
            vec![self.left_model.clone()]
        } else {
            vec![self.left_model.clone(), self.right_model.clone()]
        }
    }

    pub fn build_request(&self) -> Result<PlaygroundRequest, PlaygroundError> {
        let prompt = self
            .prompt
            .as_ref()
            .ok_or(PlaygroundError::NoPromptSelected)?;

        Ok(PlaygroundRequest {
            prompt_id: prompt.id,
            version: self.version,
            models: self.models(),
            variables: if self.variables.is_empty() {
                None
            } else {
                Some(self.variables.clone())
            },
        })
    }

    /// Split a response across the two panels
    pub fn distribute(&self, response: &PlaygroundResponse) -> PanelResponses {
        let left = response.responses.get(&self.left_model).cloned();
        if self.sync {
            PanelResponses {
                right: left.clone(),
                left,
            }
        } else {
            PanelResponses {
                left,
                right: response.responses.get(&self.right_model).cloned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PromptVersion;
    use crate::config::ConsoleConfig;
    use pretty_assertions::assert_eq;

    fn prompt() -> Prompt {
        Prompt {
            id: 5,
            name: "letter".into(),
            description: None,
            text: "Dear {{name}}, about {{topic}}".into(),
            tags: vec![],
            meta: None,
            version: 2,
            versions: vec![PromptVersion {
                id: 50,
                prompt_id: 5,
                version: 1,
                text: "Hi {{name}}".into(),
                meta: None,
                created_at: "2024-01-01T00:00:00".into(),
            }],
        }
    }

    fn playground() -> Playground {
        Playground::new(&ConsoleConfig::default().playground)
    }

    #[test]
    fn test_select_prompt_extracts_variables() {
        let mut pg = playground();
        pg.select_prompt(prompt());
        assert_eq!(pg.variables().names().collect::<Vec<_>>(), vec!["name", "topic"]);
        assert!(pg.variables().iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_version_switch_keeps_shared_values() {
        let mut pg = playground();
        pg.select_prompt(prompt());
        pg.set_variable("name", "Ada");
        pg.set_variable("topic", "engines");

        pg.select_version(1).unwrap();
        assert_eq!(pg.selected_version(), Some(1));
        assert_eq!(pg.variables().iter().collect::<Vec<_>>(), vec![("name", "Ada")]);
        assert_eq!(pg.preview().as_deref(), Some("Hi Ada"));

        pg.select_version(2).unwrap();
        assert_eq!(pg.selected_version(), None);
        assert_eq!(pg.variables().get("topic"), Some(""));
    }

    #[test]
    fn test_unknown_version() {
        let mut pg = playground();
        assert_eq!(pg.select_version(1), Err(PlaygroundError::NoPromptSelected));
        pg.select_prompt(prompt());
        assert!(matches!(
            pg.select_version(9),
            Err(PlaygroundError::UnknownVersion { version: 9, .. })
        ));
    }

    #[test]
    fn test_set_variable_ignores_unknown() {
        let mut pg = playground();
        pg.select_prompt(prompt());
        assert!(!pg.set_variable("nope", "x"));
        assert_eq!(pg.variables().len(), 2);
    }

    #[test]
    fn test_build_request_requires_prompt() {
        assert_eq!(
            playground().build_request(),
            Err(PlaygroundError::NoPromptSelected)
        );
    }

    #[test]
    fn test_build_request_synced() {
        let mut pg = playground();
        pg.select_prompt(prompt());
        pg.set_variable("name", "Ada");
        let request = pg.build_request().unwrap();
        assert_eq!(request.models, vec!["openai/gpt-4"]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt_id": 5,
                "version": null,
                "models": ["openai/gpt-4"],
                "variables": {"name": "Ada", "topic": ""}
            })
        );
    }

    #[test]
    fn test_build_request_omits_empty_variables() {
        let mut pg = playground();
        let mut p = prompt();
        p.text = "static".into();
        pg.select_prompt(p);
        pg.sync = false;
        let json = serde_json::to_value(pg.build_request().unwrap()).unwrap();
        assert!(json.get("variables").is_none());
        assert_eq!(
            json["models"],
            serde_json::json!(["openai/gpt-4", "anthropic/claude-3-opus"])
        );
    }

    #[test]
    fn test_distribute_synced_mirrors_left() {
        let pg = playground();
        let response = PlaygroundResponse {
            responses: [("openai/gpt-4".to_string(), "hello".to_string())]
                .into_iter()
                .collect(),
        };
        let panels = pg.distribute(&response);
        assert_eq!(panels.left.as_deref(), Some("hello"));
        assert_eq!(panels.right.as_deref(), Some("hello"));
    }

    #[test]
    fn test_distribute_unsynced() {
        let mut pg = playground();
        pg.sync = false;
        let response = PlaygroundResponse {
            responses: [
                ("openai/gpt-4".to_string(), "a".to_string()),
                ("anthropic/claude-3-opus".to_string(), "b".to_string()),
            ]
            .into_iter()
            .collect(),
        };
        assert_eq!(
            pg.distribute(&response),
            PanelResponses {
                left: Some("a".into()),
                right: Some("b".into()),
            }
        );
    }

    #[test]
    fn test_preview_uses_missing_policy() {
        let mut pg = playground().with_missing(MissingValue::Verbatim);
        pg.select_prompt(prompt());
        pg.set_variable("name", "Ada");
        assert_eq!(pg.preview().as_deref(), Some("Dear Ada, about {{topic}}"));
    }
}
