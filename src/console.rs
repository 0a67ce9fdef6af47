//! Console operations with user-facing notices
//!
//! Each operation talks to the backend through a [`PromptApi`] and reports the
//! outcome as a [`Notice`] to a sink supplied by the front end. Operations that
//! change the catalog return `true` on success so the caller knows to reload
//! its list.

use std::fmt;

use tracing::{debug, info, warn};

use crate::catalog::{Prompt, PromptFilter, PromptForm};
use crate::client::{ApiError, PromptApi};
use crate::models::ModelCatalog;
use crate::playground::{PanelResponses, Playground};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A short message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Receiver of notices
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

impl<F: FnMut(Notice)> NoticeSink for F {
    fn notify(&mut self, notice: Notice) {
        self(notice)
    }
}

/// Sink that keeps every notice
#[derive(Debug, Default)]
pub struct NoticeLog {
    pub notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(Notice::is_error)
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

pub struct Console<A, S> {
    api: A,
    sink: S,
}

impl<A: PromptApi, S: NoticeSink> Console<A, S> {
    pub fn new(api: A, sink: S) -> Self {
        Self { api, sink }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn fail(&mut self, description: &str, err: &ApiError) {
        warn!(error = %err, "{}", description);
        self.sink.notify(Notice::error(description));
    }

    /// Fetch the prompt list. Failures yield an empty list and an error notice.
    pub fn load_prompts(&mut self, filter: &PromptFilter) -> Vec<Prompt> {
        match self.api.list_prompts(filter) {
            Ok(prompts) => prompts,
            Err(e) => {
                self.fail("Failed to load prompts", &e);
                Vec::new()
            }
        }
    }

    /// Create a prompt, or update `editing` when given
    pub fn save(&mut self, form: &PromptForm, editing: Option<i64>) -> Option<Prompt> {
        let verb = if editing.is_some() { "update" } else { "create" };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "invalid prompt form");
                self.sink.notify(Notice::error(e.to_string()));
                return None;
            }
        };

        let result = match editing {
            Some(id) => self.api.update_prompt(id, &draft),
            None => self.api.create_prompt(&draft),
        };
        match result {
            Ok(prompt) => {
                info!(id = prompt.id, "prompt {}d", verb);
                self.sink.notify(Notice::success(
                    "Success",
                    format!("Prompt {}d successfully", verb),
                ));
                Some(prompt)
            }
            Err(e) => {
                self.fail(&format!("Failed to {} prompt", verb), &e);
                None
            }
        }
    }

    pub fn delete(&mut self, id: i64) -> bool {
        match self.api.delete_prompt(id) {
            Ok(()) => {
                info!(id, "prompt deleted");
                self.sink
                    .notify(Notice::success("Success", "Prompt deleted successfully"));
                true
            }
            Err(e) => {
                self.fail("Failed to delete prompt", &e);
                false
            }
        }
    }

    pub fn seed(&mut self) -> bool {
        match self.api.seed() {
            Ok(()) => {
                self.sink.notify(Notice::success(
                    "Database seeded",
                    "Sample prompts have been added to the database.",
                ));
                true
            }
            Err(e) => {
                self.fail("Failed to seed database", &e);
                false
            }
        }
    }

    /// Backend model listing, or the built-in table if it cannot be fetched
    pub fn models(&mut self) -> ModelCatalog {
        match self.api.available_models() {
            Ok(value) => catalog_or_builtin(&value),
            Err(e) => {
                self.fail("Failed to fetch available models", &e);
                ModelCatalog::builtin()
            }
        }
    }

    /// Like [`Console::models`] but without a notice on failure, for labels
    pub fn known_models(&self) -> ModelCatalog {
        match self.api.available_models() {
            Ok(value) => catalog_or_builtin(&value),
            Err(e) => {
                debug!(error = %e, "using built-in model table");
                ModelCatalog::builtin()
            }
        }
    }

    /// Send the playground's current selection to the backend
    pub fn run_playground(&mut self, playground: &Playground) -> Option<PanelResponses> {
        let request = match playground.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.sink.notify(Notice::error(e.to_string()));
                return None;
            }
        };
        match self.api.test_playground(&request) {
            Ok(response) => Some(playground.distribute(&response)),
            Err(e) => {
                self.fail("Failed to test prompt", &e);
                None
            }
        }
    }
}

fn catalog_or_builtin(value: &serde_json::Value) -> ModelCatalog {
    let catalog = ModelCatalog::from_response(value);
    if catalog.is_empty() {
        ModelCatalog::builtin()
    } else {
        catalog
    }
}
