//! Prompt Hub - tooling for a catalog of prompt templates
//!
//! This library provides template resolution for `{{name}}` placeholders, typed
//! prompt records, a model catalog, the side-by-side playground state and a
//! client for the prompt hub backend.
//!
//! # Example
//!
//! ```rust
//! use prompt_hub::{extract_placeholders, render, resolve_variables, VariableSet};
//!
//! let text = "Translate {{text}} into {{language}}.";
//! assert_eq!(extract_placeholders(text), vec!["text", "language"]);
//!
//! let mut vars = resolve_variables(text, &VariableSet::new());
//! vars.set("text", "bonjour");
//! vars.set("language", "English");
//! assert_eq!(render(text, &vars), "Translate bonjour into English.");
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod playground;
pub mod template;

pub use catalog::{Metadata, Prompt, PromptDraft, PromptFilter, PromptForm, PromptVersion, Tag};
pub use client::{ApiClient, ApiError, PromptApi};
pub use config::{ConfigError, ConsoleConfig};
pub use console::{Console, Notice, NoticeLog, NoticeSink, Severity};
pub use error::ConsoleError;
pub use models::{ModelCatalog, ModelInfo};
pub use playground::{
    PanelResponses, Playground, PlaygroundError, PlaygroundRequest, PlaygroundResponse,
};
pub use template::{
    extract_placeholders, reconcile, render, render_with, resolve_variables, MissingValue,
    VariableSet,
};
