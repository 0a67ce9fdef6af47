//! Template resolution for prompt text
//!
//! A template is plain text with `{{name}}` placeholders. Names are restricted to
//! ASCII letters, digits and underscore; anything else between double braces is
//! ordinary text and is left alone by rendering (see [`lint`] to report it).
//!
//! # Example
//!
//! ```rust
//! use prompt_hub::template::{extract_placeholders, reconcile, render, VariableSet};
//!
//! let text = "Summarize {{topic}} for {{audience}}.";
//! let names = extract_placeholders(text);
//! let mut vars = reconcile(&names, &VariableSet::new());
//! vars.set("topic", "ownership");
//!
//! assert_eq!(render(text, &vars), "Summarize ownership for .");
//! ```

pub mod lint;
mod resolver;

pub use lint::{LintCategory, LintWarning};
pub use resolver::{
    extract_placeholders, is_valid_name, reconcile, render, render_with, resolve_variables,
    MissingValue, VariableSet, VariableSource,
};
