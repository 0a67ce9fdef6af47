//! Prompt catalog: records, list filtering, the edit form and version history

mod filter;
mod form;
mod history;
mod record;

pub use filter::{all_tags, PromptFilter};
pub use form::{FormError, PromptForm};
pub use history::{format_timestamp, history, version_choices, VersionChoice};
pub use record::{stringify, Metadata, Prompt, PromptDraft, PromptVersion, Tag};
