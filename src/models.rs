//! Model catalog for the playground panels
//!
//! The backend's model listing endpoint returns loosely shaped JSON. This
//! module turns whatever it sends into a flat list of [`ModelInfo`], filling
//! display fields from a built-in table for well-known models.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::stringify;

pub const DEFAULT_LEFT_MODEL: &str = "openai/gpt-4";
pub const DEFAULT_RIGHT_MODEL: &str = "anthropic/claude-3-opus";

/// Display information for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// `provider/model` identifier
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
    pub context_window: String,
    pub input_price: String,
    pub output_price: String,
}

impl ModelInfo {
    /// `Provider / Name`
    pub fn label(&self) -> String {
        format!("{} / {}", self.provider, self.name)
    }
}

// (id, name, provider, description, context window, input price, output price)
const BUILTIN: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    (
        "openai/gpt-4",
        "GPT-4",
        "OpenAI",
        "Most capable GPT-4 model, better at complex tasks and produces higher quality outputs.",
        "8,192 tokens",
        "$0.03 / 1K tokens",
        "$0.06 / 1K tokens",
    ),
    (
        "openai/gpt-3.5-turbo",
        "GPT-3.5 Turbo",
        "OpenAI",
        "Fast, inexpensive model for simple tasks. Great for quick iterations and testing.",
        "16,385 tokens",
        "$0.0005 / 1K tokens",
        "$0.0015 / 1K tokens",
    ),
    (
        "anthropic/claude-3-opus",
        "Claude 3 Opus",
        "Anthropic",
        "Most powerful Claude model, excelling at complex analysis, coding, and creative tasks.",
        "200,000 tokens",
        "$0.015 / 1K tokens",
        "$0.075 / 1K tokens",
    ),
    (
        "anthropic/claude-3-sonnet",
        "Claude 3 Sonnet",
        "Anthropic",
        "Balanced performance and speed. Ideal for enterprise workloads and scaled deployments.",
        "200,000 tokens",
        "$0.003 / 1K tokens",
        "$0.015 / 1K tokens",
    ),
    (
        "google/gemini-pro",
        "Gemini Pro",
        "Google",
        "Google's most capable model with multimodal understanding and generation capabilities.",
        "32,768 tokens",
        "$0.00025 / 1K tokens",
        "$0.0005 / 1K tokens",
    ),
    (
        "meta/llama-2-70b",
        "Llama 2 70B",
        "Meta",
        "Open-source model with strong performance across various tasks. Great for self-hosting.",
        "4,096 tokens",
        "$0.0007 / 1K tokens",
        "$0.0009 / 1K tokens",
    ),
];

fn builtin_info(id: &str) -> Option<ModelInfo> {
    BUILTIN.iter().find(|m| m.0 == id).map(
        |&(id, name, provider, description, context_window, input_price, output_price)| {
            ModelInfo {
                id: id.to_string(),
                name: name.to_string(),
                provider: provider.to_string(),
                description: description.to_string(),
                context_window: context_window.to_string(),
                input_price: input_price.to_string(),
                output_price: output_price.to_string(),
            }
        },
    )
}

/// Display name for a provider key
fn provider_display(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "openai" => "OpenAI".to_string(),
        "anthropic" => "Anthropic".to_string(),
        "google" => "Google".to_string(),
        "meta" => "Meta".to_string(),
        "mistral" => "Mistral".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Fields read from an upstream entry, any of which may be absent
#[derive(Debug, Default)]
struct PartialInfo {
    name: Option<String>,
    provider: Option<String>,
    description: Option<String>,
    context_window: Option<String>,
    input_price: Option<String>,
    output_price: Option<String>,
}

impl PartialInfo {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            name: field(obj, &["name", "display_name", "displayName"]),
            provider: field(obj, &["provider"]),
            description: field(obj, &["description"]),
            context_window: field(
                obj,
                &["context_window", "contextWindow", "context_length"],
            ),
            input_price: field(obj, &["input_price", "inputPrice"]),
            output_price: field(obj, &["output_price", "outputPrice"]),
        }
    }

    /// Complete the entry from the built-in table, then from the id itself
    fn complete(self, id: String) -> ModelInfo {
        let builtin = builtin_info(&id);
        let (prefix, suffix) = match id.split_once('/') {
            Some((p, s)) => (Some(p), s),
            None => (None, id.as_str()),
        };

        let name = self
            .name
            .or_else(|| builtin.as_ref().map(|b| b.name.clone()))
            .unwrap_or_else(|| suffix.to_string());
        let provider = self
            .provider
            .or_else(|| builtin.as_ref().map(|b| b.provider.clone()))
            .or_else(|| prefix.map(provider_display))
            .unwrap_or_default();

        let b = builtin.as_ref();
        let description = self
            .description
            .or_else(|| b.map(|b| b.description.clone()))
            .unwrap_or_default();
        let context_window = self
            .context_window
            .or_else(|| b.map(|b| b.context_window.clone()))
            .unwrap_or_default();
        let input_price = self
            .input_price
            .or_else(|| b.map(|b| b.input_price.clone()))
            .unwrap_or_default();
        let output_price = self
            .output_price
            .or_else(|| b.map(|b| b.output_price.clone()))
            .unwrap_or_default();

        ModelInfo {
            id,
            name,
            provider,
            description,
            context_window,
            input_price,
            output_price,
        }
    }
}

/// First present, non-null key, stringified
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
        .map(|v| stringify(v.clone()))
}

/// `provider/id` unless the id is already qualified
fn qualify(provider: Option<&str>, id: &str) -> String {
    match provider {
        Some(p) if !id.contains('/') => format!("{}/{}", p.to_ascii_lowercase(), id),
        _ => id.to_string(),
    }
}

/// Ordered, de-duplicated list of models
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

impl ModelCatalog {
    /// The built-in table of well-known models
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN
                .iter()
                .filter_map(|m| builtin_info(m.0))
                .collect(),
        }
    }

    /// Normalize a model listing from the backend.
    ///
    /// Accepted shapes: an object of provider to array of names or objects, an
    /// object of model id to object or name, a top-level array, or any of these
    /// wrapped in `{"models": ...}`. Unrecognized values are skipped.
    pub fn from_response(value: &Value) -> Self {
        let mut catalog = Self::default();
        catalog.collect(value, None);
        catalog
    }

    fn collect(&mut self, value: &Value, provider: Option<&str>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.collect_entry(None, item, provider);
                }
            }
            Value::Object(map) => {
                if let (1, Some(inner)) = (map.len(), map.get("models")) {
                    self.collect(inner, provider);
                    return;
                }
                for (key, v) in map {
                    match v {
                        Value::Array(items) => {
                            for item in items {
                                self.collect_entry(None, item, Some(key.as_str()));
                            }
                        }
                        _ => self.collect_entry(Some(key.as_str()), v, provider),
                    }
                }
            }
            _ => {}
        }
    }

    fn collect_entry(&mut self, key: Option<&str>, item: &Value, provider: Option<&str>) {
        let (id, partial) = match item {
            Value::String(s) => match key {
                // id -> display name
                Some(k) => (
                    k.to_string(),
                    PartialInfo {
                        name: Some(s.clone()),
                        ..PartialInfo::default()
                    },
                ),
                None => (s.clone(), PartialInfo::default()),
            },
            Value::Object(obj) => {
                let id = key
                    .map(str::to_string)
                    .or_else(|| field(obj, &["id", "model", "name"]));
                match id {
                    Some(id) => (id, PartialInfo::from_object(obj)),
                    None => return,
                }
            }
            _ => match key {
                Some(k) => (k.to_string(), PartialInfo::default()),
                None => return,
            },
        };

        let id = qualify(provider, &id);
        if id.is_empty() || self.contains(&id) {
            return;
        }
        self.models.push(partial.complete(id));
    }

    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// `Provider / Name` for a known model, the id otherwise
    pub fn label(&self, id: &str) -> String {
        self.get(id)
            .map(ModelInfo::label)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelInfo> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
