//! Prompt records as exchanged with the backend

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Free-form key/value metadata, always string-typed, in insertion order.
///
/// The backend may hand back numbers, booleans or nested values; these are
/// turned into strings on the way in so nothing untyped leaks further.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(Vec<(String, String)>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key at the end, or replace its value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build metadata from arbitrary JSON values
    pub fn from_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        values
            .into_iter()
            .map(|(k, v)| (k, stringify(v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a metadata object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Metadata, M::Error> {
        let mut meta = Metadata::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            meta.insert(key, stringify(value));
        }
        Ok(meta)
    }
}

// Keys are kept in document order
impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// String form of a JSON value: strings as-is, `null` as empty, everything
/// else as compact JSON text.
pub fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

fn first_version() -> u32 {
    1
}

/// A stored prompt with its current text and recorded history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub meta: Option<Metadata>,
    /// Current version number
    #[serde(default = "first_version", deserialize_with = "version_or_first")]
    pub version: u32,
    #[serde(default)]
    pub versions: Vec<PromptVersion>,
}

/// `null` and `0` both mean "first version"
fn version_or_first<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let version = Option::<u32>::deserialize(deserializer)?;
    Ok(version.filter(|v| *v > 0).unwrap_or(1))
}

impl Prompt {
    /// Tag names in stored order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Text of a given version; the current version maps to `text`
    pub fn text_for_version(&self, version: u32) -> Option<&str> {
        if version == self.version {
            return Some(&self.text);
        }
        self.versions
            .iter()
            .find(|v| v.version == version)
            .map(|v| v.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: i64,
    pub prompt_id: i64,
    pub version: u32,
    pub text: String,
    #[serde(default)]
    pub meta: Option<Metadata>,
    pub created_at: String,
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDraft {
    pub name: String,
    pub description: Option<String>,
    pub text: String,
    pub tags: Vec<String>,
    pub meta: Option<Metadata>,
}
