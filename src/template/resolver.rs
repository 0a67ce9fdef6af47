//! Placeholder extraction, variable reconciliation and rendering

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// `{{name}}` where name is one or more ASCII word characters.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern should be valid")
});

/// Check whether `name` is acceptable as a placeholder name
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// What to substitute for a placeholder that has no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValue {
    /// Replace with the empty string
    #[default]
    Empty,
    /// Leave `{{name}}` in the output untouched
    Verbatim,
}

/// Anything that can supply a value for a placeholder name
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl VariableSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Ordered mapping from placeholder name to its current value.
///
/// Iteration follows insertion order, which after [`reconcile`] is the order in
/// which names first appear in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    entries: Vec<(String, String)>,
}

impl VariableSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Update the value of an existing name.
    ///
    /// Returns `false` and leaves the set unchanged if the name is not present;
    /// the key set only changes through reconciliation.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// Insert a name, or replace its value in place if already present
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VariableSource for VariableSet {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl<K, V> FromIterator<(K, V)> for VariableSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = VariableSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for VariableSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Extract the distinct placeholder names of a template, in first-use order.
///
/// Text that does not form a complete `{{name}}` with a word-character name is
/// ignored, so this never fails.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Rebuild a variable set for `names`, carrying over values from `previous`.
///
/// Names missing from `previous` start empty; entries of `previous` that are
/// not in `names` are dropped.
pub fn reconcile<S: VariableSource + ?Sized>(names: &[String], previous: &S) -> VariableSet {
    names
        .iter()
        .map(|name| {
            let value = previous.lookup(name).unwrap_or_default();
            (name.clone(), value.to_string())
        })
        .collect()
}

/// Extract and reconcile in one step: the variable set a host should show
/// after `template` changed.
pub fn resolve_variables<S: VariableSource + ?Sized>(template: &str, previous: &S) -> VariableSet {
    reconcile(&extract_placeholders(template), previous)
}

/// Render a template, substituting the empty string for missing values
pub fn render<S: VariableSource + ?Sized>(template: &str, values: &S) -> String {
    render_with(template, values, MissingValue::Empty)
}

/// Render a template with an explicit policy for missing values
pub fn render_with<S: VariableSource + ?Sized>(
    template: &str,
    values: &S,
    missing: MissingValue,
) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match values.lookup(&caps[1]) {
            Some(value) => value.to_string(),
            None => match missing {
                MissingValue::Empty => String::new(),
                MissingValue::Verbatim => caps[0].to_string(),
            },
        })
        .into_owned()
}
