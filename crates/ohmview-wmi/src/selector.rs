// ── Selector mapping and key filtering ──
//
// A selector is the ordered attribute-name → value mapping used to locate
// instances of a class. Filtering it down to a class's static-attribute
// names is an invariant of the lookup path, not a validation step: unknown
// keys are silently dropped.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// An ordered attribute-name → value mapping used to locate instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    entries: IndexMap<String, Value>,
}

impl Selector {
    /// An empty selector (matches every instance of a class).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the entries whose key appears in `allowed`.
    ///
    /// The result is ordered by `allowed` (the permitted-key list), not by
    /// this selector's insertion order. Pure; an empty result is valid.
    pub fn filtered(&self, allowed: &[&str]) -> Selector {
        allowed
            .iter()
            .filter_map(|key| {
                self.entries
                    .get_key_value(*key)
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect()
    }

    /// Stable identity of this selector, used as the instance-cache key.
    ///
    /// Two selectors that filter down to the same entries in the same order
    /// produce the same key.
    pub fn key(&self) -> SelectorKey {
        let mut canonical = String::new();
        for (name, value) in &self.entries {
            canonical.push_str(name);
            canonical.push('=');
            canonical.push_str(&value.to_string());
            canonical.push(';');
        }
        SelectorKey(canonical)
    }
}

impl FromIterator<(String, Value)> for Selector {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Opaque, hashable identity of a filtered selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorKey(String);

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
