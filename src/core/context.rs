//! Structured context attached to a log call

use super::value::ContextValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value context of a log call.
///
/// Keys are kept sorted so the serialized form is canonical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: BTreeMap<String, ContextValue>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the context
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.fields.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ContextValue> {
        self.fields.iter()
    }

    /// Deep-merge `overrides` on top of `self`.
    ///
    /// Maps merge by key and lists merge by index, recursively; on any
    /// other collision the value from `overrides` wins.
    #[must_use]
    pub fn merged_with(&self, overrides: &Context) -> Context {
        let mut fields = self.fields.clone();
        for (key, value) in &overrides.fields {
            let merged = match fields.remove(key) {
                Some(base) => merge_values(base, value.clone()),
                None => value.clone(),
            };
            fields.insert(key.clone(), merged);
        }
        Context { fields }
    }

    /// Map every value through `f`, passing the key along
    #[must_use]
    pub fn map_values<F>(self, mut f: F) -> Context
    where
        F: FnMut(&str, ContextValue) -> ContextValue,
    {
        let fields = self
            .fields
            .into_iter()
            .map(|(key, value)| {
                let value = f(&key, value);
                (key, value)
            })
            .collect();
        Context { fields }
    }

    /// Encode as a JSON object, skipping keys rejected by `keep`.
    ///
    /// Returns the empty string when no field is left.
    pub fn serialize_filtered<F>(&self, keep: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .filter(|(key, _)| keep(key))
            .map(|(key, value)| (key.clone(), value.to_json_value()))
            .collect();

        if object.is_empty() {
            String::new()
        } else {
            serde_json::Value::Object(object).to_string()
        }
    }

    /// Encode every field as a JSON object (empty string when empty)
    pub fn serialize(&self) -> String {
        self.serialize_filtered(|_| true)
    }
}

fn merge_values(base: ContextValue, overrides: ContextValue) -> ContextValue {
    match (base, overrides) {
        (ContextValue::Map(mut base), ContextValue::Map(overrides)) => {
            for (key, value) in overrides {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            ContextValue::Map(base)
        }
        (ContextValue::List(mut base), ContextValue::List(overrides)) => {
            for (idx, value) in overrides.into_iter().enumerate() {
                if idx < base.len() {
                    let existing = std::mem::replace(&mut base[idx], ContextValue::Null);
                    base[idx] = merge_values(existing, value);
                } else {
                    base.push(value);
                }
            }
            ContextValue::List(base)
        }
        (_, overrides) => overrides,
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a ContextValue);
    type IntoIter = btree_map::Iter<'a, String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
