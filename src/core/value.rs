//! Context values and the stringification chain
//!
//! This module provides:
//! - `ContextValue`: the value kinds a log context can carry
//! - `ValueConverter`: one step of the stringification chain
//! - `ValueStringifier`: the ordered, named converter chain

use std::collections::BTreeMap;
use std::fmt;

/// Context key under which exception values keep their message
pub const EXCEPTION_KEY: &str = "exception";

/// Value type for structured context fields
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ContextValue>),
    Map(BTreeMap<String, ContextValue>),
    Object(ObjectValue),
    /// An opaque handle, rendered by its type name
    Resource(String),
    /// An error value, rendered by its message
    Exception(String),
}

/// An arbitrary value captured for logging.
///
/// `text` is its custom textual representation when it has one,
/// `dump` is its debug rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub text: Option<String>,
    pub dump: String,
}

impl ContextValue {
    /// Capture a value that has both a textual and a debug representation
    pub fn display<T: fmt::Display + fmt::Debug + ?Sized>(value: &T) -> Self {
        ContextValue::Object(ObjectValue {
            text: Some(value.to_string()),
            dump: format!("{:?}", value),
        })
    }

    /// Capture a value that only has a debug representation
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        ContextValue::Object(ObjectValue {
            text: None,
            dump: format!("{:?}", value),
        })
    }

    /// Capture a handle by its type name (e.g. `"stream"`)
    pub fn resource(type_name: impl Into<String>) -> Self {
        ContextValue::Resource(type_name.into())
    }

    /// Capture an error by its message
    pub fn exception<E: std::error::Error + ?Sized>(error: &E) -> Self {
        ContextValue::Exception(error.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }

    /// Text used when the value is substituted into a line.
    ///
    /// `Null` renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            ContextValue::Null => String::new(),
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Int(i) => i.to_string(),
            ContextValue::Float(f) => f.to_string(),
            ContextValue::String(s) => s.clone(),
            ContextValue::List(_) | ContextValue::Map(_) => self.debug_dump(),
            ContextValue::Object(obj) => obj.text.clone().unwrap_or_else(|| obj.dump.clone()),
            ContextValue::Resource(name) => name.clone(),
            ContextValue::Exception(message) => message.clone(),
        }
    }

    /// Single-line debug rendering
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        self.write_dump(&mut out);
        strip_line_breaks(&out)
    }

    fn write_dump(&self, out: &mut String) {
        match self {
            ContextValue::Null => out.push_str("null"),
            ContextValue::String(s) => out.push_str(&format!("{:?}", s)),
            ContextValue::List(items) => {
                out.push('[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    item.write_dump(out);
                }
                out.push(']');
            }
            ContextValue::Map(map) => {
                out.push('{');
                for (idx, (key, item)) in map.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!("{:?}: ", key));
                    item.write_dump(out);
                }
                out.push('}');
            }
            ContextValue::Object(obj) => out.push_str(&obj.dump),
            other => out.push_str(&other.to_text()),
        }
    }

    /// Convert to serde_json::Value for context serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            ContextValue::Null => serde_json::Value::Null,
            ContextValue::Bool(b) => serde_json::Value::Bool(*b),
            ContextValue::Int(i) => serde_json::Value::Number((*i).into()),
            ContextValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ContextValue::String(s) => serde_json::Value::String(s.clone()),
            ContextValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ContextValue::to_json_value).collect())
            }
            ContextValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json_value()))
                    .collect(),
            ),
            other => serde_json::Value::String(other.to_text()),
        }
    }
}

fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<u32> for ContextValue {
    fn from(i: u32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        ContextValue::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(items: Vec<T>) -> Self {
        ContextValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ContextValue::Null)
    }
}

impl From<BTreeMap<String, ContextValue>> for ContextValue {
    fn from(map: BTreeMap<String, ContextValue>) -> Self {
        ContextValue::Map(map)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContextValue::Null,
            serde_json::Value::Bool(b) => ContextValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ContextValue::Int(i),
                None => ContextValue::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => ContextValue::String(s),
            serde_json::Value::Array(items) => {
                ContextValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => ContextValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

/// One step of the stringification chain.
///
/// A converter returns values it does not recognize unchanged. `key` is the
/// context key the value is stored under, or `None` for the message text.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, value: ContextValue, key: Option<&str>) -> ContextValue;
}

impl<F> ValueConverter for F
where
    F: Fn(ContextValue, Option<&str>) -> ContextValue + Send + Sync,
{
    fn convert(&self, value: ContextValue, key: Option<&str>) -> ContextValue {
        self(value, key)
    }
}

fn sequence_to_string(value: ContextValue, _key: Option<&str>) -> ContextValue {
    match value {
        ContextValue::List(_) | ContextValue::Map(_) => ContextValue::String(value.debug_dump()),
        other => other,
    }
}

fn object_to_string(value: ContextValue, _key: Option<&str>) -> ContextValue {
    match value {
        ContextValue::Object(obj) => match obj.text {
            Some(text) => ContextValue::String(text),
            None => ContextValue::String(strip_line_breaks(&obj.dump)),
        },
        other => other,
    }
}

fn bool_to_string(value: ContextValue, _key: Option<&str>) -> ContextValue {
    match value {
        ContextValue::Bool(b) => ContextValue::String(b.to_string()),
        other => other,
    }
}

fn resource_to_type_name(value: ContextValue, _key: Option<&str>) -> ContextValue {
    match value {
        ContextValue::Resource(name) => ContextValue::String(name),
        other => other,
    }
}

fn exception_to_message(value: ContextValue, key: Option<&str>) -> ContextValue {
    match value {
        ContextValue::Exception(message) => match key {
            Some(key) if key != EXCEPTION_KEY => ContextValue::Null,
            _ => ContextValue::String(message),
        },
        other => other,
    }
}

/// Ordered chain of named converters.
///
/// Each converter sees the output of the previous one, so order matters.
/// The default chain is `array`, `object`, `bool`, `resource`, `exception`.
pub struct ValueStringifier {
    converters: Vec<(String, Box<dyn ValueConverter>)>,
}

impl ValueStringifier {
    pub fn new() -> Self {
        let mut chain = Self::empty();
        chain.set("array", sequence_to_string);
        chain.set("object", object_to_string);
        chain.set("bool", bool_to_string);
        chain.set("resource", resource_to_type_name);
        chain.set("exception", exception_to_message);
        chain
    }

    /// A chain with no converters
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Register a converter; an existing name is replaced in place,
    /// a new name is appended.
    pub fn set<C: ValueConverter + 'static>(&mut self, name: impl Into<String>, converter: C) {
        let name = name.into();
        let converter: Box<dyn ValueConverter> = Box::new(converter);
        match self.converters.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = converter,
            None => self.converters.push((name, converter)),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.converters.len();
        self.converters.retain(|(n, _)| n != name);
        self.converters.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.converters.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Run `value` through every converter in order
    pub fn stringify(&self, value: ContextValue, key: Option<&str>) -> ContextValue {
        self.converters
            .iter()
            .fold(value, |value, (_, converter)| converter.convert(value, key))
    }
}

impl Default for ValueStringifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValueStringifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStringifier")
            .field("converters", &self.names())
            .finish()
    }
}
