//! Runtime values for the validator evaluator.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::transforms::emit_utils::{format_number, quote_string};
use crate::transforms::ir::IRNode;

/// A JavaScript value as seen by generated validators.
///
/// Arrays and objects are reference-counted so that `===` can compare
/// identity the way JavaScript does.
#[derive(Debug, Clone)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<JsValue>>),
    Object(Rc<IndexMap<String, JsValue>>),
    Function(Rc<JsFunction>),
}

/// Callable values.
#[derive(Debug)]
pub enum JsFunction {
    /// A top-level `function name(...)` declaration.
    Declared(String),
    /// A function expression. Generated closures only reference globals, so
    /// no environment is captured.
    Closure {
        params: Vec<String>,
        body: Vec<IRNode>,
    },
    Builtin(Builtin),
    /// A method looked up on a receiver, e.g. `path.concat`.
    Method { receiver: JsValue, method: Method },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// The `Array` global.
    ArrayConstructor,
    /// The `Object` global.
    ObjectConstructor,
    /// The `Error` global.
    ErrorConstructor,
    IsArray,
    ObjectKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Join,
    Concat,
    IndexOf,
}

impl JsValue {
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    pub fn array(items: Vec<Self>) -> Self {
        Self::Array(Rc::new(items))
    }

    pub fn object(entries: IndexMap<String, Self>) -> Self {
        Self::Object(Rc::new(entries))
    }

    pub(crate) fn function(f: JsFunction) -> Self {
        Self::Function(Rc::new(f))
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Result of the `typeof` operator.
    pub const fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Array(_) | Self::Object(_) => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Function(_) => true,
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// String conversion used by `+` and `Array.prototype.join`.
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.to_string(),
            Self::Array(items) => join_values(items, ","),
            Self::Object(_) => "[object Object]".to_string(),
            Self::Function(_) => "function".to_string(),
        }
    }

    /// Named property of an object value, if present.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// `key in value`
    pub fn has_key(&self, key: &str) -> Option<bool> {
        match self {
            Self::Object(map) => Some(map.contains_key(key)),
            Self::Array(items) => Some(
                key == "length"
                    || key
                        .parse::<usize>()
                        .is_ok_and(|i| i < items.len() && i.to_string() == key),
            ),
            _ => None,
        }
    }

    /// Convert back to JSON. `undefined` and functions have no JSON form and
    /// become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null | Self::Function(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.to_string()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

pub(crate) fn join_values(items: &[JsValue], separator: &str) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        if !matches!(item, JsValue::Undefined | JsValue::Null) {
            out.push_str(&item.to_js_string());
        }
    }
    out
}

impl From<&serde_json::Value> for JsValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::string(s),
            serde_json::Value::Array(items) => Self::array(items.iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => Self::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for JsValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<f64> for JsValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for JsValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&quote_string(s)),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {v}", quote_string(k))?;
                }
                f.write_str(if map.is_empty() { "}" } else { " }" })
            }
            other => f.write_str(&other.to_js_string()),
        }
    }
}
