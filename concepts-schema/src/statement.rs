//! Parametrized graph statements.
//!
//! A [`Statement`] is a pure value: Cypher text plus named parameters. Data
//! always travels as parameters — only schema-derived fragments (labels,
//! property names) are rendered into the text, which keeps the compiled text
//! stable for a fixed schema and lets fixtures compare it byte-for-byte.
use std::collections::BTreeMap;

/// A parameter value, driver-agnostic. The store backend converts these to
/// its own wire types.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Bool(bool),
    StringList(Vec<String>),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::StringList(value)
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(value: BTreeMap<String, ParamValue>) -> Self {
        ParamValue::Map(value)
    }
}

/// One parametrized statement of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Convenience lookup for string parameters.
    pub fn string_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(ParamValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}
