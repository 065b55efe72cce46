use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One result row, keyed by column or property name.
pub type Record = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
    /// Date, time, datetime and duration values, kept as text
    Temporal { kind: String, text: String },
    /// 2D and 3D points
    Spatial { kind: String, text: String },
    Bytes(usize),
    /// Nodes, relationships and paths returned where a property was expected
    Graph(String),
}

impl PropertyValue {
    /// Name used for best-effort property type inference.
    pub fn type_name(&self) -> String {
        match self {
            PropertyValue::Null => "Null".to_string(),
            PropertyValue::Boolean(_) => "Boolean".to_string(),
            PropertyValue::Integer(_) => "Integer".to_string(),
            PropertyValue::Float(_) => "Float".to_string(),
            PropertyValue::String(_) => "String".to_string(),
            PropertyValue::List(items) => {
                let mut element_types = items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(PropertyValue::type_name);
                match element_types.next() {
                    Some(first) if element_types.all(|t| t == first) => format!("List<{first}>"),
                    _ => "List".to_string(),
                }
            }
            PropertyValue::Map(_) => "Map".to_string(),
            PropertyValue::Temporal { kind, .. } | PropertyValue::Spatial { kind, .. } => {
                kind.clone()
            }
            PropertyValue::Bytes(_) => "Bytes".to_string(),
            PropertyValue::Graph(kind) => kind.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            PropertyValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// String elements of a list value; non-string elements are skipped.
    pub fn string_list(&self) -> Vec<String> {
        match self {
            PropertyValue::List(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            PropertyValue::String(s) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn into_map(self) -> Option<BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Boolean(b) => write!(f, "{b}"),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::List(_) | PropertyValue::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            PropertyValue::Temporal { text, .. } | PropertyValue::Spatial { text, .. } => {
                f.write_str(text)
            }
            PropertyValue::Bytes(len) => write!(f, "<{len} bytes>"),
            PropertyValue::Graph(kind) => write!(f, "<{kind}>"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}
