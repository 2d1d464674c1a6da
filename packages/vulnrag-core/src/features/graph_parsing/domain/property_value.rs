//! Property values and vertex identifiers
//!
//! Graph documents wrap most values in typed envelopes
//! (`{"@type": "g:Int64", "@value": 3}`) and store vertex properties as
//! single-element lists. Values are kept as decoded; [`PropertyValue::unwrap_envelopes`]
//! produces the plain value callers actually want.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::shared::constants::graph::MAX_ENVELOPE_DEPTH;

const ENVELOPE_VALUE: &str = "@value";

/// Leaf value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Property value as found in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(Scalar),
    List(Vec<PropertyValue>),
    Nested(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Convert a decoded JSON value, preserving envelopes
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Scalar(Scalar::Int(i)),
                None => Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Self::Scalar(Scalar::Str(s.clone())),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Nested(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Peel envelopes and collapse singleton lists.
    ///
    /// - `{"@value": x}` is replaced by `x`, at most 3 levels deep
    /// - a one-element list becomes its element
    /// - a vertex-property record (`{"id", "value", "label"}`) becomes its `value`
    ///
    /// Longer lists are kept as lists with each element unwrapped.
    pub fn unwrap_envelopes(&self) -> PropertyValue {
        self.unwrap_at(0)
    }

    fn unwrap_at(&self, depth: usize) -> PropertyValue {
        match self {
            Self::Nested(map) => {
                if depth < MAX_ENVELOPE_DEPTH {
                    if let Some(inner) = map.get(ENVELOPE_VALUE) {
                        return inner.unwrap_at(depth + 1);
                    }
                }
                if let Some(inner) = vertex_property_value(map) {
                    return inner.unwrap_at(depth);
                }
                self.clone()
            }
            Self::List(items) if items.len() == 1 => items[0].unwrap_at(depth),
            Self::List(items) => Self::List(items.iter().map(|v| v.unwrap_at(depth)).collect()),
            Self::Scalar(_) => self.clone(),
        }
    }

    /// String content of a scalar (numbers and booleans are rendered)
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s.clone()),
            Self::Scalar(Scalar::Int(i)) => Some(i.to_string()),
            Self::Scalar(Scalar::Float(f)) => Some(f.to_string()),
            Self::Scalar(Scalar::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

/// `{"id": ..., "value": v, "label": ...}` → `v`
fn vertex_property_value(map: &BTreeMap<String, PropertyValue>) -> Option<&PropertyValue> {
    if map.contains_key("label") && map.contains_key("id") {
        map.get("value")
    } else {
        None
    }
}

/// Opaque vertex identifier (unique within one graph)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexId {
    Int(i64),
    Str(String),
}

impl VertexId {
    /// Decode an id, peeling typed envelopes.
    ///
    /// Returns `None` for `null` and for values with no sensible identity
    /// (arrays, objects without `@value`).
    pub fn from_json(value: &Value) -> Option<Self> {
        let mut current = value;
        for _ in 0..MAX_ENVELOPE_DEPTH {
            match current.get(ENVELOPE_VALUE) {
                Some(inner) => current = inner,
                None => break,
            }
        }
        match current {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Str(n.to_string())),
            },
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Str(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for VertexId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for VertexId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unwrap(value: Value) -> PropertyValue {
        PropertyValue::from_json(&value).unwrap_envelopes()
    }

    #[test]
    fn test_plain_scalar() {
        assert_eq!(unwrap(json!("strcpy")).as_str(), Some("strcpy"));
        assert_eq!(unwrap(json!(7)).as_i64(), Some(7));
    }

    #[test]
    fn test_envelopes_peeled_up_to_three_levels() {
        let v = json!({"@value": {"@value": {"@value": "x"}}});
        assert_eq!(unwrap(v).as_str(), Some("x"));

        // fourth level stays wrapped
        let v = json!({"@value": {"@value": {"@value": {"@value": "x"}}}});
        assert!(matches!(unwrap(v), PropertyValue::Nested(_)));
    }

    #[test]
    fn test_singleton_list_collapses() {
        let v = json!({"@type": "g:List", "@value": ["buf"]});
        assert_eq!(unwrap(v).as_str(), Some("buf"));
    }

    #[test]
    fn test_longer_list_kept() {
        let v = json!({"@type": "g:List", "@value": ["a", {"@value": "b"}]});
        match unwrap(v) {
            PropertyValue::List(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].as_str(), Some("b"));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_vertex_property_record() {
        let v = json!({
            "@type": "g:List",
            "@value": [{
                "@type": "g:VertexProperty",
                "@value": {"id": {"@type": "g:Int64", "@value": 9}, "value": "foo", "label": "NAME"}
            }]
        });
        assert_eq!(unwrap(v).as_str(), Some("foo"));
    }

    #[test]
    fn test_vertex_id_envelopes() {
        assert_eq!(
            VertexId::from_json(&json!({"@type": "g:Int64", "@value": 3})),
            Some(VertexId::Int(3))
        );
        assert_eq!(VertexId::from_json(&json!("n1")), Some(VertexId::from("n1")));
        assert_eq!(VertexId::from_json(&json!(null)), None);
        assert_eq!(VertexId::from_json(&json!([1])), None);
    }
}
