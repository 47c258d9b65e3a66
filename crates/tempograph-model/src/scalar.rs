//! # Scalar Values
//!
//! The closed set of scalar attribute values a domain object may carry, and
//! the matching attribute kinds used by type descriptors. The set collapses
//! the source model's boxed numeric zoo to what the portable tree format can
//! represent: booleans, 64-bit integers, doubles, strings, and timestamps
//! (which travel as ISO 8601 strings on the wire).

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// A materialized scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float. Only finite values can be encoded.
    Float(f64),
    /// A string.
    String(String),
    /// A UTC instant; travels as an ISO 8601 string.
    Timestamp(Timestamp),
}

impl ScalarValue {
    /// The kind of this value, for descriptor checks.
    pub fn kind(&self) -> AttributeKind {
        match self {
            ScalarValue::Bool(_) => AttributeKind::Bool,
            ScalarValue::Int(_) => AttributeKind::Int,
            ScalarValue::Float(_) => AttributeKind::Float,
            ScalarValue::String(_) => AttributeKind::String,
            ScalarValue::Timestamp(_) => AttributeKind::Timestamp,
        }
    }

    /// Render the value for use inside an identity string. Deterministic and
    /// independent of the wire encoding.
    pub fn render(&self) -> String {
        match self {
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Timestamp(ts) => ts.to_iso8601(),
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// The declared kind of an attribute in a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Boolean attribute.
    Bool,
    /// 64-bit signed integer attribute.
    Int,
    /// 64-bit float attribute.
    Float,
    /// String attribute.
    String,
    /// UTC timestamp attribute.
    Timestamp,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeKind::Bool => "Bool",
            AttributeKind::Int => "Int",
            AttributeKind::Float => "Float",
            AttributeKind::String => "String",
            AttributeKind::Timestamp => "Timestamp",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(ScalarValue::Bool(true).kind(), AttributeKind::Bool);
        assert_eq!(ScalarValue::Int(7).kind(), AttributeKind::Int);
        assert_eq!(ScalarValue::Float(1.5).kind(), AttributeKind::Float);
        assert_eq!(
            ScalarValue::String("x".to_string()).kind(),
            AttributeKind::String
        );
        let ts = Timestamp::parse("2026-01-15T00:00:00Z").unwrap();
        assert_eq!(ScalarValue::Timestamp(ts).kind(), AttributeKind::Timestamp);
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(ScalarValue::Int(42).render(), "42");
        assert_eq!(ScalarValue::Bool(false).render(), "false");
        let ts = Timestamp::parse("2026-01-15T00:00:00Z").unwrap();
        assert_eq!(
            ScalarValue::Timestamp(ts).render(),
            "2026-01-15T00:00:00.000Z"
        );
    }
}
