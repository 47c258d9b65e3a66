//! # Decoder
//!
//! Consumes a tree node and reconstructs detached domain objects inside a
//! fresh arena. Fields absent from the tree stay `NotLoaded` — a partially
//! serialized object round-trips its unknown status instead of masquerading
//! as fully loaded. Each top-level decode call owns its arena and reference
//! table; reference markers resolve against full bodies decoded earlier in
//! the same call, and an object's identity is registered before its
//! relationships are recursed so self- and mutually-referential graphs
//! resolve.

use std::collections::HashMap;

use serde_json::{Map, Value};

use tempograph_model::{
    AttributeKind, Cardinality, DomainGraph, DomainObject, LoadState, ObjectIdentity,
    Relationship, RelationshipDescriptor, ScalarValue, SchemaRegistry, Timestamp, TypeDescriptor,
};

use crate::config::{SerialConfig, UnknownFieldPolicy};
use crate::error::SerialError;
use crate::key;
use crate::wire;

/// Converts tree nodes back to detached domain objects.
#[derive(Debug)]
pub struct Decoder<'a> {
    registry: &'a SchemaRegistry,
    config: &'a SerialConfig,
}

/// Per-call reference table: identity string → identity, populated by every
/// full-body decode before its relationships are recursed.
type RefTable = HashMap<String, ObjectIdentity>;

impl<'a> Decoder<'a> {
    /// A decoder over a schema registry and policy set.
    pub fn new(registry: &'a SchemaRegistry, config: &'a SerialConfig) -> Self {
        Self { registry, config }
    }

    /// Decode one tree node as a detached instance of `target_type`. Returns
    /// the arena holding the root and everything reachable from it, plus the
    /// root's identity.
    pub fn decode(
        &self,
        node: &Value,
        target_type: &str,
    ) -> Result<(DomainGraph, ObjectIdentity), SerialError> {
        tracing::debug!(target_type, "decoding object graph");
        let mut graph = DomainGraph::new();
        let mut refs = RefTable::new();
        let root = self.decode_object(node, target_type, &mut graph, &mut refs)?;
        Ok((graph, root))
    }

    /// Decode a homogeneous collection: either the list envelope
    /// `{"_tgClass": …, "_tgListSize": n, "elements": [...]}` or a bare
    /// array. Elements share one arena and reference table.
    pub fn decode_many(
        &self,
        node: &Value,
        target_type: &str,
    ) -> Result<(DomainGraph, Vec<ObjectIdentity>), SerialError> {
        tracing::debug!(target_type, "decoding object list");
        let elements = match node {
            Value::Array(elements) => elements,
            Value::Object(envelope) => {
                self.check_class(envelope, target_type)?;
                let elements = envelope
                    .get(wire::ELEMENTS_KEY)
                    .and_then(Value::as_array)
                    .ok_or_else(|| SerialError::TypeMismatch {
                        type_name: target_type.to_string(),
                        field: wire::ELEMENTS_KEY.to_string(),
                        expected: "array".to_string(),
                        actual: "missing or non-array".to_string(),
                    })?;
                if let Some(declared) = envelope.get(wire::LIST_SIZE_KEY).and_then(Value::as_u64) {
                    if declared as usize != elements.len() {
                        return Err(SerialError::TypeMismatch {
                            type_name: target_type.to_string(),
                            field: wire::LIST_SIZE_KEY.to_string(),
                            expected: declared.to_string(),
                            actual: elements.len().to_string(),
                        });
                    }
                }
                elements
            }
            other => {
                return Err(SerialError::TypeMismatch {
                    type_name: target_type.to_string(),
                    field: wire::ELEMENTS_KEY.to_string(),
                    expected: "array or list envelope".to_string(),
                    actual: tree_kind(other).to_string(),
                })
            }
        };
        let mut graph = DomainGraph::new();
        let mut refs = RefTable::new();
        let mut roots = Vec::with_capacity(elements.len());
        for element in elements {
            roots.push(self.decode_object(element, target_type, &mut graph, &mut refs)?);
        }
        Ok((graph, roots))
    }

    fn decode_object(
        &self,
        node: &Value,
        target_type: &str,
        graph: &mut DomainGraph,
        refs: &mut RefTable,
    ) -> Result<ObjectIdentity, SerialError> {
        if let Some(ref_id) = wire::as_reference(node) {
            return refs
                .get(ref_id)
                .cloned()
                .ok_or_else(|| SerialError::DanglingReference {
                    ref_id: ref_id.to_string(),
                });
        }

        let body = node.as_object().ok_or_else(|| SerialError::TypeMismatch {
            type_name: target_type.to_string(),
            field: "$".to_string(),
            expected: "object body".to_string(),
            actual: tree_kind(node).to_string(),
        })?;
        let descriptor = self
            .registry
            .descriptor(target_type)
            .ok_or_else(|| SerialError::UnregisteredType(target_type.to_string()))?;

        self.check_class(body, target_type)?;
        let temporal_key = key::decode_key(body, descriptor.temporal_shape())?;
        let identity = ObjectIdentity::new(
            target_type,
            self.primary_key_of(body, descriptor)?,
            temporal_key,
        );
        let mut object = DomainObject::new(identity.clone());

        // Register before relationship recursion so back-references to this
        // object resolve while its subtree is still being decoded.
        refs.insert(identity.to_string(), identity.clone());

        let mut relationship_nodes: Vec<(&RelationshipDescriptor, &Value)> = Vec::new();
        for (field, value) in body {
            if self.is_consumed_key(field, descriptor) {
                continue;
            }
            if let Some(kind) = descriptor.attribute_kind(field) {
                if wire::is_not_loaded(value) {
                    // Stays NotLoaded; the sentinel carries no value.
                    continue;
                }
                if value.is_null() {
                    object.set_attribute(field.clone(), LoadState::IntentionallyNull);
                    continue;
                }
                let scalar = scalar_from_tree(descriptor.type_name(), field, kind, value)?;
                object.materialize_attribute(field, scalar)?;
            } else if let Some(rel) = descriptor.relationship(field) {
                if wire::is_not_loaded(value) {
                    continue;
                }
                if value.is_null() {
                    object.set_relationship(field.clone(), LoadState::IntentionallyNull);
                    continue;
                }
                relationship_nodes.push((rel, value));
            } else if self.config.unknown_fields == UnknownFieldPolicy::Fail {
                return Err(SerialError::UnknownField {
                    type_name: target_type.to_string(),
                    field: field.clone(),
                });
            }
        }

        for (rel, value) in relationship_nodes {
            let related = self.decode_relationship(rel, value, graph, refs)?;
            object.materialize_relationship(&rel.name, related)?;
        }

        graph.insert(object);
        Ok(identity)
    }

    fn decode_relationship(
        &self,
        rel: &RelationshipDescriptor,
        value: &Value,
        graph: &mut DomainGraph,
        refs: &mut RefTable,
    ) -> Result<Relationship, SerialError> {
        match rel.cardinality {
            Cardinality::ToOne => {
                let target = self.decode_object(value, &rel.related_type, graph, refs)?;
                Ok(Relationship::ToOne(target))
            }
            Cardinality::ToMany => {
                let elements = value.as_array().ok_or_else(|| SerialError::TypeMismatch {
                    type_name: rel.related_type.clone(),
                    field: rel.name.clone(),
                    expected: "array".to_string(),
                    actual: tree_kind(value).to_string(),
                })?;
                // Element order preserved.
                let targets = elements
                    .iter()
                    .map(|element| self.decode_object(element, &rel.related_type, graph, refs))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Relationship::ToMany(targets))
            }
        }
    }

    /// Cross-check `_tgClass` metadata against the requested type.
    fn check_class(&self, body: &Map<String, Value>, target_type: &str) -> Result<(), SerialError> {
        if let Some(value) = body.get(wire::CLASS_KEY) {
            let declared = value.as_str().unwrap_or("<non-string>");
            if declared != target_type {
                return Err(SerialError::TypeMismatch {
                    type_name: target_type.to_string(),
                    field: wire::CLASS_KEY.to_string(),
                    expected: target_type.to_string(),
                    actual: declared.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Extract and render the primary-key attribute value of a body.
    fn primary_key_of(
        &self,
        body: &Map<String, Value>,
        descriptor: &TypeDescriptor,
    ) -> Result<String, SerialError> {
        let field = descriptor.primary_key();
        let missing = || SerialError::MissingPrimaryKey {
            type_name: descriptor.type_name().to_string(),
            field: field.to_string(),
        };
        let kind = descriptor.attribute_kind(field).ok_or_else(missing)?;
        let value = body.get(field).ok_or_else(missing)?;
        if value.is_null() || wire::is_not_loaded(value) {
            return Err(missing());
        }
        let scalar = scalar_from_tree(descriptor.type_name(), field, kind, value)?;
        Ok(scalar.render())
    }

    /// Keys consumed outside the field loop: class metadata and the
    /// temporal dimensions the type declares.
    fn is_consumed_key(&self, field: &str, descriptor: &TypeDescriptor) -> bool {
        if field == wire::CLASS_KEY {
            return true;
        }
        let shape = descriptor.temporal_shape();
        (shape.has_business() && field == wire::BUSINESS_DATE_FIELD)
            || (shape.has_processing() && field == wire::PROCESSING_DATE_FIELD)
    }
}

/// The tree-side kind of a value, for mismatch diagnostics.
fn tree_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a tree scalar to the declared attribute kind.
fn scalar_from_tree(
    type_name: &str,
    field: &str,
    kind: AttributeKind,
    value: &Value,
) -> Result<ScalarValue, SerialError> {
    let mismatch = |actual: String| SerialError::TypeMismatch {
        type_name: type_name.to_string(),
        field: field.to_string(),
        expected: kind.to_string(),
        actual,
    };
    match kind {
        AttributeKind::Bool => value
            .as_bool()
            .map(ScalarValue::Bool)
            .ok_or_else(|| mismatch(tree_kind(value).to_string())),
        AttributeKind::Int => value
            .as_i64()
            .map(ScalarValue::Int)
            .ok_or_else(|| mismatch(tree_kind(value).to_string())),
        AttributeKind::Float => value
            .as_f64()
            .map(ScalarValue::Float)
            .ok_or_else(|| mismatch(tree_kind(value).to_string())),
        AttributeKind::String => value
            .as_str()
            .map(|s| ScalarValue::String(s.to_string()))
            .ok_or_else(|| mismatch(tree_kind(value).to_string())),
        AttributeKind::Timestamp => {
            let text = value
                .as_str()
                .ok_or_else(|| mismatch(tree_kind(value).to_string()))?;
            Timestamp::parse(text)
                .map(ScalarValue::Timestamp)
                .map_err(|e| mismatch(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempograph_model::TemporalShape;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new().register(
            TypeDescriptor::new("Order", TemporalShape::None, "orderId")
                .with_attribute("orderId", AttributeKind::Int)
                .with_attribute("description", AttributeKind::String)
                .with_attribute("tracked", AttributeKind::Bool),
        )
    }

    #[test]
    fn test_decode_simple_object() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"_tgClass": "Order", "orderId": 1, "description": "first"});
        let (graph, root) = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap();
        let object = graph.get(&root).unwrap();
        assert_eq!(
            object.attribute("orderId").as_materialized(),
            Some(&ScalarValue::Int(1))
        );
        // Absent from the tree: stays NotLoaded, not defaulted.
        assert!(object.attribute("tracked").is_not_loaded());
    }

    #[test]
    fn test_decode_null_is_intentionally_null() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"orderId": 1, "description": null});
        let (graph, root) = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap();
        let object = graph.get(&root).unwrap();
        assert_eq!(
            *object.attribute("description"),
            LoadState::IntentionallyNull
        );
    }

    #[test]
    fn test_decode_sentinel_stays_not_loaded() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"orderId": 1, "description": {"_tgNotLoaded": null}});
        let (graph, root) = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap();
        assert!(graph.get(&root).unwrap().attribute("description").is_not_loaded());
    }

    #[test]
    fn test_decode_unknown_field_ignored_by_default() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"orderId": 1, "surprise": "extra"});
        let (graph, root) = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap();
        assert!(graph.get(&root).unwrap().attribute("surprise").is_not_loaded());
    }

    #[test]
    fn test_decode_unknown_field_fail_fast() {
        let registry = registry();
        let config = SerialConfig::default().with_unknown_fields(UnknownFieldPolicy::Fail);
        let tree = json!({"orderId": 1, "surprise": "extra"});
        let err = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap_err();
        assert!(matches!(err, SerialError::UnknownField { .. }));
    }

    #[test]
    fn test_decode_type_mismatch() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"orderId": "not-a-number"});
        let err = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap_err();
        assert!(matches!(err, SerialError::TypeMismatch { .. }));
    }

    #[test]
    fn test_decode_class_metadata_mismatch() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"_tgClass": "Invoice", "orderId": 1});
        let err = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap_err();
        assert!(matches!(err, SerialError::TypeMismatch { .. }));
    }

    #[test]
    fn test_decode_missing_primary_key() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"description": "no key"});
        let err = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap_err();
        assert!(matches!(err, SerialError::MissingPrimaryKey { .. }));
    }

    #[test]
    fn test_decode_root_reference_is_dangling() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"_tgRef": "Order[1]"});
        let err = Decoder::new(&registry, &config).decode(&tree, "Order").unwrap_err();
        assert!(matches!(err, SerialError::DanglingReference { .. }));
    }

    #[test]
    fn test_decode_unregistered_type() {
        let registry = registry();
        let config = SerialConfig::default();
        let tree = json!({"id": 1});
        let err = Decoder::new(&registry, &config).decode(&tree, "Ghost").unwrap_err();
        assert!(matches!(err, SerialError::UnregisteredType(_)));
    }

    #[test]
    fn test_decode_many_bare_array_and_envelope() {
        let registry = registry();
        let config = SerialConfig::default();
        let decoder = Decoder::new(&registry, &config);

        let bare = json!([{"orderId": 1}, {"orderId": 2}]);
        let (graph, roots) = decoder.decode_many(&bare, "Order").unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(graph.len(), 2);

        let envelope = json!({
            "_tgClass": "Order",
            "_tgListSize": 1,
            "elements": [{"orderId": 3}]
        });
        let (graph, roots) = decoder.decode_many(&envelope, "Order").unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].primary_key(), "3");
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_decode_many_size_mismatch() {
        let registry = registry();
        let config = SerialConfig::default();
        let envelope = json!({"_tgListSize": 5, "elements": [{"orderId": 1}]});
        let err = Decoder::new(&registry, &config)
            .decode_many(&envelope, "Order")
            .unwrap_err();
        assert!(matches!(err, SerialError::TypeMismatch { .. }));
    }

    #[test]
    fn test_decode_bitemporal_key_required() {
        let registry = SchemaRegistry::new().register(
            TypeDescriptor::new("Balance", TemporalShape::Bitemporal, "id")
                .with_attribute("id", AttributeKind::Int),
        );
        let config = SerialConfig::default();
        let tree = json!({"id": 1, "businessDate": "2026-01-15T00:00:00Z"});
        let err = Decoder::new(&registry, &config).decode(&tree, "Balance").unwrap_err();
        assert!(matches!(err, SerialError::MalformedTemporalKey(_)));
    }
}
