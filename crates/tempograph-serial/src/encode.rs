//! # Encoder
//!
//! Walks a domain object and its relationships inside an arena, producing a
//! tree node for the outer serializer. The encoder consults load states
//! before touching any field — a `NotLoaded` field is omitted or emitted as
//! the sentinel, never resolved — and routes every object entry through the
//! visit tracker so cyclic and shared references terminate as reference
//! markers. No I/O of any kind happens here; encoding is pure in-memory
//! tree construction.

use serde_json::{Map, Number, Value};

use tempograph_model::{
    Cardinality, DomainGraph, LoadState, ObjectIdentity, Relationship, ScalarValue,
    SchemaRegistry, TypeDescriptor,
};

use crate::config::{NotLoadedPolicy, SerialConfig};
use crate::error::SerialError;
use crate::key;
use crate::visit::{Visit, VisitTracker};
use crate::wire;

/// Converts domain objects to tree nodes. Holds only borrowed, read-only
/// state; all per-call mutability lives in the tracker each top-level call
/// constructs for itself.
#[derive(Debug)]
pub struct Encoder<'a> {
    registry: &'a SchemaRegistry,
    config: &'a SerialConfig,
}

impl<'a> Encoder<'a> {
    /// An encoder over a schema registry and policy set.
    pub fn new(registry: &'a SchemaRegistry, config: &'a SerialConfig) -> Self {
        Self { registry, config }
    }

    /// Encode one object (and everything reachable from it) as a tree node.
    pub fn encode(
        &self,
        graph: &DomainGraph,
        root: &ObjectIdentity,
    ) -> Result<Value, SerialError> {
        tracing::debug!(root = %root, "encoding object graph");
        let mut tracker = VisitTracker::new();
        self.encode_object(graph, root, &mut tracker)
    }

    /// Encode a homogeneous collection of objects as one top-level call.
    ///
    /// With metadata on, the result is a list envelope
    /// `{"_tgClass": …, "_tgListSize": n, "elements": [...]}`; otherwise a
    /// bare array. Elements share one visit tracker, so an object appearing
    /// twice across the collection is emitted once in full and thereafter
    /// by reference.
    pub fn encode_many(
        &self,
        graph: &DomainGraph,
        type_name: &str,
        roots: &[ObjectIdentity],
    ) -> Result<Value, SerialError> {
        tracing::debug!(type_name, count = roots.len(), "encoding object list");
        let mut tracker = VisitTracker::new();
        let mut elements = Vec::with_capacity(roots.len());
        for root in roots {
            if root.type_name() != type_name {
                return Err(SerialError::TypeMismatch {
                    type_name: type_name.to_string(),
                    field: wire::ELEMENTS_KEY.to_string(),
                    expected: type_name.to_string(),
                    actual: root.type_name().to_string(),
                });
            }
            elements.push(self.encode_object(graph, root, &mut tracker)?);
        }
        if !self.config.write_metadata {
            return Ok(Value::Array(elements));
        }
        let mut envelope = Map::new();
        envelope.insert(
            wire::CLASS_KEY.to_string(),
            Value::String(type_name.to_string()),
        );
        envelope.insert(
            wire::LIST_SIZE_KEY.to_string(),
            Value::Number(Number::from(elements.len())),
        );
        envelope.insert(wire::ELEMENTS_KEY.to_string(), Value::Array(elements));
        Ok(Value::Object(envelope))
    }

    fn encode_object(
        &self,
        graph: &DomainGraph,
        identity: &ObjectIdentity,
        tracker: &mut VisitTracker,
    ) -> Result<Value, SerialError> {
        match tracker.begin_visit(identity) {
            Visit::AlreadyVisited(ref_id) => return Ok(wire::reference_node(&ref_id)),
            Visit::Fresh(_) => {}
        }
        // Scoped visit: the marker is released before any failure
        // propagates, so the tracker never holds a stale entry.
        let result = self.encode_body(graph, identity, tracker);
        tracker.end_visit(identity);
        result
    }

    fn encode_body(
        &self,
        graph: &DomainGraph,
        identity: &ObjectIdentity,
        tracker: &mut VisitTracker,
    ) -> Result<Value, SerialError> {
        let object = graph
            .get(identity)
            .ok_or_else(|| SerialError::DanglingReference {
                ref_id: identity.to_string(),
            })?;
        let descriptor = self
            .registry
            .descriptor(identity.type_name())
            .ok_or_else(|| SerialError::UnregisteredType(identity.type_name().to_string()))?;

        let mut body = Map::new();
        if self.config.write_metadata {
            body.insert(
                wire::CLASS_KEY.to_string(),
                Value::String(identity.type_name().to_string()),
            );
        }
        key::encode_key(identity.temporal_key(), &mut body);

        // Attributes in descriptor column order, for encode stability.
        for attr in descriptor.attributes() {
            check_field_name(descriptor, &attr.name)?;
            match object.attribute(&attr.name) {
                LoadState::Materialized(value) => {
                    body.insert(attr.name.clone(), scalar_to_tree(&attr.name, value)?);
                }
                LoadState::NotLoaded => match self.config.not_loaded {
                    NotLoadedPolicy::Omit => {}
                    NotLoadedPolicy::Sentinel => {
                        body.insert(attr.name.clone(), wire::not_loaded_node());
                    }
                },
                LoadState::IntentionallyNull => {
                    body.insert(attr.name.clone(), Value::Null);
                }
            }
        }

        for rel in descriptor.relationships() {
            check_field_name(descriptor, &rel.name)?;
            match object.relationship(&rel.name) {
                LoadState::Materialized(value) => {
                    let node = self.encode_relationship(graph, descriptor, rel.name.as_str(), rel.cardinality, value, tracker)?;
                    body.insert(rel.name.clone(), node);
                }
                LoadState::NotLoaded => match self.config.not_loaded {
                    NotLoadedPolicy::Omit => {}
                    NotLoadedPolicy::Sentinel => {
                        body.insert(rel.name.clone(), wire::not_loaded_node());
                    }
                },
                LoadState::IntentionallyNull => {
                    body.insert(rel.name.clone(), Value::Null);
                }
            }
        }

        Ok(Value::Object(body))
    }

    fn encode_relationship(
        &self,
        graph: &DomainGraph,
        descriptor: &TypeDescriptor,
        name: &str,
        cardinality: Cardinality,
        value: &Relationship,
        tracker: &mut VisitTracker,
    ) -> Result<Value, SerialError> {
        match (cardinality, value) {
            (Cardinality::ToOne, Relationship::ToOne(target)) => {
                self.encode_object(graph, target, tracker)
            }
            (Cardinality::ToMany, Relationship::ToMany(targets)) => {
                // Element order preserved.
                let elements = targets
                    .iter()
                    .map(|target| self.encode_object(graph, target, tracker))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(elements))
            }
            (expected, actual) => Err(SerialError::TypeMismatch {
                type_name: descriptor.type_name().to_string(),
                field: name.to_string(),
                expected: cardinality_name(expected).to_string(),
                actual: match actual {
                    Relationship::ToOne(_) => "to-one value".to_string(),
                    Relationship::ToMany(_) => "to-many value".to_string(),
                },
            }),
        }
    }
}

fn cardinality_name(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::ToOne => "to-one value",
        Cardinality::ToMany => "to-many value",
    }
}

/// Reject field names the wire reserves: the `_tg` prefix and, on temporal
/// types, the declared date dimension fields.
fn check_field_name(descriptor: &TypeDescriptor, name: &str) -> Result<(), SerialError> {
    if name.starts_with(wire::RESERVED_PREFIX) {
        return Err(SerialError::EncodingConflict {
            field: name.to_string(),
            reason: format!("the {} prefix is reserved", wire::RESERVED_PREFIX),
        });
    }
    let shape = descriptor.temporal_shape();
    if (shape.has_business() && name == wire::BUSINESS_DATE_FIELD)
        || (shape.has_processing() && name == wire::PROCESSING_DATE_FIELD)
    {
        return Err(SerialError::EncodingConflict {
            field: name.to_string(),
            reason: "collides with the temporal key of this type".to_string(),
        });
    }
    Ok(())
}

/// Convert a scalar value to a tree scalar.
fn scalar_to_tree(field: &str, value: &ScalarValue) -> Result<Value, SerialError> {
    match value {
        ScalarValue::Bool(b) => Ok(Value::Bool(*b)),
        ScalarValue::Int(i) => Ok(Value::Number(Number::from(*i))),
        ScalarValue::Float(f) => {
            Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| SerialError::UnsupportedValueType {
                    field: field.to_string(),
                    reason: format!("{f} is not representable as a tree number"),
                })
        }
        ScalarValue::String(s) => Ok(Value::String(s.clone())),
        ScalarValue::Timestamp(ts) => Ok(Value::String(ts.to_iso8601())),
    }
}
