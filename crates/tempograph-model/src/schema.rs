//! # Type Descriptors and the Schema Registry
//!
//! The source ecosystem discovers per-type shape through reflection over
//! generated finder classes. Here the shape is an explicit, queryable value:
//! a [`TypeDescriptor`] lists a type's attributes (in stable column order),
//! its relationships, which attribute is the primary key, and which temporal
//! dimensions the type declares. A [`SchemaRegistry`] is the lookup table
//! from type name to descriptor, built once at startup and read-only after.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scalar::AttributeKind;

/// Which temporal dimensions a type declares. A dimension declared here is
/// required on every serialized instance of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalShape {
    /// No temporal dimension; instances carry the empty temporal key.
    None,
    /// Processing date only.
    Processing,
    /// Business date only.
    Business,
    /// Both business and processing dates.
    Bitemporal,
}

impl TemporalShape {
    /// True if the shape declares a business dimension.
    pub fn has_business(&self) -> bool {
        matches!(self, TemporalShape::Business | TemporalShape::Bitemporal)
    }

    /// True if the shape declares a processing dimension.
    pub fn has_processing(&self) -> bool {
        matches!(self, TemporalShape::Processing | TemporalShape::Bitemporal)
    }
}

/// To-one or to-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// Single related object.
    ToOne,
    /// Ordered collection of related objects.
    ToMany,
}

/// One declared attribute: name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name as it appears on the wire.
    pub name: String,
    /// Declared scalar kind.
    pub kind: AttributeKind,
}

/// One declared relationship: name, cardinality, and the related type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    /// Relationship name as it appears on the wire.
    pub name: String,
    /// To-one or to-many.
    pub cardinality: Cardinality,
    /// Type name of the related objects.
    pub related_type: String,
}

/// The declared shape of one domain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    type_name: String,
    temporal_shape: TemporalShape,
    primary_key: String,
    attributes: Vec<AttributeDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
}

impl TypeDescriptor {
    /// Start a descriptor for `type_name`. `primary_key` names the attribute
    /// (added separately via [`with_attribute`](Self::with_attribute)) whose
    /// value identifies instances of the type.
    pub fn new(
        type_name: impl Into<String>,
        temporal_shape: TemporalShape,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            temporal_shape,
            primary_key: primary_key.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Declare an attribute. Declaration order is the wire column order.
    pub fn with_attribute(mut self, name: impl Into<String>, kind: AttributeKind) -> Self {
        self.attributes.push(AttributeDescriptor {
            name: name.into(),
            kind,
        });
        self
    }

    /// Declare a to-one relationship.
    pub fn with_to_one(
        mut self,
        name: impl Into<String>,
        related_type: impl Into<String>,
    ) -> Self {
        self.relationships.push(RelationshipDescriptor {
            name: name.into(),
            cardinality: Cardinality::ToOne,
            related_type: related_type.into(),
        });
        self
    }

    /// Declare a to-many relationship.
    pub fn with_to_many(
        mut self,
        name: impl Into<String>,
        related_type: impl Into<String>,
    ) -> Self {
        self.relationships.push(RelationshipDescriptor {
            name: name.into(),
            cardinality: Cardinality::ToMany,
            related_type: related_type.into(),
        });
        self
    }

    /// The type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The temporal dimensions this type declares.
    pub fn temporal_shape(&self) -> TemporalShape {
        self.temporal_shape
    }

    /// Name of the primary-key attribute.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Declared attributes in column order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Declared relationships in declaration order.
    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    /// Kind of a declared attribute, if any.
    pub fn attribute_kind(&self, name: &str) -> Option<AttributeKind> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.kind)
    }

    /// A declared relationship, if any.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name == name)
    }
}

/// The lookup table from domain type name to descriptor.
///
/// Built once at startup; never mutated afterward. Plain owned data, safe
/// for unsynchronized concurrent reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Re-registering a type name replaces the
    /// previous descriptor.
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        self.types
            .insert(descriptor.type_name().to_string(), descriptor);
        self
    }

    /// Look up a descriptor by type name.
    pub fn descriptor(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
