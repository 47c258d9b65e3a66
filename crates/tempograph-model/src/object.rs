//! # Detached Domain Objects and the Identity Arena
//!
//! A `DomainObject` is a detached business entity: attributes and
//! relationships each tracked through a [`LoadState`], plus a logical
//! identity. Detached objects are not backed by a data source — they are
//! fully usable for serialization but can never lazy-load.
//!
//! Relationships do not own related objects. The graph is an arena
//! ([`DomainGraph`]) keyed by [`ObjectIdentity`], and relationships store
//! identity references into it. Back-references and cycles are therefore
//! representable without ownership cycles, and two detached copies of the
//! same logical record collapse onto one arena slot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::load::LoadState;
use crate::scalar::ScalarValue;
use crate::temporal::TemporalKey;

/// Logical identity of a domain object: type name, primary key, and
/// temporal key. Identity is by logical record, not by memory address — two
/// in-memory copies of the same record compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    type_name: String,
    primary_key: String,
    temporal_key: TemporalKey,
}

impl ObjectIdentity {
    /// Build an identity from its three components. `primary_key` is the
    /// rendered form of the primary-key attribute value.
    pub fn new(
        type_name: impl Into<String>,
        primary_key: impl Into<String>,
        temporal_key: TemporalKey,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            primary_key: primary_key.into(),
            temporal_key,
        }
    }

    /// The domain type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The rendered primary-key value.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The temporal validity window; empty for non-temporal types.
    pub fn temporal_key(&self) -> &TemporalKey {
        &self.temporal_key
    }
}

impl std::fmt::Display for ObjectIdentity {
    /// The opaque identity string used as a reference id on the wire, e.g.
    /// `Order[42]` or `Balance[7]@b=2026-01-15T00:00:00.000Z`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.type_name, self.primary_key)?;
        if !self.temporal_key.is_empty() {
            write!(f, "@{}", self.temporal_key)?;
        }
        Ok(())
    }
}

/// A relationship value: identity references into the arena, never owned
/// child objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relationship {
    /// A to-one relationship target.
    ToOne(ObjectIdentity),
    /// A to-many relationship, element order preserved.
    ToMany(Vec<ObjectIdentity>),
}

/// A detached domain object.
///
/// Equality is semantic: an untracked field and an explicitly recorded
/// `NotLoaded` entry are the same state, so two objects compare equal when
/// their identities and their non-`NotLoaded` fields agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainObject {
    identity: ObjectIdentity,
    attributes: HashMap<String, LoadState<ScalarValue>>,
    relationships: HashMap<String, LoadState<Relationship>>,
}

impl PartialEq for DomainObject {
    fn eq(&self, other: &Self) -> bool {
        fn loaded<T: PartialEq>(
            map: &HashMap<String, LoadState<T>>,
        ) -> HashMap<&str, &LoadState<T>> {
            map.iter()
                .filter(|(_, state)| !state.is_not_loaded())
                .map(|(name, state)| (name.as_str(), state))
                .collect()
        }
        self.identity == other.identity
            && loaded(&self.attributes) == loaded(&other.attributes)
            && loaded(&self.relationships) == loaded(&other.relationships)
    }
}

impl DomainObject {
    /// Create a detached object with no attributes or relationships tracked.
    pub fn new(identity: ObjectIdentity) -> Self {
        Self {
            identity,
            attributes: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    /// The object's logical identity.
    pub fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    /// Load state of an attribute. Untracked attributes report `NotLoaded` —
    /// an attribute this object has never seen is indistinguishable from one
    /// that was explicitly never fetched.
    pub fn attribute(&self, name: &str) -> &LoadState<ScalarValue> {
        const NOT_LOADED: &LoadState<ScalarValue> = &LoadState::NotLoaded;
        self.attributes.get(name).unwrap_or(NOT_LOADED)
    }

    /// Load state of a relationship; untracked relationships report `NotLoaded`.
    pub fn relationship(&self, name: &str) -> &LoadState<Relationship> {
        const NOT_LOADED: &LoadState<Relationship> = &LoadState::NotLoaded;
        self.relationships.get(name).unwrap_or(NOT_LOADED)
    }

    /// Set an attribute's load state outright. Used when constructing a
    /// detached object from known data; not subject to the transition rule.
    pub fn set_attribute(&mut self, name: impl Into<String>, state: LoadState<ScalarValue>) {
        self.attributes.insert(name.into(), state);
    }

    /// Set a relationship's load state outright.
    pub fn set_relationship(&mut self, name: impl Into<String>, state: LoadState<Relationship>) {
        self.relationships.insert(name.into(), state);
    }

    /// Builder form: attribute materialized to `value`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: ScalarValue) -> Self {
        self.set_attribute(name, LoadState::Materialized(value));
        self
    }

    /// Builder form: relationship materialized to `value`.
    pub fn with_relationship(mut self, name: impl Into<String>, value: Relationship) -> Self {
        self.set_relationship(name, LoadState::Materialized(value));
        self
    }

    /// Transition an attribute `NotLoaded → Materialized`, inserting a fresh
    /// entry if the attribute was untracked (untracked means `NotLoaded`).
    ///
    /// # Errors
    ///
    /// [`crate::ModelError::StateRegression`] if the attribute is already
    /// `Materialized` or `IntentionallyNull`.
    pub fn materialize_attribute(
        &mut self,
        name: &str,
        value: ScalarValue,
    ) -> Result<(), crate::ModelError> {
        self.attributes
            .entry(name.to_string())
            .or_insert(LoadState::NotLoaded)
            .materialize(name, value)
    }

    /// Transition a relationship `NotLoaded → Materialized`, inserting a
    /// fresh entry if the relationship was untracked.
    pub fn materialize_relationship(
        &mut self,
        name: &str,
        value: Relationship,
    ) -> Result<(), crate::ModelError> {
        self.relationships
            .entry(name.to_string())
            .or_insert(LoadState::NotLoaded)
            .materialize(name, value)
    }
}

/// An arena of domain objects keyed by logical identity.
///
/// The arena is the unit of ownership for a graph of related objects; during
/// decoding it doubles as the per-call reference table. It is plain owned
/// data with no interior mutability, so independent graphs can be worked on
/// from separate threads freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainGraph {
    objects: HashMap<ObjectIdentity, DomainObject>,
}

impl DomainGraph {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, keyed by its identity. Re-inserting the same
    /// logical record replaces the previous copy and returns it.
    pub fn insert(&mut self, object: DomainObject) -> Option<DomainObject> {
        self.objects.insert(object.identity().clone(), object)
    }

    /// Look up an object by identity.
    pub fn get(&self, identity: &ObjectIdentity) -> Option<&DomainObject> {
        self.objects.get(identity)
    }

    /// Mutable lookup by identity.
    pub fn get_mut(&mut self, identity: &ObjectIdentity) -> Option<&mut DomainObject> {
        self.objects.get_mut(identity)
    }

    /// True if the identity is present in the arena.
    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.objects.contains_key(identity)
    }

    /// Number of objects in the arena.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the arena holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all objects in the arena (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &DomainObject> {
        self.objects.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::Timestamp;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_identity_display_without_temporal_key() {
        let id = ObjectIdentity::new("Order", "42", TemporalKey::empty());
        assert_eq!(id.to_string(), "Order[42]");
    }

    #[test]
    fn test_identity_display_with_bitemporal_key() {
        let key = TemporalKey::bitemporal(ts("2026-01-15T00:00:00Z"), ts("2026-02-01T09:30:00Z"));
        let id = ObjectIdentity::new("Balance", "7", key);
        assert_eq!(
            id.to_string(),
            "Balance[7]@b=2026-01-15T00:00:00.000Z,p=2026-02-01T09:30:00.000Z"
        );
    }

    #[test]
    fn test_two_detached_copies_share_identity() {
        let key = TemporalKey::business(ts("2026-01-15T00:00:00Z"));
        let a = ObjectIdentity::new("Balance", "7", key);
        let b = ObjectIdentity::new("Balance", "7", key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_untracked_attribute_is_not_loaded() {
        let obj = DomainObject::new(ObjectIdentity::new("Order", "1", TemporalKey::empty()));
        assert!(obj.attribute("anything").is_not_loaded());
        assert!(obj.relationship("anything").is_not_loaded());
    }

    #[test]
    fn test_materialize_attribute_inserts_then_rejects_rewrite() {
        let mut obj = DomainObject::new(ObjectIdentity::new("Order", "1", TemporalKey::empty()));
        obj.materialize_attribute("qty", ScalarValue::Int(3)).unwrap();
        assert_eq!(
            obj.attribute("qty").as_materialized(),
            Some(&ScalarValue::Int(3))
        );
        assert!(obj.materialize_attribute("qty", ScalarValue::Int(4)).is_err());
    }

    #[test]
    fn test_equality_ignores_explicit_not_loaded_entries() {
        let id = ObjectIdentity::new("Order", "1", TemporalKey::empty());
        let untracked = DomainObject::new(id.clone()).with_attribute("qty", ScalarValue::Int(3));
        let mut explicit = DomainObject::new(id).with_attribute("qty", ScalarValue::Int(3));
        explicit.set_attribute("notes", LoadState::NotLoaded);
        assert_eq!(untracked, explicit);
    }

    #[test]
    fn test_graph_insert_and_lookup() {
        let id = ObjectIdentity::new("Order", "1", TemporalKey::empty());
        let mut graph = DomainGraph::new();
        assert!(graph.insert(DomainObject::new(id.clone())).is_none());
        assert!(graph.contains(&id));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(&id).map(|o| o.identity()), Some(&id));
    }

    #[test]
    fn test_graph_reinsert_replaces_same_record() {
        let id = ObjectIdentity::new("Order", "1", TemporalKey::empty());
        let mut graph = DomainGraph::new();
        graph.insert(DomainObject::new(id.clone()));
        let replaced = graph.insert(
            DomainObject::new(id.clone()).with_attribute("qty", ScalarValue::Int(9)),
        );
        assert!(replaced.is_some());
        assert_eq!(graph.len(), 1);
        assert!(graph.get(&id).unwrap().attribute("qty").is_materialized());
    }
}
