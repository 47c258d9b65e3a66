//! # Wire Constants and Marker Nodes
//!
//! The reserved keys of the tree encoding. Every key the module emits beyond
//! plain attribute/relationship names carries the `_tg` prefix, so other
//! implementations can interoperate by recognizing these exact constants:
//!
//! - `{"_tgRef": "<identity>"}` — reference marker: the object's full body
//!   was already emitted earlier in the same tree; `<identity>` is the
//!   opaque identity string (`Display` of [`ObjectIdentity`]).
//! - `{"_tgNotLoaded": null}` — NotLoaded sentinel: the field was never
//!   fetched from the data source (emitted only under
//!   [`NotLoadedPolicy::Sentinel`](crate::config::NotLoadedPolicy)).
//! - `"_tgClass"` — type-name metadata on each object body.
//! - `"_tgListSize"` — element count on a top-level list envelope.
//!
//! Temporal dimensions use the plain field names `businessDate` and
//! `processingDate`, matching the source system's wire vocabulary.

use serde_json::{Map, Value};

/// Prefix reserved for the module's own keys; attribute and relationship
/// names must not start with it.
pub const RESERVED_PREFIX: &str = "_tg";

/// Key of a reference-marker node.
pub const REF_KEY: &str = "_tgRef";

/// Key of a NotLoaded sentinel node.
pub const NOT_LOADED_KEY: &str = "_tgNotLoaded";

/// Type-name metadata key on object bodies.
pub const CLASS_KEY: &str = "_tgClass";

/// Element-count metadata key on list envelopes.
pub const LIST_SIZE_KEY: &str = "_tgListSize";

/// Key holding the elements of a list envelope.
pub const ELEMENTS_KEY: &str = "elements";

/// Wire field name of the business date dimension.
pub const BUSINESS_DATE_FIELD: &str = "businessDate";

/// Wire field name of the processing date dimension.
pub const PROCESSING_DATE_FIELD: &str = "processingDate";

/// Build a reference-marker node for an identity string.
pub fn reference_node(ref_id: &str) -> Value {
    let mut map = Map::new();
    map.insert(REF_KEY.to_string(), Value::String(ref_id.to_string()));
    Value::Object(map)
}

/// Build a NotLoaded sentinel node.
pub fn not_loaded_node() -> Value {
    let mut map = Map::new();
    map.insert(NOT_LOADED_KEY.to_string(), Value::Null);
    Value::Object(map)
}

/// If `node` is a reference marker, its identity string. A marker is a map
/// whose single key is [`REF_KEY`] with a string value.
pub fn as_reference(node: &Value) -> Option<&str> {
    let map = node.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY)?.as_str()
}

/// True if `node` is the NotLoaded sentinel: a map whose single key is
/// [`NOT_LOADED_KEY`].
pub fn is_not_loaded(node: &Value) -> bool {
    match node.as_object() {
        Some(map) => map.len() == 1 && map.contains_key(NOT_LOADED_KEY),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_node_round_trip() {
        let node = reference_node("Order[42]");
        assert_eq!(as_reference(&node), Some("Order[42]"));
    }

    #[test]
    fn test_reference_requires_single_key() {
        let mut map = Map::new();
        map.insert(REF_KEY.to_string(), Value::String("Order[42]".to_string()));
        map.insert("other".to_string(), Value::Null);
        assert_eq!(as_reference(&Value::Object(map)), None);
    }

    #[test]
    fn test_reference_requires_string_value() {
        let mut map = Map::new();
        map.insert(REF_KEY.to_string(), Value::Bool(true));
        assert_eq!(as_reference(&Value::Object(map)), None);
    }

    #[test]
    fn test_not_loaded_sentinel() {
        assert!(is_not_loaded(&not_loaded_node()));
        assert!(!is_not_loaded(&Value::Null));
        assert!(!is_not_loaded(&reference_node("Order[42]")));
    }

    #[test]
    fn test_reserved_keys_share_prefix() {
        for key in [REF_KEY, NOT_LOADED_KEY, CLASS_KEY, LIST_SIZE_KEY] {
            assert!(key.starts_with(RESERVED_PREFIX));
        }
    }
}
