//! # Serialization Errors
//!
//! The error taxonomy of the conversion layer. Every variant is local to a
//! single encode or decode call and is reported as that call's outcome —
//! nothing is recovered silently, because silent recovery risks corrupting
//! temporal or load-state semantics. The one policy-configurable case is
//! unknown-field handling (see [`crate::config::UnknownFieldPolicy`]).

use thiserror::Error;

use tempograph_model::ModelError;

/// Errors raised by encode/decode calls.
#[derive(Error, Debug)]
pub enum SerialError {
    /// A required temporal dimension is missing or a date field cannot be
    /// parsed.
    #[error("malformed temporal key: {0}")]
    MalformedTemporalKey(String),

    /// A field name collides with a reserved wire key, so the tree cannot be
    /// emitted without clobbering it.
    #[error("encoding conflict on field {field:?}: {reason}")]
    EncodingConflict {
        /// The conflicting attribute or relationship name.
        field: String,
        /// Why the field cannot be emitted.
        reason: String,
    },

    /// An attribute value cannot be represented in the target scalar set.
    #[error("unsupported value for field {field:?}: {reason}")]
    UnsupportedValueType {
        /// The attribute name.
        field: String,
        /// Why the value cannot be represented.
        reason: String,
    },

    /// A reference marker points at an identity with no full body in the
    /// same tree (or, on encode, at an identity absent from the arena).
    #[error("dangling reference {ref_id:?}")]
    DanglingReference {
        /// The unresolved identity string.
        ref_id: String,
    },

    /// A tree field does not exist on the target type (fail-fast policy only).
    #[error("unknown field {field:?} on type {type_name:?}")]
    UnknownField {
        /// The target type.
        type_name: String,
        /// The unrecognized field name.
        field: String,
    },

    /// A tree value does not match the declared kind of the target field.
    #[error("type mismatch on {type_name}.{field}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The target type.
        type_name: String,
        /// The field being decoded.
        field: String,
        /// What the descriptor declares.
        expected: String,
        /// What the tree actually holds.
        actual: String,
    },

    /// The requested type is not in the schema registry.
    #[error("type {0:?} is not registered")]
    UnregisteredType(String),

    /// An object body carries no usable primary-key attribute.
    #[error("missing primary key {field:?} on type {type_name:?}")]
    MissingPrimaryKey {
        /// The target type.
        type_name: String,
        /// The primary-key attribute name.
        field: String,
    },

    /// The serial module was already installed.
    #[error("serial module is already installed")]
    AlreadyInstalled,

    /// A model-level invariant was violated while reconstructing objects.
    #[error(transparent)]
    Model(#[from] ModelError),
}
