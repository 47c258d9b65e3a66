//! # tempograph-model — Foundational Types for the tempograph Module
//!
//! This crate defines the in-memory model that the tempograph serialization
//! module converts to and from a portable tree format. It has no internal
//! dependencies; `tempograph-serial` builds on it.
//!
//! ## Key Design Principles
//!
//! 1. **UTC-only timestamps.** The `Timestamp` type enforces UTC rendering
//!    with millisecond precision so temporal keys round-trip exactly —
//!    never drifting through timezone normalization.
//!
//! 2. **Explicit load states.** Lazy loading is modeled as the inspectable
//!    tri-state `LoadState` (`Materialized` / `NotLoaded` /
//!    `IntentionallyNull`); probing a state can never trigger a fetch.
//!
//! 3. **Identity-keyed arena.** `DomainGraph` owns objects keyed by logical
//!    identity (type + primary key + temporal key); relationships hold
//!    identity references, so cyclic reference structures carry no cyclic
//!    ownership.
//!
//! 4. **Explicit type descriptors.** Per-type shape lives in a
//!    `TypeDescriptor` consulted through a `SchemaRegistry` lookup table
//!    instead of runtime reflection.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug` and `Clone`.

pub mod error;
pub mod load;
pub mod object;
pub mod scalar;
pub mod schema;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::ModelError;
pub use load::LoadState;
pub use object::{DomainGraph, DomainObject, ObjectIdentity, Relationship};
pub use scalar::{AttributeKind, ScalarValue};
pub use schema::{
    AttributeDescriptor, Cardinality, RelationshipDescriptor, SchemaRegistry, TemporalShape,
    TypeDescriptor,
};
pub use temporal::{TemporalKey, Timestamp};
