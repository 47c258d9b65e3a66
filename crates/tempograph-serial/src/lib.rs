//! # tempograph-serial — Tree Serialization for Bitemporal Object Graphs
//!
//! Converts detached, lazily-loaded, relationship-graph domain objects
//! (`tempograph-model`) to and from a portable tree of maps, lists, and
//! scalars (`serde_json::Value` with insertion order preserved), without
//! violating the model's loading, mutability, or temporal-validity
//! invariants:
//!
//! - **Lazy loading is never triggered.** A `NotLoaded` field is omitted or
//!   emitted as the documented sentinel; serialization only reads load
//!   states, it never resolves them.
//! - **Temporal keys round-trip exactly.** Business and processing dates
//!   travel as UTC ISO 8601 strings and come back bit-identical.
//! - **Cycles and shared references terminate.** Each full body is emitted
//!   once per top-level call; re-encounters become reference markers that
//!   the decoder resolves against bodies decoded earlier in the same call.
//!
//! ## Call Model
//!
//! One top-level encode or decode call is synchronous, in-memory work with
//! no I/O and no retries; any fault aborts the call after scoped visit
//! markers are released. Visit tracking and the reference table are scoped
//! to the call, so independent calls can run on separate threads freely.
//! The only process-wide state is the one-time [`SerialModule`]
//! installation.
//!
//! ## Entry Points
//!
//! Build a [`SchemaRegistry`](tempograph_model::SchemaRegistry), wrap it in
//! a [`SerialModule`] with a [`SerialConfig`], and hand out per-type
//! [`TypeCodec`] pairs — or use [`Encoder`]/[`Decoder`] directly.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod key;
pub mod module;
pub mod visit;
pub mod wire;

// Re-export primary types for ergonomic imports.
pub use config::{NotLoadedPolicy, SerialConfig, UnknownFieldPolicy};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::SerialError;
pub use module::{SerialModule, TypeCodec};
pub use visit::{Visit, VisitTracker};
