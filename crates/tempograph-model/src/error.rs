//! # Model Errors
//!
//! Errors raised by the domain-object model itself, as opposed to the
//! serialization layer. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations and carry enough context to
//! identify the offending field or input.

use thiserror::Error;

/// Errors raised by the domain-object model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {input:?}: {reason}")]
    BadTimestamp {
        /// The rejected input string.
        input: String,
        /// Why the parse failed.
        reason: String,
    },

    /// An attribute or relationship attempted a load-state transition other
    /// than NotLoaded → Materialized.
    #[error("load state of {field:?} cannot transition from {from} to Materialized; only NotLoaded may materialize")]
    StateRegression {
        /// The attribute or relationship name.
        field: String,
        /// The state the field was in.
        from: &'static str,
    },
}
