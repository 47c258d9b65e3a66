//! # Load-State Tracking
//!
//! The tri-state load model for lazily-loaded attributes and relationships.
//! The source ecosystem's lazy loading happens through proxy interception —
//! touching a field can fire a data-source fetch as a side effect. Detached
//! objects replace that with an explicit, inspectable state: querying a
//! `LoadState` is a read-only probe and can never load anything.
//!
//! ## States
//!
//! - `Materialized(value)` — the value was loaded (or set) and is present.
//!   For a to-many relationship, `Materialized` of an empty collection means
//!   "loaded and confirmed empty" — a distinct, valid state.
//! - `NotLoaded` — the value was never fetched. Serialization must either
//!   omit it or emit an explicit sentinel, never resolve it.
//! - `IntentionallyNull` — the value was loaded and is genuinely null.
//!
//! ## Transition Rule
//!
//! Within one object lifetime the only legal transition is
//! `NotLoaded → Materialized`. Anything else is a [`ModelError::StateRegression`].

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Per-attribute/relationship load state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadState<T> {
    /// The value is present in memory.
    Materialized(T),
    /// The value was never fetched from the data source.
    NotLoaded,
    /// The value was fetched and is genuinely null.
    IntentionallyNull,
}

impl<T> LoadState<T> {
    /// True if a value is present.
    pub fn is_materialized(&self) -> bool {
        matches!(self, LoadState::Materialized(_))
    }

    /// True if the value was never fetched.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, LoadState::NotLoaded)
    }

    /// The materialized value, if any.
    pub fn as_materialized(&self) -> Option<&T> {
        match self {
            LoadState::Materialized(value) => Some(value),
            _ => None,
        }
    }

    /// The state name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Materialized(_) => "Materialized",
            LoadState::NotLoaded => "NotLoaded",
            LoadState::IntentionallyNull => "IntentionallyNull",
        }
    }

    /// Transition `NotLoaded → Materialized(value)`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::StateRegression`] if the state is anything other
    /// than `NotLoaded`; `field` names the offender in the error.
    pub fn materialize(&mut self, field: &str, value: T) -> Result<(), ModelError> {
        match self {
            LoadState::NotLoaded => {
                *self = LoadState::Materialized(value);
                Ok(())
            }
            other => Err(ModelError::StateRegression {
                field: field.to_string(),
                from: other.name(),
            }),
        }
    }
}
