//! # Serialization Configuration
//!
//! Per-module policy knobs. A `SerialConfig` is fixed at module construction
//! and shared read-only by every encode/decode call; there is no per-call
//! mutable configuration.

use serde::{Deserialize, Serialize};

/// How the encoder represents a `NotLoaded` attribute or relationship.
///
/// Both forms decode back to `NotLoaded`, so the two policies are
/// wire-compatible in the decode direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotLoadedPolicy {
    /// Leave the field out of the tree entirely (default).
    #[default]
    Omit,
    /// Emit the explicit `{"_tgNotLoaded": null}` sentinel, for consumers
    /// that must distinguish "never fetched" from "trimmed by the producer".
    Sentinel,
}

/// How the decoder treats a tree field the target type does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownFieldPolicy {
    /// Skip it and continue (default; tolerates evolving schemas).
    #[default]
    Ignore,
    /// Fail the decode call with `UnknownField`.
    Fail,
}

/// Policy set for one serial module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// NotLoaded representation on encode.
    pub not_loaded: NotLoadedPolicy,
    /// Unknown-field handling on decode.
    pub unknown_fields: UnknownFieldPolicy,
    /// Write `_tgClass` (and `_tgListSize` on list envelopes) metadata.
    pub write_metadata: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            not_loaded: NotLoadedPolicy::Omit,
            unknown_fields: UnknownFieldPolicy::Ignore,
            write_metadata: true,
        }
    }
}

impl SerialConfig {
    /// Builder form: set the NotLoaded policy.
    pub fn with_not_loaded(mut self, policy: NotLoadedPolicy) -> Self {
        self.not_loaded = policy;
        self
    }

    /// Builder form: set the unknown-field policy.
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Builder form: toggle metadata keys.
    pub fn with_metadata(mut self, write_metadata: bool) -> Self {
        self.write_metadata = write_metadata;
        self
    }
}
