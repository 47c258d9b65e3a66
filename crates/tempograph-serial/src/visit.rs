//! # Visit Tracking
//!
//! Per-encode-call bookkeeping of which object bodies have been emitted,
//! used to short-circuit cycles and shared references. One tracker lives for
//! exactly one top-level encode call and is discarded with it — there is no
//! process-wide visit state.
//!
//! Two layers of marking:
//!
//! - **active** — identities currently on the encoding stack. An identity
//!   reached while active is a cycle; the marker is released when the
//!   subtree closes, on success and failure alike, so a failed call never
//!   leaves stale markers behind.
//! - **completed** — identities whose full body was already emitted in this
//!   pass. Re-encountering one (a shared, non-cyclic reference) also yields
//!   a reference marker instead of a duplicate body.

use std::collections::HashSet;

use tempograph_model::ObjectIdentity;

/// Outcome of [`VisitTracker::begin_visit`]. Both variants carry the
/// identity string used as the wire reference id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// First encounter in this pass; encode the full body, then call
    /// [`VisitTracker::end_visit`] exactly once.
    Fresh(String),
    /// Already on the stack or already emitted; emit a reference marker and
    /// do not call `end_visit` for this encounter.
    AlreadyVisited(String),
}

/// Visit state for one top-level encode call.
#[derive(Debug, Default)]
pub struct VisitTracker {
    active: HashSet<ObjectIdentity>,
    completed: HashSet<ObjectIdentity>,
}

impl VisitTracker {
    /// A fresh tracker for one top-level call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of encoding `identity`.
    pub fn begin_visit(&mut self, identity: &ObjectIdentity) -> Visit {
        let ref_id = identity.to_string();
        if self.active.contains(identity) || self.completed.contains(identity) {
            return Visit::AlreadyVisited(ref_id);
        }
        self.active.insert(identity.clone());
        Visit::Fresh(ref_id)
    }

    /// Close the scoped visit opened by a `Fresh` result. Must run on the
    /// error path too, before the failure propagates.
    pub fn end_visit(&mut self, identity: &ObjectIdentity) {
        if self.active.remove(identity) {
            self.completed.insert(identity.clone());
        }
    }
}
