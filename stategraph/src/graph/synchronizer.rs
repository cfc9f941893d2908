//! Fan-in barrier: a join node runs only once every required predecessor has
//! completed in the current pass.
//!
//! The required set of a join is the set of distinct sources of its static incoming
//! edges (fixed at compile time). Each run keeps its own "seen" sets; a barrier
//! clears exactly when seen ⊇ required, then resets so the join can fire again on a
//! later pass of a cycle.

use std::collections::{BTreeSet, HashMap};

/// Per-run barrier state for every join of one compiled graph.
pub(crate) struct Synchronizer<'g> {
    required: &'g HashMap<String, BTreeSet<String>>,
    seen: HashMap<&'g str, BTreeSet<String>>,
}

impl<'g> Synchronizer<'g> {
    pub(crate) fn new(required: &'g HashMap<String, BTreeSet<String>>) -> Self {
        Self {
            required,
            seen: HashMap::new(),
        }
    }

    /// Records that `from` completed and feeds `join`. Returns true when this arrival
    /// clears the barrier; the seen set is then reset for the next pass.
    pub(crate) fn arrive(&mut self, join: &str, from: &str) -> bool {
        let joins: &'g HashMap<String, BTreeSet<String>> = self.required;
        let Some((join_id, required)) = joins.get_key_value(join) else {
            return true;
        };
        let seen = self.seen.entry(join_id.as_str()).or_default();
        seen.insert(from.to_string());
        if required.is_subset(seen) {
            seen.clear();
            true
        } else {
            false
        }
    }

    /// Joins whose barrier is partially filled, with the predecessors still missing.
    /// Sorted by join id.
    pub(crate) fn pending(&self) -> Vec<(String, Vec<String>)> {
        let mut pending: Vec<(String, Vec<String>)> = self
            .seen
            .iter()
            .filter(|(_, seen)| !seen.is_empty())
            .filter_map(|(join, seen)| {
                let required = self.required.get(*join)?;
                let missing: Vec<String> = required.difference(seen).cloned().collect();
                Some((join.to_string(), missing))
            })
            .collect();
        pending.sort();
        pending
    }
}
