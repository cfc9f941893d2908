//! Merge policy: per-field rules for folding a node's patch into the record.
//!
//! Every field is governed by exactly one [`MergeRule`] for the lifetime of a compiled
//! graph; undeclared fields use [`MergeRule::Overwrite`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;

use crate::graph::ValidationError;
use crate::record::{Patch, Record};

static OVERWRITE: MergeRule = MergeRule::Overwrite;

/// How a patch value combines with the value already in the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MergeRule {
    /// The patch value replaces the old one.
    #[default]
    Overwrite,
    /// Like `Overwrite`, but the superseded value is first pushed onto the array in
    /// `history`. The history never contains the value currently installed.
    AppendToHistory { history: String },
    /// The patch value is written only when the field is absent.
    FirstWriteWins,
}

impl MergeRule {
    pub fn append_to_history(history: impl Into<String>) -> Self {
        MergeRule::AppendToHistory {
            history: history.into(),
        }
    }

    /// Rules under which two writers in the same step cannot both win.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, MergeRule::FirstWriteWins)
    }
}

/// Failure while merging one patch; mapped to `InvokeError` by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MergeError {
    Conflict { field: String, node_id: String },
    InvalidHistory { field: String, node_id: String },
}

/// Field → rule table, fixed at compile time.
#[derive(Debug, Clone, Default)]
pub struct MergePolicy {
    rules: HashMap<String, MergeRule>,
}

impl MergePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rule for `field`. Re-declaring the same rule is harmless; a
    /// different rule is `ConflictingMergeRule`.
    pub fn declare(
        &mut self,
        field: impl Into<String>,
        rule: MergeRule,
    ) -> Result<(), ValidationError> {
        let field = field.into();
        match self.rules.get(&field) {
            Some(existing) if *existing != rule => Err(ValidationError::ConflictingMergeRule(field)),
            _ => {
                self.rules.insert(field, rule);
                Ok(())
            }
        }
    }

    pub fn rule_for(&self, field: &str) -> &MergeRule {
        self.rules.get(field).unwrap_or(&OVERWRITE)
    }

    /// Checks that history companions are plain fields: not the field itself and not
    /// themselves history-tracked.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        for (field, rule) in &self.rules {
            if let MergeRule::AppendToHistory { history } = rule {
                if history == field {
                    return Err(ValidationError::InvalidMergeRule {
                        field: field.clone(),
                        reason: "history companion is the field itself".into(),
                    });
                }
                if matches!(self.rule_for(history), MergeRule::AppendToHistory { .. }) {
                    return Err(ValidationError::InvalidMergeRule {
                        field: field.clone(),
                        reason: format!("history companion `{}` is itself history-tracked", history),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fields `patch` writes, each with whether the write is exclusive. A history-tracked
    /// field also writes its companion.
    fn writes<'a>(&'a self, patch: &'a Patch) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        patch.keys().flat_map(move |field| {
            let rule = self.rule_for(field);
            let companion = match rule {
                MergeRule::AppendToHistory { history } => Some((history.as_str(), true)),
                _ => None,
            };
            std::iter::once((field, rule.is_exclusive())).chain(companion)
        })
    }

    /// Fails when two patches of one step write the same field and either write is
    /// exclusive. `patches` is in frontier order; the reported node is the second writer.
    pub(crate) fn check_disjoint(&self, patches: &[(String, Patch)]) -> Result<(), MergeError> {
        let mut writers: HashMap<&str, (&str, bool)> = HashMap::new();
        for (node_id, patch) in patches {
            for (field, exclusive) in self.writes(patch) {
                match writers.entry(field) {
                    Entry::Vacant(slot) => {
                        slot.insert((node_id.as_str(), exclusive));
                    }
                    Entry::Occupied(mut slot) => {
                        let (writer, seen_exclusive) = slot.get_mut();
                        if *writer == node_id.as_str() {
                            *seen_exclusive |= exclusive;
                        } else if *seen_exclusive || exclusive {
                            return Err(MergeError::Conflict {
                                field: field.to_string(),
                                node_id: node_id.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Folds `patch` into `record`, field by field in field-name order.
    pub(crate) fn apply(
        &self,
        record: &mut Record,
        node_id: &str,
        patch: Patch,
    ) -> Result<(), MergeError> {
        for (field, value) in patch {
            match self.rule_for(&field) {
                MergeRule::Overwrite => {
                    record.insert(field, value);
                }
                MergeRule::FirstWriteWins => {
                    if !record.contains(&field) {
                        record.insert(field, value);
                    }
                }
                MergeRule::AppendToHistory { history } => {
                    // Push the old value before installing the new one.
                    if let Some(previous) = record.remove(&field) {
                        match record.get_mut(history) {
                            Some(Value::Array(items)) => items.push(previous),
                            Some(_) => {
                                record.insert(field, previous);
                                return Err(MergeError::InvalidHistory {
                                    field: history.clone(),
                                    node_id: node_id.to_string(),
                                });
                            }
                            None => {
                                record.insert(history.clone(), Value::Array(vec![previous]));
                            }
                        }
                    }
                    record.insert(field, value);
                }
            }
        }
        Ok(())
    }
}
