//! Router: picks the next step after a node with conditional edges.
//!
//! A router is a pure function of the record that returns a label. The label is
//! resolved through the label table compiled from `add_conditional_edges` into a
//! [`Next`] target.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::record::Record;

/// Routing predicate attached to one node's conditional edges.
///
/// `labels` is the static declaration of every label `route` may return; `compile`
/// checks the label table against it. `route` must be deterministic and side-effect free.
pub trait Router: Send + Sync {
    fn labels(&self) -> Vec<String>;

    fn route(&self, record: &Record) -> String;
}

/// Adapts a closure plus its declared labels to [`Router`].
pub struct FnRouter<F> {
    labels: Vec<String>,
    f: F,
}

impl<F> FnRouter<F>
where
    F: Fn(&Record) -> String + Send + Sync + 'static,
{
    pub fn new<I, L>(labels: I, f: F) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            f,
        }
    }

    pub fn arc<I, L>(labels: I, f: F) -> Arc<dyn Router>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Arc::new(Self::new(labels, f))
    }
}

impl<F> fmt::Debug for FnRouter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRouter")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl<F> Router for FnRouter<F>
where
    F: Fn(&Record) -> String + Send + Sync + 'static,
{
    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn route(&self, record: &Record) -> String {
        (self.f)(record)
    }
}

/// Resolved target of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Run this node next.
    Node(String),
    /// Re-enter the graph: run `START`'s successors again.
    Start,
    /// Terminate this branch.
    End,
}

/// Compiled conditional edge set: router plus its label table.
#[derive(Clone)]
pub(crate) struct Branch {
    pub(crate) router: Arc<dyn Router>,
    pub(crate) table: HashMap<String, Next>,
}

impl Branch {
    /// Evaluates the router and resolves its label. `Err(label)` when the label is not
    /// in the table (the router returned something it did not declare).
    pub(crate) fn resolve(&self, record: &Record) -> Result<(String, &Next), String> {
        let label = self.router.route(record);
        match self.table.get(&label) {
            Some(next) => Ok((label, next)),
            None => Err(label),
        }
    }
}
