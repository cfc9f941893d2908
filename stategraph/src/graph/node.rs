//! Node contract: one computation unit of the graph.
//!
//! A node reads an immutable snapshot of the record and returns a patch. It never
//! mutates shared state; the engine merges the patch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::record::{Patch, Record};

/// One step of the graph: receive a read-only record, return a patch.
///
/// Nodes that become ready in the same step run concurrently against the same
/// snapshot, so their patches must write disjoint overwrite-governed fields.
/// Implementations must not retain references to the record after returning.
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError>;
}

/// Adapts a synchronous closure to [`Node`].
///
/// ```rust
/// use stategraph::{FnNode, Patch, Record};
///
/// let node = FnNode::new(|r: &Record| {
///     let n = r.get_i64("n").unwrap_or(0);
///     Ok(Patch::new().with("n", n + 1))
/// });
/// # let _ = node;
/// ```
pub struct FnNode<F> {
    f: F,
}

impl<F> FnNode<F>
where
    F: Fn(&Record) -> Result<Patch, NodeError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Shorthand for `Arc::new(FnNode::new(f))`, the form `StateGraph::add_node` takes.
    pub fn arc(f: F) -> Arc<dyn Node> {
        Arc::new(Self::new(f))
    }
}

impl<F> fmt::Debug for FnNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Node for FnNode<F>
where
    F: Fn(&Record) -> Result<Patch, NodeError> + Send + Sync + 'static,
{
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        (self.f)(record)
    }
}
