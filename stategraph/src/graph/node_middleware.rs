//! Node middleware: wraps every node call of a compiled graph.
//!
//! Attach with `StateGraph::with_middleware` before `compile`. The middleware receives
//! the node id, the snapshot the node will read and the not-yet-polled node call.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::NodeError;
use crate::record::{Patch, Record};

/// Pending node call handed to middleware. Await it to run the node.
pub type NodeCall<'a> = BoxFuture<'a, Result<Patch, NodeError>>;

/// Around-advice for node execution (logging, timing, patch inspection).
///
/// Implementations must await `call` at most once and should return its result
/// unchanged unless they deliberately rewrite the patch.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        record: &Record,
        call: NodeCall<'_>,
    ) -> Result<Patch, NodeError>;
}
