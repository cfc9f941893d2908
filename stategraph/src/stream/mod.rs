//! Streaming types for graph runs.
//!
//! Defines stream modes and events emitted by `CompiledStateGraph::stream` as each
//! node's patch is merged.

use crate::error::InvokeError;
use crate::record::{Patch, Record};

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit the full record after each node's patch is merged.
    Values,
    /// Emit each node's patch as it is merged.
    Updates,
}

/// Event emitted while running a graph. The stream ends after the last node, or
/// right after an `Error` event.
#[derive(Clone, Debug)]
pub enum StreamEvent {
    /// Full record after a node's patch was merged.
    Values(Record),
    /// Patch produced by a node.
    Updates { node_id: String, patch: Patch },
    /// The run failed; carries the partial record.
    Error(InvokeError),
}
