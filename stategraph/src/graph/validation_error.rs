//! Graph validation error.
//!
//! Returned by `StateGraph::compile` when the node/edge registry is malformed. A graph
//! that fails validation never runs.

use thiserror::Error;

/// Error when compiling a state graph (unknown node, incomplete label table, ...).
///
/// Returned by `StateGraph::compile()`. Validation ensures every edge endpoint exists,
/// every conditional label table is exhaustive and reaches `END`, every node is
/// reachable from `START` and every field has exactly one merge rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The same node id was passed to `add_node` twice.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// A node was registered under `START` or `END`.
    #[error("node id is reserved: {0}")]
    ReservedNodeId(String),

    /// An edge or label table references an id that was not registered via `add_node`.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Static edge into `START`, out of `END`, or declared twice.
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },

    /// No edge leaves `START`.
    #[error("graph must have at least one edge from START")]
    MissingEntry,

    /// A node has no outgoing edge; use `add_edge(id, END)` to terminate a branch.
    #[error("node `{0}` has no outgoing edge")]
    DeadEnd(String),

    /// A node cannot be reached from `START`.
    #[error("node `{0}` is not reachable from START")]
    Unreachable(String),

    /// A conditional label table has no label leading to `END`.
    #[error("conditional edges on `{node}` have no route to END")]
    MissingTerminal { node: String },

    /// The router declares a label that its label table does not map.
    #[error("conditional edges on `{node}` do not map label `{label}`")]
    UnmappedLabel { node: String, label: String },

    /// `add_conditional_edges` was called twice for the same source.
    #[error("node `{0}` already has conditional edges")]
    DuplicateConditional(String),

    /// A node has both static and conditional outgoing edges.
    #[error("node `{0}` mixes static and conditional outgoing edges")]
    MixedEdges(String),

    /// A field was declared with two different merge rules.
    #[error("field `{0}` declared with conflicting merge rules")]
    ConflictingMergeRule(String),

    /// A merge rule is unusable as declared (e.g. history companion equals the field).
    #[error("invalid merge rule for `{field}`: {reason}")]
    InvalidMergeRule { field: String, reason: String },
}
