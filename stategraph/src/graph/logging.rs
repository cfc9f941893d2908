//! Logging helpers for graph execution.
//!
//! Structured `tracing` events for node execution, merges, routing and run outcome.

use crate::error::InvokeError;

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id = node_id, step, "Starting node execution");
}

/// Log node execution completion with the fields its patch writes.
pub fn log_node_complete(node_id: &str, patch_fields: usize) {
    tracing::debug!(node_id = node_id, patch_fields, "Node execution complete");
}

/// Log a router decision.
pub fn log_route(node_id: &str, label: &str) {
    tracing::debug!(node_id = node_id, label = label, "Routed");
}

/// Log a join that is still waiting for predecessors.
pub fn log_join_wait(join: &str, from: &str) {
    tracing::trace!(join = join, from = from, "Join waiting");
}

/// Log graph execution start.
pub fn log_graph_start(budget: usize) {
    tracing::info!(budget, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &InvokeError) {
    match error {
        InvokeError::StepBudgetExceeded { budget, .. } => {
            tracing::warn!(budget, "Step budget exhausted")
        }
        other => tracing::error!(kind = other.kind().as_str(), %other, "Graph execution error"),
    }
}
