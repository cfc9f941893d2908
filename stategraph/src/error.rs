//! Run-time error types.
//!
//! [`NodeError`] is what a node returns when its own logic fails. [`InvokeError`] is what
//! `CompiledStateGraph::invoke` returns; every variant carries the partial record so the
//! caller can see how far the run got. Compile-time problems are
//! [`ValidationError`](crate::graph::ValidationError) and never reach a run.

use thiserror::Error;

use crate::record::Record;

/// Node-level failure. Returned by `Node::run`; the engine wraps it in
/// [`InvokeError::NodeFailure`] and aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// A field the node needs is absent from the record.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A field is present but unusable (wrong type, out of range, ...).
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// Any other failure of the node's own logic.
    #[error("node failed: {0}")]
    Failed(String),
}

impl NodeError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Coarse classification of an [`InvokeError`], for transports that map each kind to
/// a distinct response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NodeFailure,
    MergeConflict,
    StepBudgetExceeded,
    IncompleteJoin,
    InvalidHistory,
    UnroutableLabel,
}

impl ErrorKind {
    /// Stable snake_case code, e.g. `"step_budget_exceeded"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NodeFailure => "node_failure",
            ErrorKind::MergeConflict => "merge_conflict",
            ErrorKind::StepBudgetExceeded => "step_budget_exceeded",
            ErrorKind::IncompleteJoin => "incomplete_join",
            ErrorKind::InvalidHistory => "invalid_history",
            ErrorKind::UnroutableLabel => "unroutable_label",
        }
    }
}

/// Error returned by `invoke`. Never retried by the engine.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// A node function failed. `record` is the state as of just before that node ran.
    #[error("node `{node_id}` failed: {cause}")]
    NodeFailure {
        node_id: String,
        #[source]
        cause: NodeError,
        record: Record,
    },

    /// Two patches computed in the same step both wrote an overwrite-governed field.
    #[error("merge conflict on field `{field}` (second writer: `{node_id}`)")]
    MergeConflict {
        field: String,
        node_id: String,
        record: Record,
    },

    /// The run needed more node invocations than the step budget allows.
    #[error("step budget of {budget} node invocations exceeded")]
    StepBudgetExceeded { budget: usize, record: Record },

    /// Strict join policy: the run ended while a join still waited for predecessors.
    #[error("join `{node_id}` never ran; missing predecessors: {}", .missing.join(", "))]
    IncompleteJoin {
        node_id: String,
        missing: Vec<String>,
        record: Record,
    },

    /// The history companion of an append-to-history field holds a non-array value.
    #[error("history field `{field}` is not an array (written by `{node_id}`)")]
    InvalidHistory {
        field: String,
        node_id: String,
        record: Record,
    },

    /// A router returned a label it did not declare.
    #[error("router on `{node_id}` returned undeclared label `{label}`")]
    UnroutableLabel {
        node_id: String,
        label: String,
        record: Record,
    },
}

impl InvokeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvokeError::NodeFailure { .. } => ErrorKind::NodeFailure,
            InvokeError::MergeConflict { .. } => ErrorKind::MergeConflict,
            InvokeError::StepBudgetExceeded { .. } => ErrorKind::StepBudgetExceeded,
            InvokeError::IncompleteJoin { .. } => ErrorKind::IncompleteJoin,
            InvokeError::InvalidHistory { .. } => ErrorKind::InvalidHistory,
            InvokeError::UnroutableLabel { .. } => ErrorKind::UnroutableLabel,
        }
    }

    /// Partial record at the point the run stopped.
    pub fn record(&self) -> &Record {
        match self {
            InvokeError::NodeFailure { record, .. }
            | InvokeError::MergeConflict { record, .. }
            | InvokeError::StepBudgetExceeded { record, .. }
            | InvokeError::IncompleteJoin { record, .. }
            | InvokeError::InvalidHistory { record, .. }
            | InvokeError::UnroutableLabel { record, .. } => record,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            InvokeError::NodeFailure { record, .. }
            | InvokeError::MergeConflict { record, .. }
            | InvokeError::StepBudgetExceeded { record, .. }
            | InvokeError::IncompleteJoin { record, .. }
            | InvokeError::InvalidHistory { record, .. }
            | InvokeError::UnroutableLabel { record, .. } => record,
        }
    }
}
