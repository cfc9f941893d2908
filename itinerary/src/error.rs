//! Error type for planning runs.

use stategraph::{InvokeError, ValidationError};
use thiserror::Error;

/// Everything that can stop a plan: bad configuration, a malformed graph, a failed
/// run, or a final record that cannot be turned into a [`PlanResponse`](crate::PlanResponse).
#[derive(Debug, Error)]
pub enum Error {
    /// An environment variable or option could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid travel graph: {0}")]
    Validation(#[from] ValidationError),

    /// The run failed; the error carries the partial record.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// The run finished but the record lacks required response fields.
    #[error("cannot build response: {0}")]
    Response(String),
}

impl Error {
    pub(crate) fn config(var: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Error::Config(format!("{}={:?}: {}", var, value, reason))
    }
}
