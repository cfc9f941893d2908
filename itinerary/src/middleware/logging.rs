//! Logging middleware that traces node enter/exit around each node call.

use async_trait::async_trait;
use stategraph::{NodeCall, NodeError, NodeMiddleware, Patch, Record};

/// Middleware that logs node enter/exit around each node call.
///
/// Events go through `tracing`, so they land on stderr with the rest of the logs and
/// normal output (the itinerary) can be redirected separately.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        record: &Record,
        call: NodeCall<'_>,
    ) -> Result<Patch, NodeError> {
        tracing::info!(node = node_id, fields = record.len(), "enter");
        let result = call.await;
        match &result {
            Ok(patch) => {
                let written: Vec<&str> = patch.keys().collect();
                tracing::info!(node = node_id, ?written, "exit");
            }
            Err(e) => tracing::warn!(node = node_id, error = %e, "exit with error"),
        }
        result
    }
}
