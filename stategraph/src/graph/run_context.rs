//! Per-invoke run context: current record, step governor, join-wait sets and the
//! optional stream sender.
//!
//! Created at the start of `invoke`/`stream`, owned exclusively by that call and
//! dropped when it returns.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::record::Record;
use crate::stream::{StreamEvent, StreamMode};

use super::step_governor::StepGovernor;
use super::synchronizer::Synchronizer;

pub(crate) struct RunContext<'g> {
    /// Record as merged so far.
    pub(crate) record: Record,
    pub(crate) governor: StepGovernor,
    pub(crate) sync: Synchronizer<'g>,
    /// Optional sender for streaming events.
    pub(crate) stream_tx: Option<mpsc::Sender<StreamEvent>>,
    /// Enabled stream modes.
    pub(crate) stream_mode: HashSet<StreamMode>,
}

impl<'g> RunContext<'g> {
    pub(crate) async fn emit_update(&self, node_id: &str, patch: &Record) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&StreamMode::Updates) {
                let _ = tx
                    .send(StreamEvent::Updates {
                        node_id: node_id.to_string(),
                        patch: patch.clone(),
                    })
                    .await;
            }
        }
    }

    pub(crate) fn streams_values(&self) -> bool {
        self.stream_tx.is_some() && self.stream_mode.contains(&StreamMode::Values)
    }

    /// Sends `record` as a `Values` event when that mode is enabled.
    pub(crate) async fn emit_values(&self, record: &Record) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&StreamMode::Values) {
                let _ = tx.send(StreamEvent::Values(record.clone())).await;
            }
        }
    }
}
