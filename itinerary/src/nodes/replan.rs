//! Decides whether the trip needs one more planning pass.

use async_trait::async_trait;
use stategraph::{Node, NodeError, Patch, Record};

use super::fields::*;

/// Delays longer than this trigger a replan.
pub const REPLAN_DELAY_HOURS: i64 = 6;

/// Replans once when the flight is delayed by more than [`REPLAN_DELAY_HOURS`].
///
/// Writes `replan_required` and `replan_count`.
#[derive(Debug, Default)]
pub struct ReplanningAgent;

#[async_trait]
impl Node for ReplanningAgent {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        let delay = record.get_i64(FLIGHT_DELAY_HOURS).unwrap_or(0);
        let count = record.get_i64(REPLAN_COUNT).unwrap_or(0);

        let replan = delay > REPLAN_DELAY_HOURS && count == 0;
        let count = if replan { count + 1 } else { count };
        tracing::debug!(delay, replan, "replanning decision");

        Ok(Patch::new()
            .with(REPLAN_REQUIRED, replan)
            .with(REPLAN_COUNT, count))
    }
}
