//! Top node: normalizes the trip inputs.

use async_trait::async_trait;
use stategraph::{Node, NodeError, Patch, Record};

use super::fields::*;

pub const DEFAULT_DESTINATION: &str = "Goa";
pub const DEFAULT_TRAVEL_DATE: &str = "2025-12-20";
pub const DEFAULT_BUDGET: i64 = 20000;

/// Proposes defaults for every trip input.
///
/// The inputs are declared first-write-wins, so the defaults only land when the caller
/// left a field out, and a replan pass never overwrites them. `replan_count` is an
/// ordinary field and is only proposed while absent.
#[derive(Debug, Default)]
pub struct SupervisorOrchestrator;

#[async_trait]
impl Node for SupervisorOrchestrator {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        for field in [BUDGET, FLIGHT_DELAY_HOURS] {
            if let Some(v) = record.get(field) {
                if v.as_i64().is_none() {
                    return Err(NodeError::invalid(field, "expected an integer"));
                }
            }
        }

        let mut patch = Patch::new()
            .with(DESTINATION, DEFAULT_DESTINATION)
            .with(TRAVEL_DATE, DEFAULT_TRAVEL_DATE)
            .with(BUDGET, DEFAULT_BUDGET)
            .with(FLIGHT_DELAY_HOURS, 0);
        if !record.contains(REPLAN_COUNT) {
            patch.insert(REPLAN_COUNT, 0);
        }
        Ok(patch)
    }
}
