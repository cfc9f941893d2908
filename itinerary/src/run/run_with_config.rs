//! Build the travel graph from a [`PlanConfig`] and plan one trip.

use crate::config::PlanConfig;
use crate::graph::build_travel_graph;
use crate::nodes::shared_rng;
use crate::plan::{plan_trip, PlanRequest, PlanResponse};
use crate::Error;

/// Compiles a fresh graph for `config` and runs `request` through it.
///
/// The server keeps one compiled graph instead; this is for one-shot callers.
pub async fn run_with_config(
    config: &PlanConfig,
    request: PlanRequest,
) -> Result<PlanResponse, Error> {
    let graph = build_travel_graph(shared_rng(config.seed), config.verbose)?;
    plan_trip(&graph, request, config.step_budget).await
}
