//! Travel planner graph wiring.
//!
//! ```text
//! START → supervisor_orchestrator → { weather_agent, budget_agent } → supervisor_merge
//!       → replanning_agent → needs_replan (REPLAN → supervisor_orchestrator | DONE → END)
//! ```

use std::sync::Arc;

use stategraph::{
    CompiledStateGraph, FnRouter, MergeRule, Record, Router, StateGraph, ValidationError, END,
    START,
};

use crate::middleware::WithNodeLogging;
use crate::nodes::fields::*;
use crate::nodes::{
    BudgetAgent, ReplanningAgent, SharedRng, SupervisorMerge, SupervisorOrchestrator,
    WeatherAgent,
};

pub const SUPERVISOR_ORCHESTRATOR: &str = "supervisor_orchestrator";
pub const WEATHER_AGENT: &str = "weather_agent";
pub const BUDGET_AGENT: &str = "budget_agent";
pub const SUPERVISOR_MERGE: &str = "supervisor_merge";
pub const REPLANNING_AGENT: &str = "replanning_agent";

pub const REPLAN: &str = "REPLAN";
pub const DONE: &str = "DONE";

/// Routes back to the orchestrator while `replan_required` is set.
pub fn needs_replan() -> Arc<dyn Router> {
    FnRouter::arc([REPLAN, DONE], |record: &Record| {
        if record.get_bool(REPLAN_REQUIRED) == Some(true) {
            REPLAN.to_string()
        } else {
            DONE.to_string()
        }
    })
}

/// Uncompiled travel graph with its merge rules declared.
///
/// Trip inputs are first-write-wins so neither defaults nor replans overwrite them;
/// `final_itinerary` keeps superseded plans in `itinerary_history`.
pub fn travel_state_graph(rng: SharedRng) -> StateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_node(SUPERVISOR_ORCHESTRATOR, Arc::new(SupervisorOrchestrator))
        .add_node(WEATHER_AGENT, Arc::new(WeatherAgent::new(rng.clone())))
        .add_node(BUDGET_AGENT, Arc::new(BudgetAgent::new(rng)))
        .add_node(SUPERVISOR_MERGE, Arc::new(SupervisorMerge))
        .add_node(REPLANNING_AGENT, Arc::new(ReplanningAgent))
        .add_edge(START, SUPERVISOR_ORCHESTRATOR)
        .add_edge(SUPERVISOR_ORCHESTRATOR, WEATHER_AGENT)
        .add_edge(SUPERVISOR_ORCHESTRATOR, BUDGET_AGENT)
        .add_edge(WEATHER_AGENT, SUPERVISOR_MERGE)
        .add_edge(BUDGET_AGENT, SUPERVISOR_MERGE)
        .add_edge(SUPERVISOR_MERGE, REPLANNING_AGENT)
        .add_conditional_edges(
            REPLANNING_AGENT,
            needs_replan(),
            [(REPLAN, SUPERVISOR_ORCHESTRATOR), (DONE, END)],
        );

    for field in [DESTINATION, TRAVEL_DATE, BUDGET, FLIGHT_DELAY_HOURS] {
        graph.add_merge_rule(field, MergeRule::FirstWriteWins);
    }
    graph.add_merge_rule(
        FINAL_ITINERARY,
        MergeRule::append_to_history(ITINERARY_HISTORY),
    );
    graph
}

/// Compiles the travel graph, with node logging when `verbose`.
pub fn build_travel_graph(
    rng: SharedRng,
    verbose: bool,
) -> Result<CompiledStateGraph, ValidationError> {
    let graph = travel_state_graph(rng);
    if verbose {
        graph.with_node_logging().compile()
    } else {
        graph.compile()
    }
}
