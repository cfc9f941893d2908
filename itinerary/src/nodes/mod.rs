//! Travel planner nodes.
//!
//! Five nodes share one [`Record`]: the orchestrator normalizes inputs, the weather
//! and budget agents fan out, `supervisor_merge` joins them into `final_itinerary`,
//! and the replanning agent decides whether to go around once more.
//!
//! Randomness comes from a [`SharedRng`] so a seeded run is reproducible.

mod budget;
mod merge;
mod orchestrator;
mod replan;
mod weather;

use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use stategraph::{NodeError, Record};

pub use budget::{BudgetAgent, BudgetTier};
pub use merge::SupervisorMerge;
pub use orchestrator::SupervisorOrchestrator;
pub use replan::ReplanningAgent;
pub use weather::{WeatherAgent, WEATHER_SUMMARIES};

/// Record field names used by the planner.
pub mod fields {
    pub const DESTINATION: &str = "destination";
    pub const TRAVEL_DATE: &str = "travel_date";
    pub const BUDGET: &str = "budget";
    pub const FLIGHT_DELAY_HOURS: &str = "flight_delay_hours";
    pub const WEATHER_SUMMARY: &str = "weather_summary";
    pub const WEATHER_TEMPERATURE: &str = "weather_temperature";
    pub const WEATHER_ACTIVITIES: &str = "weather_activities";
    pub const BUDGET_TIER: &str = "budget_tier";
    pub const BUDGET_PLAN: &str = "budget_plan";
    pub const FINAL_ITINERARY: &str = "final_itinerary";
    pub const ITINERARY_HISTORY: &str = "itinerary_history";
    pub const REPLAN_REQUIRED: &str = "replan_required";
    pub const REPLAN_COUNT: &str = "replan_count";
}

/// Random source shared by the weather and budget agents.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Seeded when `seed` is set, from OS entropy otherwise.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Arc::new(Mutex::new(rng))
}

/// A poisoned lock still holds a usable generator.
pub(crate) fn lock_rng(rng: &SharedRng) -> MutexGuard<'_, StdRng> {
    rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn require_str<'r>(record: &'r Record, field: &str) -> Result<&'r str, NodeError> {
    match record.get(field) {
        None => Err(NodeError::missing(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(NodeError::invalid(field, "expected a string")),
    }
}

pub(crate) fn require_i64(record: &Record, field: &str) -> Result<i64, NodeError> {
    match record.get(field) {
        None => Err(NodeError::missing(field)),
        Some(v) => v
            .as_i64()
            .ok_or_else(|| NodeError::invalid(field, "expected an integer")),
    }
}

/// Reads a list of strings, e.g. `budget_plan`.
pub(crate) fn require_lines(record: &Record, field: &str) -> Result<Vec<String>, NodeError> {
    let items = record
        .get(field)
        .ok_or_else(|| NodeError::missing(field))?
        .as_array()
        .ok_or_else(|| NodeError::invalid(field, "expected a list"))?;
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| NodeError::invalid(field, "expected a list of strings"))
        })
        .collect()
}
