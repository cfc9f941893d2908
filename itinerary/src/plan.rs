//! Plan request/response types and a single planning run.

use serde::{Deserialize, Serialize};
use stategraph::{CompiledStateGraph, InvokeConfig, Record};

use crate::nodes::fields::*;
use crate::Error;

fn default_destination() -> String {
    "Goa".to_string()
}

fn default_travel_date() -> String {
    "2025-12-20".to_string()
}

fn default_budget() -> i64 {
    45000
}

/// Trip inputs. Every field is optional on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_travel_date")]
    pub travel_date: String,
    #[serde(default = "default_budget")]
    pub budget: i64,
    #[serde(default)]
    pub flight_delay_hours: i64,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            travel_date: default_travel_date(),
            budget: default_budget(),
            flight_delay_hours: 0,
        }
    }
}

impl PlanRequest {
    /// Initial record for a run.
    pub fn into_record(self) -> Record {
        Record::new()
            .with(DESTINATION, self.destination)
            .with(TRAVEL_DATE, self.travel_date)
            .with(BUDGET, self.budget)
            .with(FLIGHT_DELAY_HOURS, self.flight_delay_hours)
    }
}

/// The final plan, as returned by `POST /plan` and printed by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub destination: String,
    pub travel_date: String,
    pub budget: i64,
    #[serde(default)]
    pub weather_summary: Option<String>,
    #[serde(default)]
    pub budget_tier: Option<String>,
    #[serde(default)]
    pub final_itinerary: Vec<String>,
    /// Superseded itineraries, oldest first.
    #[serde(default)]
    pub itinerary_history: Vec<Vec<String>>,
    #[serde(default)]
    pub replan_count: i64,
}

impl PlanResponse {
    /// Reads the response fields from a final record; other fields are ignored.
    pub fn from_record(record: &Record) -> Result<Self, Error> {
        serde_json::from_value(record.clone().into_value())
            .map_err(|e| Error::Response(e.to_string()))
    }
}

/// Runs one plan on `graph` within `step_budget` node invocations.
pub async fn plan_trip(
    graph: &CompiledStateGraph,
    request: PlanRequest,
    step_budget: usize,
) -> Result<PlanResponse, Error> {
    tracing::info!(
        destination = %request.destination,
        budget = request.budget,
        delay = request.flight_delay_hours,
        "planning trip"
    );
    let record = graph
        .invoke(
            request.into_record(),
            Some(InvokeConfig::with_step_budget(step_budget)),
        )
        .await?;
    PlanResponse::from_record(&record)
}
