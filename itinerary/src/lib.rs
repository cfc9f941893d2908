//! itinerary: a travel planner built on the stategraph engine.
//!
//! An orchestrator fans out to a weather agent and a budget agent, a merge node joins
//! them into `final_itinerary`, and a replanning agent sends the run around once more
//! when the flight is badly delayed. Superseded itineraries are kept in
//! `itinerary_history` by the engine's append-to-history merge rule.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), itinerary::Error> {
//! let request = itinerary::PlanRequest {
//!     budget: 85000,
//!     flight_delay_hours: 7,
//!     ..Default::default()
//! };
//! let plan = itinerary::run(request).await?;
//! for line in &plan.final_itinerary {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod graph;
mod middleware;
pub mod nodes;
mod plan;
mod run;

pub use config::{PlanConfig, PlanOptions, DEFAULT_PLAN_STEP_BUDGET};
pub use error::Error;
pub use graph::{build_travel_graph, needs_replan, travel_state_graph};
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use nodes::{shared_rng, SharedRng};
pub use plan::{plan_trip, PlanRequest, PlanResponse};
pub use run::{render_report, run, run_with_config, run_with_options};

#[cfg(test)]
mod tests;
