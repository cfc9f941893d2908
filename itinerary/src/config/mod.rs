//! Configuration types for planning runs.
//!
//! Re-exports [`PlanConfig`] and [`PlanOptions`].

mod plan_config;
mod plan_options;

pub use plan_config::{PlanConfig, DEFAULT_PLAN_STEP_BUDGET};
pub use plan_options::PlanOptions;
