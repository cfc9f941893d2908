//! Optional overrides for a planning run (CLI args or programmatic).
//!
//! Used by [`PlanConfig::apply_options`](super::PlanConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

/// Optional overrides: step budget, seed, verbose logging.
///
/// Only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct PlanOptions {
    /// Override the step budget (node invocations per run).
    pub step_budget: Option<usize>,
    /// Seed for weather and budget choices; makes runs reproducible.
    pub seed: Option<u64>,
    /// Log every node enter/exit.
    pub verbose: bool,
}
