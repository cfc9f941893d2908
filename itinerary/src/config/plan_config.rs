//! Plan config: step budget, random seed, verbosity. Can be filled from env / .env.

use std::str::FromStr;

use crate::Error;

use super::PlanOptions;

/// Step budget for a plan when `ITINERARY_STEP_BUDGET` is unset. A plan with one replan
/// takes ten node invocations.
pub const DEFAULT_PLAN_STEP_BUDGET: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanConfig {
    /// Maximum node invocations per plan.
    pub step_budget: usize,
    /// Seed for the shared random source; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Attach the logging middleware.
    pub verbose: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_PLAN_STEP_BUDGET,
            seed: None,
            verbose: false,
        }
    }
}

impl PlanConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `ITINERARY_STEP_BUDGET` (default 50), `ITINERARY_SEED`, `ITINERARY_VERBOSE`
    /// (`1`/`true`) are all optional; a value that does not parse is an error.
    pub fn from_env() -> Result<Self, Error> {
        let step_budget =
            parse_var::<usize>("ITINERARY_STEP_BUDGET")?.unwrap_or(DEFAULT_PLAN_STEP_BUDGET);
        if step_budget == 0 {
            return Err(Error::config("ITINERARY_STEP_BUDGET", "0", "must be positive"));
        }
        let seed = parse_var::<u64>("ITINERARY_SEED")?;
        let verbose = std::env::var("ITINERARY_VERBOSE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            step_budget,
            seed,
            verbose,
        })
    }

    /// Apply optional overrides from `PlanOptions`. Only set fields override.
    pub fn apply_options(&mut self, options: &PlanOptions) {
        if let Some(budget) = options.step_budget {
            self.step_budget = budget;
        }
        if options.seed.is_some() {
            self.seed = options.seed;
        }
        if options.verbose {
            self.verbose = true;
        }
    }
}

fn parse_var<T>(var: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::config(var, &raw, e)),
        Err(_) => Ok(None),
    }
}
