//! Run entry points: run with default config, run_with_config, or run_with_options.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`] and [`render_report`].

mod report;
mod run_with_config;

use crate::config::{PlanConfig, PlanOptions};
use crate::plan::{PlanRequest, PlanResponse};
use crate::Error;

pub use report::render_report;
pub use run_with_config::run_with_config;

/// Plan a trip with config from env (and `.env`).
pub async fn run(request: PlanRequest) -> Result<PlanResponse, Error> {
    dotenv::dotenv().ok();
    let config = PlanConfig::from_env()?;
    run_with_config(&config, request).await
}

/// Plan a trip with config from env and optional overrides (e.g. from CLI).
///
/// Loads `.env`, builds `PlanConfig` from env, applies `options`, then runs.
pub async fn run_with_options(
    request: PlanRequest,
    options: &PlanOptions,
) -> Result<PlanResponse, Error> {
    dotenv::dotenv().ok();
    let mut config = PlanConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, request).await
}
