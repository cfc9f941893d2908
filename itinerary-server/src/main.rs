//! HTTP server exposing the travel planner as `POST /plan`.
//!
//! Configure via env: `BIND_ADDR`, `ITINERARY_STEP_BUDGET`, `ITINERARY_SEED`,
//! `ITINERARY_VERBOSE`, `LOG_FILE`, `RUST_LOG`. Load .env with dotenv.

use std::sync::{Arc, Mutex};

use itinerary::{build_travel_graph, shared_rng};
use itinerary_server::{app, AppState, ServerConfig};
use tracing::info;

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing to stdout; when `LOG_FILE` is set, also appends plain-text logs
/// to that file.
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,itinerary_server=debug,stategraph=debug")
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(filter.clone());
    let registry = tracing_subscriber::registry().with(stdout_layer);

    match std::env::var("LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter);
            registry.with(file_layer).init();
            info!(path = %path, "logging to file");
        }
        Err(_) => registry.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    init_tracing()?;

    let config = ServerConfig::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        step_budget = config.plan.step_budget,
        seed = ?config.plan.seed,
        verbose = config.plan.verbose,
        "config loaded"
    );

    // A malformed graph stops startup here.
    let graph = build_travel_graph(shared_rng(config.plan.seed), config.plan.verbose)?;
    let state = Arc::new(AppState {
        graph,
        step_budget: config.plan.step_budget,
    });

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
