//! Travel planner binary: parse trip arguments, run the graph and print the plan.

use clap::Parser;
use itinerary::{render_report, run_with_options, Error, PlanOptions, PlanRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "itinerary")]
#[command(about = "Travel planner: weather + budget agents, merged itinerary, one replan on long delays")]
struct Args {
    /// Destination city or region.
    #[arg(long, default_value = "Goa")]
    destination: String,

    /// Travel date, e.g. 2025-12-20.
    #[arg(long, default_value = "2025-12-20")]
    date: String,

    /// Trip budget.
    #[arg(long, default_value_t = 45000)]
    budget: i64,

    /// Flight delay in hours; more than 6 triggers one replan.
    #[arg(long, default_value_t = 0)]
    delay: i64,

    /// Maximum node invocations (overrides ITINERARY_STEP_BUDGET).
    #[arg(long)]
    step_budget: Option<usize>,

    /// Seed for reproducible weather and plan choices (overrides ITINERARY_SEED).
    #[arg(long)]
    seed: Option<u64>,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,

    /// Log every node enter/exit.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let request = PlanRequest {
        destination: args.destination,
        travel_date: args.date,
        budget: args.budget,
        flight_delay_hours: args.delay,
    };
    let options = PlanOptions {
        step_budget: args.step_budget,
        seed: args.seed,
        verbose: args.verbose,
    };

    let plan = match run_with_options(request, &options).await {
        Ok(plan) => plan,
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_report(&plan));
    }
}

fn report_error(e: &Error) {
    eprintln!("error: {}", e);
    if let Error::Invoke(invoke) = e {
        eprintln!("kind: {}", invoke.kind().as_str());
        if let Ok(partial) = serde_json::to_string_pretty(invoke.record()) {
            eprintln!("partial record: {}", partial);
        }
    }
}
