//! Plain-text rendering of a plan for the terminal.

use std::fmt::Write;

use crate::plan::PlanResponse;

/// Latest plan, previous plans (numbered from 1), then replan count, weather and tier.
pub fn render_report(plan: &PlanResponse) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "=== LATEST PLAN ===");
    for line in &plan.final_itinerary {
        let _ = writeln!(out, "  - {}", line);
    }

    let _ = writeln!(out, "\n=== PREVIOUS PLANS ===");
    for (idx, old) in plan.itinerary_history.iter().enumerate() {
        let _ = writeln!(out, "\n  Plan #{}:", idx + 1);
        for line in old {
            let _ = writeln!(out, "    - {}", line);
        }
    }

    let _ = writeln!(out, "\nreplan_count: {}", plan.replan_count);
    let _ = writeln!(
        out,
        "weather: {}",
        plan.weather_summary.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "budget_tier: {}",
        plan.budget_tier.as_deref().unwrap_or("-")
    );
    out
}
