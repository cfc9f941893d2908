//! Fan-in of the weather and budget branches.

use async_trait::async_trait;
use stategraph::{Node, NodeError, Patch, Record};

use super::fields::*;
use super::{require_lines, require_str};

/// Extra suggestions for matching weather and budget combinations.
fn cross_suggestions(weather: &str, tier: &str) -> &'static [&'static str] {
    match (weather, tier) {
        ("sunny" | "clear", "high") => &[
            "Extra (sunny+high): Book a private sunset cruise.",
            "Extra (sunny+high): Reserve a table at a beach club.",
        ],
        ("rainy" | "stormy", "low") => &[
            "Extra (rainy+low): Pick a hostel/café with indoor games.",
            "Extra (rainy+low): Do short local food trail under shade.",
        ],
        ("overcast" | "humid", "mid") => &[
            "Extra (overcast+mid): Do forts/churches in the morning and café later.",
            "Extra (overcast+mid): Keep a taxi/scooter flexible.",
        ],
        _ => &[],
    }
}

/// Assembles `final_itinerary` from both branches.
///
/// Returns an empty patch while either branch is missing. The previous itinerary is
/// not handled here: `final_itinerary` is an append-to-history field, so the engine
/// moves it into `itinerary_history` when this node overwrites it.
#[derive(Debug, Default)]
pub struct SupervisorMerge;

#[async_trait]
impl Node for SupervisorMerge {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        if !record.contains(WEATHER_ACTIVITIES) || !record.contains(BUDGET_PLAN) {
            return Ok(Patch::new());
        }

        let destination = require_str(record, DESTINATION)?;
        let weather = require_str(record, WEATHER_SUMMARY)?;
        let tier = require_str(record, BUDGET_TIER)?;
        let budget_plan = require_lines(record, BUDGET_PLAN)?;
        let activities = require_lines(record, WEATHER_ACTIVITIES)?;

        let mut plan = vec![
            format!("Destination: {}", destination),
            format!("Predicted weather: {}", weather),
            format!("Budget tier: {}", tier),
            "=== Core (budget-based) plan ===".to_string(),
        ];
        plan.extend(budget_plan);
        plan.push("=== Weather-aware suggestions ===".to_string());
        plan.extend(activities);
        plan.extend(
            cross_suggestions(weather, tier)
                .iter()
                .map(|s| s.to_string()),
        );

        Ok(Patch::new().with(FINAL_ITINERARY, plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn joined(weather: &str, tier: &str) -> Record {
        Record::new()
            .with(DESTINATION, "Goa")
            .with(WEATHER_SUMMARY, weather)
            .with(WEATHER_ACTIVITIES, json!(["Museum / cultural center"]))
            .with(BUDGET_TIER, tier)
            .with(BUDGET_PLAN, json!(["Backpacker hostel in Goa"]))
    }

    fn lines(patch: &Patch) -> Vec<String> {
        serde_json::from_value(patch.get(FINAL_ITINERARY).unwrap().clone()).unwrap()
    }

    /// **Scenario**: With only one branch present the merge writes nothing.
    #[tokio::test]
    async fn waits_for_both_branches() {
        let mut record = joined("rainy", "low");
        record.remove(BUDGET_PLAN);
        let patch = SupervisorMerge.run(&record).await.unwrap();
        assert!(patch.is_empty());
    }

    /// **Scenario**: The itinerary has header lines, both sections and the rainy+low extras.
    #[tokio::test]
    async fn builds_itinerary_with_cross_suggestions() {
        let patch = SupervisorMerge.run(&joined("rainy", "low")).await.unwrap();
        assert_eq!(
            lines(&patch),
            vec![
                "Destination: Goa",
                "Predicted weather: rainy",
                "Budget tier: low",
                "=== Core (budget-based) plan ===",
                "Backpacker hostel in Goa",
                "=== Weather-aware suggestions ===",
                "Museum / cultural center",
                "Extra (rainy+low): Pick a hostel/café with indoor games.",
                "Extra (rainy+low): Do short local food trail under shade.",
            ]
        );
    }

    /// **Scenario**: Non-matching combinations get no extras.
    #[tokio::test]
    async fn no_extras_for_other_combinations() {
        let patch = SupervisorMerge.run(&joined("sunny", "low")).await.unwrap();
        assert!(lines(&patch).iter().all(|l| !l.starts_with("Extra")));
        assert!(!patch.contains(ITINERARY_HISTORY));
    }
}
