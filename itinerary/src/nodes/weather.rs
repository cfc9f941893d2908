//! Weather branch: a predicted summary and matching activities.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use stategraph::{Node, NodeError, Patch, Record};

use super::fields::*;
use super::{lock_rng, require_str, SharedRng};

pub const WEATHER_SUMMARIES: [&str; 6] =
    ["sunny", "clear", "overcast", "rainy", "stormy", "humid"];
const TEMPERATURES: [&str; 4] = ["27C", "29C", "30C", "32C"];
const ACTIVITY_COUNT: usize = 3;

/// Activities suited to `summary`.
fn activity_pool(summary: &str, destination: &str) -> Vec<String> {
    match summary {
        "sunny" | "clear" => vec![
            format!("Morning beach time at {}", destination),
            "Water sports (parasailing / jet ski)".to_string(),
            "Island / boat trip".to_string(),
            "Evening cruise / sunset point".to_string(),
        ],
        "overcast" | "humid" => vec![
            "Late-morning sightseeing (fort / churches)".to_string(),
            "Café hopping (air-conditioned)".to_string(),
            "Local market visit".to_string(),
            "Evening at beach shacks".to_string(),
        ],
        _ => vec![
            "Indoor spa / wellness session".to_string(),
            "Museum / cultural center".to_string(),
            "Cooking class / local cuisine tasting".to_string(),
            "Indoor board games at stay".to_string(),
        ],
    }
}

/// Picks a weather summary and temperature, then samples activities for it.
///
/// Writes `weather_summary`, `weather_temperature`, `weather_activities`.
pub struct WeatherAgent {
    rng: SharedRng,
}

impl WeatherAgent {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl Node for WeatherAgent {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        let destination = require_str(record, DESTINATION)?;
        require_str(record, TRAVEL_DATE)?;

        let mut rng = lock_rng(&self.rng);
        let summary = *WEATHER_SUMMARIES
            .choose(&mut *rng)
            .ok_or_else(|| NodeError::Failed("no weather summaries".into()))?;
        let temperature = *TEMPERATURES
            .choose(&mut *rng)
            .ok_or_else(|| NodeError::Failed("no temperatures".into()))?;
        let pool = activity_pool(summary, destination);
        let activities: Vec<String> = pool
            .choose_multiple(&mut *rng, ACTIVITY_COUNT.min(pool.len()))
            .cloned()
            .collect();

        Ok(Patch::new()
            .with(WEATHER_SUMMARY, summary)
            .with(WEATHER_TEMPERATURE, temperature)
            .with(WEATHER_ACTIVITIES, activities))
    }
}
