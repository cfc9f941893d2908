//! Budget branch: a tier and a core plan for it.

use std::fmt;

use async_trait::async_trait;
use rand::Rng;
use stategraph::{Node, NodeError, Patch, Record};

use super::fields::*;
use super::{lock_rng, require_i64, require_str, SharedRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetTier {
    Low,
    Mid,
    High,
}

impl BudgetTier {
    /// Below 25000 is low, up to and including 75000 is mid.
    pub fn for_budget(budget: i64) -> Self {
        if budget < 25_000 {
            BudgetTier::Low
        } else if budget <= 75_000 {
            BudgetTier::Mid
        } else {
            BudgetTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Mid => "mid",
            BudgetTier::High => "high",
        }
    }

    /// The two candidate plans for this tier.
    fn plans(&self, destination: &str) -> [Vec<String>; 2] {
        let plan = |first: String, rest: [&str; 3]| {
            std::iter::once(first)
                .chain(rest.iter().map(|s| s.to_string()))
                .collect::<Vec<_>>()
        };
        match self {
            BudgetTier::Low => [
                plan(
                    format!("Check-in to budget homestay near {} beach", destination),
                    [
                        "Visit public beach (Calangute / Miramar equivalent)",
                        "Local street food / fish thali",
                        "Evening walk at beach",
                    ],
                ),
                plan(
                    format!("Backpacker hostel in {}", destination),
                    ["Scooter rental (shared)", "Free fort / viewpoint", "Budget café"],
                ),
            ],
            BudgetTier::Mid => [
                plan(
                    format!("3-star resort in {}", destination),
                    [
                        "Water sports pack (shared)",
                        "Sunset cruise",
                        "Popular mid-range restaurant",
                    ],
                ),
                plan(
                    format!("Business/boutique hotel in {}", destination),
                    [
                        "Daytime sightseeing (church/fort)",
                        "Evening beach shacks",
                        "Taxi for local commute",
                    ],
                ),
            ],
            BudgetTier::High => [
                plan(
                    format!("5-star / luxury resort in {}", destination),
                    [
                        "Private cab for whole day",
                        "Premium beach club entry",
                        "Fine dining seafood dinner",
                    ],
                ),
                plan(
                    format!("Luxury villa stay in {}", destination),
                    [
                        "Private boat / cruise booking",
                        "Spa session",
                        "High-end nightlife / lounge",
                    ],
                ),
            ],
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes `budget_tier` and `budget_plan`.
pub struct BudgetAgent {
    rng: SharedRng,
}

impl BudgetAgent {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl Node for BudgetAgent {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        let destination = require_str(record, DESTINATION)?;
        let budget = require_i64(record, BUDGET)?;

        let tier = BudgetTier::for_budget(budget);
        let [first, second] = tier.plans(destination);
        let plan = if lock_rng(&self.rng).gen_bool(0.5) {
            first
        } else {
            second
        };

        Ok(Patch::new()
            .with(BUDGET_TIER, tier.as_str())
            .with(BUDGET_PLAN, plan))
    }
}
