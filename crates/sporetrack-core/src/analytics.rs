//! # Production Analytics
//!
//! Dashboard figures derived from already-fetched batch records: yield
//! totals, how batches are spread across stages, and break-even volume.
//!
//! All arithmetic is on `Decimal` with saturating or checked operations.
//! Nothing here panics on odd input; undefined ratios come back as `None`.

use crate::batch::ProductionBatch;
use crate::primitives::{PERCENT_SCALE, WEIGHT_SCALE};
use crate::workflow::Stage;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

// =============================================================================
// YIELD SUMMARY
// =============================================================================

/// Aggregated harvest figures over a set of batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldSummary {
    pub batch_count: usize,
    /// Batches with a recorded harvested weight.
    pub harvested_batches: usize,
    pub harvested_kg: Decimal,
    pub damaged_kg: Decimal,
    pub collected_kg: Decimal,
    /// Harvested minus damaged, never below zero.
    pub marketable_kg: Decimal,
    /// Damaged share of harvested weight. `None` if nothing was harvested.
    pub damage_rate_percent: Option<Decimal>,
    /// Collected share of harvested weight. `None` if nothing was harvested.
    pub collection_rate_percent: Option<Decimal>,
}

impl YieldSummary {
    /// Aggregate over a batch list.
    #[must_use]
    pub fn from_batches(batches: &[ProductionBatch]) -> Self {
        let mut harvested_batches = 0usize;
        let mut harvested_kg = Decimal::ZERO;
        let mut damaged_kg = Decimal::ZERO;
        let mut collected_kg = Decimal::ZERO;

        for batch in batches {
            if let Some(weight) = batch.harvested_weight {
                harvested_batches = harvested_batches.saturating_add(1);
                harvested_kg = harvested_kg.saturating_add(weight);
            }
            damaged_kg = damaged_kg.saturating_add(batch.damaged_weight.unwrap_or_default());
            collected_kg = collected_kg.saturating_add(batch.collected_weight.unwrap_or_default());
        }

        Self {
            batch_count: batches.len(),
            harvested_batches,
            harvested_kg,
            damaged_kg,
            collected_kg,
            marketable_kg: harvested_kg.saturating_sub(damaged_kg).max(Decimal::ZERO),
            damage_rate_percent: percent_of(damaged_kg, harvested_kg),
            collection_rate_percent: percent_of(collected_kg, harvested_kg),
        }
    }
}

fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole <= Decimal::ZERO {
        return None;
    }
    part.saturating_mul(Decimal::ONE_HUNDRED)
        .checked_div(whole)
        .map(|p| p.round_dp(PERCENT_SCALE).normalize())
}

// =============================================================================
// STAGE DISTRIBUTION
// =============================================================================

/// Number of batches sitting in one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

/// How a batch list is spread across the six stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDistribution {
    /// One entry per stage, in lifecycle order.
    pub stages: Vec<StageCount>,
    /// Batches whose stored stage key is not a known stage.
    pub unrecognized: usize,
    pub total: usize,
}

impl StageDistribution {
    #[must_use]
    pub fn from_batches(batches: &[ProductionBatch]) -> Self {
        let mut stages: Vec<StageCount> = Stage::ALL
            .into_iter()
            .map(|stage| StageCount { stage, count: 0 })
            .collect();
        let mut unrecognized = 0usize;

        for batch in batches {
            match batch.current_stage() {
                Some(stage) => {
                    if let Some(entry) = stages.get_mut(stage.ordinal()) {
                        entry.count = entry.count.saturating_add(1);
                    }
                }
                None => unrecognized = unrecognized.saturating_add(1),
            }
        }

        Self {
            stages,
            unrecognized,
            total: batches.len(),
        }
    }

    /// Count for one stage.
    #[must_use]
    pub fn count(&self, stage: Stage) -> usize {
        self.stages
            .get(stage.ordinal())
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

// =============================================================================
// BREAK-EVEN
// =============================================================================

/// Cost structure for a production cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEven {
    pub fixed_costs: Decimal,
    pub price_per_kg: Decimal,
    pub variable_cost_per_kg: Decimal,
}

impl BreakEven {
    #[must_use]
    pub fn new(fixed_costs: Decimal, price_per_kg: Decimal, variable_cost_per_kg: Decimal) -> Self {
        Self {
            fixed_costs,
            price_per_kg,
            variable_cost_per_kg,
        }
    }

    /// Contribution of each kilogram sold.
    #[must_use]
    pub fn unit_margin(&self) -> Decimal {
        self.price_per_kg.saturating_sub(self.variable_cost_per_kg)
    }

    /// Kilograms to sell before fixed costs are covered, rounded up.
    ///
    /// `None` when each kilogram loses money or breaks exactly even.
    #[must_use]
    pub fn break_even_kg(&self) -> Option<Decimal> {
        let margin = self.unit_margin();
        if margin <= Decimal::ZERO {
            return None;
        }
        self.fixed_costs
            .max(Decimal::ZERO)
            .checked_div(margin)
            .map(|kg| {
                kg.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::ToPositiveInfinity)
                    .normalize()
            })
    }

    /// Profit (or loss, if negative) after selling `kg`.
    #[must_use]
    pub fn projected_profit(&self, kg: Decimal) -> Decimal {
        kg.saturating_mul(self.unit_margin())
            .saturating_sub(self.fixed_costs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
