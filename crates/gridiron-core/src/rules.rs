// Lineup rules: the slot table and the risk-aversion coefficient.
//
// These are the only tunable inputs to the engine. Nothing in the solver reads
// a global default; callers always pass a `LineupRules` value.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::position::SlotCategory;

/// Risk-aversion coefficient used by the reference lineup.
pub const DEFAULT_RISK_AVERSION: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("risk aversion must be a finite, non-negative number, got {0}")]
    InvalidRiskAversion(f64),

    #[error("lineup rules require at least one slot to fill")]
    NoSlots,
}

/// Slot table (category -> required count) plus λ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupRules {
    slots: BTreeMap<SlotCategory, usize>,
    risk_aversion: f64,
}

impl LineupRules {
    /// Build rules from explicit slot counts. Categories with a count of zero
    /// are dropped.
    pub fn new(
        slots: impl IntoIterator<Item = (SlotCategory, usize)>,
        risk_aversion: f64,
    ) -> Result<Self, RulesError> {
        if !risk_aversion.is_finite() || risk_aversion < 0.0 {
            return Err(RulesError::InvalidRiskAversion(risk_aversion));
        }

        let mut table = BTreeMap::new();
        for (slot, count) in slots {
            *table.entry(slot).or_insert(0) += count;
        }
        table.retain(|_, count| *count > 0);

        if table.is_empty() {
            return Err(RulesError::NoSlots);
        }

        Ok(LineupRules {
            slots: table,
            risk_aversion,
        })
    }

    /// QB:1, RB:2, WR:2, TE:1, FLEX:1, D/ST:1, K:1 with λ = 0.15.
    pub fn standard() -> Self {
        LineupRules {
            slots: BTreeMap::from([
                (SlotCategory::Quarterback, 1),
                (SlotCategory::RunningBack, 2),
                (SlotCategory::WideReceiver, 2),
                (SlotCategory::TightEnd, 1),
                (SlotCategory::Flex, 1),
                (SlotCategory::TeamDefense, 1),
                (SlotCategory::Kicker, 1),
            ]),
            risk_aversion: DEFAULT_RISK_AVERSION,
        }
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Required count for `slot` (zero when the category is not used).
    pub fn required(&self, slot: SlotCategory) -> usize {
        self.slots.get(&slot).copied().unwrap_or(0)
    }

    /// Slot categories with their counts, in presentation order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotCategory, usize)> + '_ {
        self.slots.iter().map(|(&slot, &count)| (slot, count))
    }

    /// One entry per seat to fill, e.g. `[QB, RB, RB, WR, WR, ...]`.
    pub fn seats(&self) -> Vec<SlotCategory> {
        self.slots
            .iter()
            .flat_map(|(&slot, &count)| std::iter::repeat(slot).take(count))
            .collect()
    }

    pub fn total_seats(&self) -> usize {
        self.slots.values().sum()
    }
}

impl Default for LineupRules {
    fn default() -> Self {
        LineupRules::standard()
    }
}
