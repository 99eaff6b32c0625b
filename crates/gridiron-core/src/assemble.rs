// Result assembly: partition the solver pool into ordered starters and bench.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::eligibility::{EligibleCandidate, ExcludedCandidate, ExclusionReason};
use crate::error::LineupWarning;
use crate::position::SlotCategory;
use crate::solver::Assignment;

/// A candidate placed in the lineup, with the slot it occupies (which may
/// differ from its native position, e.g. a flexed RB carries `FLEX`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Starter {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub slot: SlotCategory,
}

/// The recommended lineup for one candidate batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupResult {
    /// Ordered by slot presentation order, then descending projected points.
    pub starters: Vec<Starter>,
    /// Every solver candidate not starting, by descending projected points.
    pub bench: Vec<Candidate>,
    /// Candidates kept out of the solve.
    pub excluded: Vec<ExcludedCandidate>,
    pub warnings: Vec<LineupWarning>,
    /// Risk-aversion coefficient the lineup was optimized under.
    pub risk_aversion: f64,
    /// Sum of the starters' risk-adjusted scores.
    pub objective: f64,
}

impl LineupResult {
    /// Sum of the starters' projected points (no risk penalty).
    pub fn projected_total(&self) -> f64 {
        self.starters.iter().map(|s| s.candidate.projected_points).sum()
    }

    /// Sum of the starters' risk-adjusted scores.
    pub fn risk_adjusted_total(&self) -> f64 {
        self.objective
    }

    /// Starters occupying `slot`, in presentation order.
    pub fn starters_in(&self, slot: SlotCategory) -> impl Iterator<Item = &Starter> {
        self.starters.iter().filter(move |s| s.slot == slot)
    }

    /// Human-readable summary of exclusions, e.g.
    /// "2 candidates excluded: unrecognized position".
    pub fn exclusion_summary(&self) -> Option<String> {
        let mut counts: Vec<(ExclusionReason, usize)> = Vec::new();
        for e in &self.excluded {
            match counts.iter_mut().find(|(r, _)| *r == e.reason) {
                Some((_, n)) => *n += 1,
                None => counts.push((e.reason, 1)),
            }
        }
        if counts.is_empty() {
            return None;
        }
        Some(
            counts
                .iter()
                .map(|(reason, n)| {
                    let noun = if *n == 1 { "candidate" } else { "candidates" };
                    format!("{n} {noun} excluded: {}", reason.label())
                })
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Build the ordered starters/bench partition from a solved assignment.
pub fn assemble(
    pool: Vec<EligibleCandidate>,
    assignment: &Assignment,
    excluded: Vec<ExcludedCandidate>,
    warnings: Vec<LineupWarning>,
    risk_aversion: f64,
) -> LineupResult {
    let slot_by_index: HashMap<usize, SlotCategory> = assignment
        .picks
        .iter()
        .map(|p| (p.pool_index, p.slot))
        .collect();

    let mut starters: Vec<(usize, Starter)> = Vec::with_capacity(slot_by_index.len());
    let mut bench: Vec<(usize, Candidate)> = Vec::new();

    for (pool_index, entry) in pool.into_iter().enumerate() {
        match slot_by_index.get(&pool_index) {
            Some(&slot) => starters.push((
                entry.input_index,
                Starter {
                    candidate: entry.candidate,
                    slot,
                },
            )),
            None => bench.push((entry.input_index, entry.candidate)),
        }
    }

    starters.sort_by(|(ia, a), (ib, b)| {
        a.slot
            .presentation_order()
            .cmp(&b.slot.presentation_order())
            .then_with(|| by_points_desc(&a.candidate, &b.candidate))
            .then_with(|| ia.cmp(ib))
    });
    bench.sort_by(|(ia, a), (ib, b)| by_points_desc(a, b).then_with(|| ia.cmp(ib)));

    LineupResult {
        starters: starters.into_iter().map(|(_, s)| s).collect(),
        bench: bench.into_iter().map(|(_, c)| c).collect(),
        excluded,
        warnings,
        risk_aversion,
        objective: assignment.objective,
    }
}

fn by_points_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.projected_points.total_cmp(&a.projected_points)
}
