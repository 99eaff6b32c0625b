// Assignment solver.
//
// Expands the slot table into individual seats (QB, RB, RB, WR, ...) and
// solves a maximum-weight bipartite matching between seats and candidates
// with the Kuhn-Munkres algorithm. A seat/candidate pair the eligibility
// table forbids, or a padding column, gets a penalty larger than any
// achievable score swing, so the optimum fills every seat legally whenever
// that is possible at all. Feasibility is settled before the solve by
// counting supply for every group of slot categories.
//
// The matcher needs a totally ordered weight type, so each score is scaled
// by a power of two into an `i128`. The shift is chosen from the scores
// themselves: it turns every score into an integer without rounding unless
// their binary magnitudes span more bits than the weight budget allows.
// Candidates are columns in input order, which together with the
// deterministic matcher makes the result reproducible.

use std::collections::BTreeSet;

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use tracing::{debug, warn};

use crate::eligibility::{count_eligible, EligibleCandidate};
use crate::error::{InfeasibleError, SlotShortfall};
use crate::position::{Position, SlotCategory};
use crate::rules::LineupRules;

/// Bits of `i128` magnitude the matcher may use for labels and slack sums.
const WEIGHT_BUDGET_BITS: u32 = 126;

/// Never shrink the per-weight budget below this many bits.
const MIN_WEIGHT_BITS: i32 = 24;

/// One filled seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Index into the solver's candidate pool.
    pub pool_index: usize,
    pub slot: SlotCategory,
}

/// A complete, legal assignment of candidates to seats.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// One pick per seat, in seat order.
    pub picks: Vec<Pick>,
    /// Total risk-adjusted score of the picks.
    pub objective: f64,
}

/// Compute the assignment maximizing total risk-adjusted score.
///
/// Fails with [`InfeasibleError`] when the pool cannot fill every seat,
/// naming each slot category, or group of categories sharing candidates,
/// that is short.
pub fn solve(pool: &[EligibleCandidate], rules: &LineupRules) -> Result<Assignment, InfeasibleError> {
    check_supply(pool, rules)?;

    let seats = rules.seats();
    let lambda = rules.risk_aversion();
    let scores: Vec<f64> = pool
        .iter()
        .map(|c| c.candidate.risk_adjusted(lambda))
        .collect();

    let columns = pool.len().max(seats.len());
    let max_bits = weight_bits(seats.len(), columns);
    let shift = weight_shift(&scores, max_bits);
    let weights: Vec<i128> = scores.iter().map(|&s| to_weight(s, shift)).collect();
    let max_weight = weights.iter().map(|w| w.saturating_abs()).max().unwrap_or(0);
    // Exceeds the largest possible score difference between two assignments.
    let penalty = max_weight
        .saturating_add(1)
        .saturating_mul(2 * (seats.len() as i128 + 1));

    debug!(
        "solving lineup: {} seats, {} candidates, weight shift {}",
        seats.len(),
        pool.len(),
        shift
    );

    let matrix = Matrix::from_fn(seats.len(), columns, |(row, col)| {
        match pool.get(col) {
            Some(candidate) if candidate.can_fill(seats[row]) => weights[col],
            _ => -penalty,
        }
    });
    let (_, seat_to_column) = kuhn_munkres(&matrix);

    let mut picks = Vec::with_capacity(seats.len());
    let mut unfilled = BTreeSet::new();
    for (row, &col) in seat_to_column.iter().enumerate() {
        let slot = seats[row];
        match pool.get(col) {
            Some(candidate) if candidate.can_fill(slot) => picks.push(Pick {
                pool_index: col,
                slot,
            }),
            _ => {
                unfilled.insert(slot);
            }
        }
    }

    if !unfilled.is_empty() {
        warn!("matcher left {:?} unfilled after the supply check passed", unfilled);
        let slots = unfilled.into_iter().collect();
        return Err(InfeasibleError {
            shortfalls: vec![shortfall(pool, rules, slots)],
        });
    }

    canonicalize_labels(&mut picks, pool, &scores);

    let objective = picks.iter().map(|p| scores[p.pool_index]).sum();
    debug!("lineup solved: objective {:.3}", objective);

    Ok(Assignment { picks, objective })
}

/// Fail fast when some set of slot categories has more seats than there are
/// candidates eligible for any of them.
///
/// Seats of one category accept the same candidates, so every seat can be
/// filled exactly when no such set exists. Each short category is reported
/// on its own; when none is, the smallest short groups are reported instead.
fn check_supply(pool: &[EligibleCandidate], rules: &LineupRules) -> Result<(), InfeasibleError> {
    let categories: Vec<SlotCategory> = rules.slots().map(|(slot, _)| slot).collect();
    let mut groups: Vec<u32> = (1..1u32 << categories.len()).collect();
    groups.sort_by_key(|g| g.count_ones());

    let mut shortfalls: Vec<SlotShortfall> = Vec::new();
    for group in groups {
        if shortfalls.last().is_some_and(|s| s.slots.len() < group.count_ones() as usize) {
            break;
        }
        let slots: Vec<SlotCategory> = categories
            .iter()
            .enumerate()
            .filter(|(i, _)| group & (1 << i) != 0)
            .map(|(_, &slot)| slot)
            .collect();
        let s = shortfall(pool, rules, slots);
        if s.available < s.required {
            shortfalls.push(s);
        }
    }

    if shortfalls.is_empty() {
        Ok(())
    } else {
        Err(InfeasibleError { shortfalls })
    }
}

/// Seats and eligible supply for a group of slot categories.
fn shortfall(pool: &[EligibleCandidate], rules: &LineupRules, slots: Vec<SlotCategory>) -> SlotShortfall {
    SlotShortfall {
        required: slots.iter().map(|&slot| rules.required(slot)).sum(),
        available: count_eligible(pool, &slots),
        slots,
    }
}

/// Among starters sharing a position, hand the dedicated slots to the best
/// scorers and leave FLEX to the rest.
///
/// Swapping slot labels between two same-position starters changes neither
/// legality nor the objective, so the matcher may return either labeling;
/// this fixes one.
fn canonicalize_labels(picks: &mut [Pick], pool: &[EligibleCandidate], scores: &[f64]) {
    for position in Position::ALL {
        let mut seats: Vec<usize> = (0..picks.len())
            .filter(|&i| pool[picks[i].pool_index].position == position)
            .collect();
        if seats.len() < 2 {
            continue;
        }

        let mut members: Vec<usize> = seats.iter().map(|&i| picks[i].pool_index).collect();
        seats.sort_by_key(|&i| (picks[i].slot, i));
        members.sort_by(|&a, &b| {
            scores[b]
                .total_cmp(&scores[a])
                .then_with(|| {
                    pool[b]
                        .candidate
                        .projected_points
                        .total_cmp(&pool[a].candidate.projected_points)
                })
                .then_with(|| pool[a].input_index.cmp(&pool[b].input_index))
        });

        for (seat, member) in seats.into_iter().zip(members) {
            picks[seat].pool_index = member;
        }
    }
}

/// Largest weight magnitude, in bits, that keeps the penalty and the
/// matcher's label arithmetic inside [`WEIGHT_BUDGET_BITS`].
fn weight_bits(seats: usize, columns: usize) -> i32 {
    let bit_len = |n: u128| 128 - n.leading_zeros();
    let headroom = bit_len(2 * (seats as u128 + 1)) + bit_len(columns as u128 + 1) + 2;
    (WEIGHT_BUDGET_BITS.saturating_sub(headroom) as i32).max(MIN_WEIGHT_BITS)
}

/// Exponents of the lowest and highest set bits of a finite, non-zero `x`,
/// so that `x = m * 2^low` for an odd integer `m` and `|x| < 2^(high + 1)`.
fn bit_span(x: f64) -> (i32, i32) {
    let bits = x.abs().to_bits();
    let biased = (bits >> 52) as i32;
    let fraction = bits & ((1 << 52) - 1);
    let (mantissa, exp) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };
    let low = exp + mantissa.trailing_zeros() as i32;
    let high = exp + 63 - mantissa.leading_zeros() as i32;
    (low, high)
}

/// Power-of-two shift that makes every score an integer, capped so no
/// weight reaches `2^max_bits`. Under the cap the low bits of the smallest
/// scores are rounded away.
fn weight_shift(scores: &[f64], max_bits: i32) -> i32 {
    let spans: Vec<(i32, i32)> = scores
        .iter()
        .filter(|s| **s != 0.0 && s.is_finite())
        .map(|&s| bit_span(s))
        .collect();
    let (Some(low), Some(high)) = (
        spans.iter().map(|&(low, _)| low).min(),
        spans.iter().map(|&(_, high)| high).max(),
    ) else {
        return 0;
    };
    (-low).min(max_bits - 1 - high)
}

/// `score * 2^shift`, rounded. Multiplying by a power of two is exact, and
/// splitting the shift keeps each factor representable.
fn to_weight(score: f64, shift: i32) -> i128 {
    let half = shift / 2;
    (score * 2f64.powi(half) * 2f64.powi(shift - half)).round() as i128
}
