// Lineup assignment engine: picks the starting lineup that maximizes total
// risk-adjusted projected points under a slot table, and orders the rest of
// the roster as a bench.
//
// The pipeline is Normalize -> Resolve -> Solve -> Assemble. Each stage is a
// pure function over the previous stage's output; nothing is cached between
// calls, so independent lineups may be computed concurrently.

pub mod assemble;
pub mod candidate;
pub mod eligibility;
pub mod error;
pub mod normalize;
pub mod position;
pub mod rules;
pub mod solver;

pub use assemble::{LineupResult, Starter};
pub use candidate::{Candidate, CandidateId, RawCandidate, RawNumber};
pub use eligibility::{ExcludedCandidate, ExclusionReason};
pub use error::{
    InfeasibleError, LineupError, LineupWarning, SlotShortfall, ValidationError, ValidationReason,
};
pub use position::{Position, SlotCategory};
pub use rules::{LineupRules, RulesError, DEFAULT_RISK_AVERSION};

use tracing::info;

/// Recommend a lineup for `raw` under `rules`.
///
/// Returns the starters (each tagged with its slot), the bench, any
/// candidates excluded for an unrecognized position, and the non-fatal
/// warnings collected along the way. Malformed records and unfillable slot
/// requirements are errors; a partial lineup is never returned.
pub fn optimize_lineup(raw: &[RawCandidate], rules: &LineupRules) -> Result<LineupResult, LineupError> {
    let candidates = normalize::normalize(raw)?;
    normalize::check_scores(&candidates, rules.risk_aversion())?;
    let resolution = eligibility::resolve(candidates);
    let assignment = solver::solve(&resolution.eligible, rules)?;
    let result = assemble::assemble(
        resolution.eligible,
        &assignment,
        resolution.excluded,
        resolution.warnings,
        rules.risk_aversion(),
    );

    info!(
        "lineup ready: {} starters, {} bench, {} excluded, risk-adjusted total {:.2}",
        result.starters.len(),
        result.bench.len(),
        result.excluded.len(),
        result.objective
    );

    Ok(result)
}
