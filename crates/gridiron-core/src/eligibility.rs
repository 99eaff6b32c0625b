// Eligibility resolution: map each normalized candidate to the slot
// categories it may fill, and set aside candidates with none.

use serde::Serialize;
use tracing::warn;

use crate::candidate::Candidate;
use crate::error::LineupWarning;
use crate::position::{Position, SlotCategory};

/// A candidate with a recognized position, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleCandidate {
    pub candidate: Candidate,
    pub position: Position,
    /// Index in the normalized batch; used for stable ordering.
    pub input_index: usize,
}

impl EligibleCandidate {
    pub fn can_fill(&self, slot: SlotCategory) -> bool {
        self.position.can_fill(slot)
    }
}

/// Why a candidate was kept out of the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    UnrecognizedPosition,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::UnrecognizedPosition => "unrecognized position",
        }
    }
}

/// A candidate removed before the solve. Surfaced to the caller, never folded
/// into the bench.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub reason: ExclusionReason,
}

/// Output of eligibility resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub eligible: Vec<EligibleCandidate>,
    pub excluded: Vec<ExcludedCandidate>,
    pub warnings: Vec<LineupWarning>,
}

/// Split normalized candidates into solver input and exclusions.
pub fn resolve(candidates: Vec<Candidate>) -> Resolution {
    let mut resolution = Resolution::default();

    for (input_index, candidate) in candidates.into_iter().enumerate() {
        match candidate.parsed_position() {
            Some(position) => resolution.eligible.push(EligibleCandidate {
                candidate,
                position,
                input_index,
            }),
            None => {
                warn!(
                    "excluding {} ({}): unrecognized position {:?}",
                    candidate.name, candidate.id, candidate.position
                );
                resolution.warnings.push(LineupWarning::UnrecognizedPosition {
                    id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    position: candidate.position.clone(),
                });
                resolution.excluded.push(ExcludedCandidate {
                    candidate,
                    reason: ExclusionReason::UnrecognizedPosition,
                });
            }
        }
    }

    resolution
}

/// Number of candidates in `pool` that may fill at least one of `slots`.
pub fn count_eligible(pool: &[EligibleCandidate], slots: &[SlotCategory]) -> usize {
    pool.iter()
        .filter(|c| slots.iter().any(|&slot| c.can_fill(slot)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateId;

    fn candidate(id: i64, pos: &str) -> Candidate {
        Candidate {
            id: CandidateId::Numeric(id),
            name: format!("Player {id}"),
            position: pos.to_string(),
            projected_points: 10.0,
            uncertainty: 3.0,
            floor: None,
            ceiling: None,
            team: None,
        }
    }

    #[test]
    fn recognized_positions_are_eligible() {
        let res = resolve(vec![candidate(1, "QB"), candidate(2, "D/ST"), candidate(3, "TE")]);
        assert_eq!(res.eligible.len(), 3);
        assert!(res.excluded.is_empty());
        assert!(res.warnings.is_empty());
        assert_eq!(res.eligible[1].position, Position::TeamDefense);
        assert!(res.eligible[2].can_fill(SlotCategory::Flex));
        assert!(!res.eligible[2].can_fill(SlotCategory::WideReceiver));
    }

    #[test]
    fn unrecognized_positions_are_excluded_and_reported() {
        let res = resolve(vec![candidate(1, "RB"), candidate(2, "FA"), candidate(3, "LB")]);
        assert_eq!(res.eligible.len(), 1);
        assert_eq!(res.excluded.len(), 2);
        assert_eq!(res.warnings.len(), 2);
        assert_eq!(res.excluded[0].candidate.position, "FA");
        assert_eq!(res.excluded[0].reason, ExclusionReason::UnrecognizedPosition);
        assert_eq!(
            res.warnings[1],
            LineupWarning::UnrecognizedPosition {
                id: CandidateId::Numeric(3),
                name: "Player 3".into(),
                position: "LB".into(),
            }
        );
    }

    #[test]
    fn input_index_tracks_batch_position() {
        let res = resolve(vec![candidate(1, "XX"), candidate(2, "WR"), candidate(3, "K")]);
        let indices: Vec<usize> = res.eligible.iter().map(|c| c.input_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn count_eligible_includes_flex_groups() {
        let res = resolve(vec![
            candidate(1, "RB"),
            candidate(2, "WR"),
            candidate(3, "TE"),
            candidate(4, "QB"),
        ]);
        assert_eq!(count_eligible(&res.eligible, &[SlotCategory::Flex]), 3);
        assert_eq!(count_eligible(&res.eligible, &[SlotCategory::Quarterback]), 1);
        assert_eq!(count_eligible(&res.eligible, &[SlotCategory::Kicker]), 0);
    }

    #[test]
    fn count_eligible_counts_each_candidate_once_per_group() {
        let res = resolve(vec![
            candidate(1, "RB"),
            candidate(2, "RB"),
            candidate(3, "WR"),
            candidate(4, "K"),
        ]);
        let group = [SlotCategory::RunningBack, SlotCategory::Flex];
        assert_eq!(count_eligible(&res.eligible, &group), 3);
        let group = [SlotCategory::RunningBack, SlotCategory::Kicker];
        assert_eq!(count_eligible(&res.eligible, &group), 3);
    }
}
