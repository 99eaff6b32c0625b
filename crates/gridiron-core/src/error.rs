// Error and warning types for the lineup engine.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::candidate::CandidateId;
use crate::position::SlotCategory;

/// Top-level error for a lineup optimization request.
#[derive(Debug, Error)]
pub enum LineupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Infeasible(#[from] InfeasibleError),
}

/// A candidate record is malformed beyond recovery. The whole batch fails.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid candidate at index {index}: {reason}")]
pub struct ValidationError {
    /// Position of the offending record in the input batch.
    pub index: usize,
    pub reason: ValidationReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReason {
    /// Neither an id nor a name was supplied.
    MissingIdentity,
    /// Another record in the same batch already uses this id.
    DuplicateId(CandidateId),
    /// Projected points or uncertainty outside the supported magnitude.
    ValueOutOfRange { field: &'static str, value: f64 },
    /// Points minus λ·uncertainty does not yield a finite score.
    NonFiniteScore { risk_aversion: f64 },
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::MissingIdentity => write!(f, "missing both id and name"),
            ValidationReason::DuplicateId(id) => write!(f, "duplicate id `{id}`"),
            ValidationReason::ValueOutOfRange { field, value } => {
                write!(f, "`{field}` value {value} is outside the supported range")
            }
            ValidationReason::NonFiniteScore { risk_aversion } => {
                write!(f, "risk-adjusted score overflows at risk aversion {risk_aversion}")
            }
        }
    }
}

/// The slot requirements cannot be met by the eligible candidate pool.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("lineup cannot be filled: {}", describe_shortfalls(.shortfalls))]
pub struct InfeasibleError {
    pub shortfalls: Vec<SlotShortfall>,
}

impl InfeasibleError {
    /// Every slot category named by a shortfall, in presentation order.
    pub fn slots(&self) -> Vec<SlotCategory> {
        let slots: BTreeSet<SlotCategory> = self
            .shortfalls
            .iter()
            .flat_map(|s| s.slots.iter().copied())
            .collect();
        slots.into_iter().collect()
    }
}

/// Slot categories whose combined seats outnumber the candidates eligible
/// for any of them. Usually a single category; several when they compete
/// for the same players (RB and FLEX, say).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotShortfall {
    pub slots: Vec<SlotCategory>,
    pub required: usize,
    pub available: usize,
}

impl fmt::Display for SlotShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slots.as_slice() {
            [slot] => write!(
                f,
                "need {} {}-eligible player{}, only {} available",
                self.required,
                slot,
                if self.required == 1 { "" } else { "s" },
                self.available
            ),
            slots => write!(
                f,
                "need {} players for {} seats, only {} eligible for any of them",
                self.required,
                slots
                    .iter()
                    .map(|s| s.label())
                    .collect::<Vec<_>>()
                    .join(" + "),
                self.available
            ),
        }
    }
}

fn describe_shortfalls(shortfalls: &[SlotShortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Non-fatal conditions collected during a run and returned with the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineupWarning {
    /// The candidate's position is outside the known set; it was excluded
    /// from the solve.
    UnrecognizedPosition {
        id: CandidateId,
        name: String,
        position: String,
    },
}

impl fmt::Display for LineupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineupWarning::UnrecognizedPosition { id, name, position } => write!(
                f,
                "excluded {name} ({id}): unrecognized position `{position}`"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_message_names_slot_and_counts() {
        let s = SlotShortfall {
            slots: vec![SlotCategory::RunningBack],
            required: 2,
            available: 1,
        };
        assert_eq!(s.to_string(), "need 2 RB-eligible players, only 1 available");
    }

    #[test]
    fn singular_shortfall_message() {
        let s = SlotShortfall {
            slots: vec![SlotCategory::Kicker],
            required: 1,
            available: 0,
        };
        assert_eq!(s.to_string(), "need 1 K-eligible player, only 0 available");
    }

    #[test]
    fn group_shortfall_message_joins_slot_labels() {
        let s = SlotShortfall {
            slots: vec![SlotCategory::RunningBack, SlotCategory::Flex],
            required: 3,
            available: 2,
        };
        assert_eq!(
            s.to_string(),
            "need 3 players for RB + FLEX seats, only 2 eligible for any of them"
        );
    }

    #[test]
    fn slots_are_deduplicated_across_groups() {
        let err = InfeasibleError {
            shortfalls: vec![
                SlotShortfall {
                    slots: vec![SlotCategory::WideReceiver, SlotCategory::Flex],
                    required: 3,
                    available: 2,
                },
                SlotShortfall {
                    slots: vec![SlotCategory::RunningBack, SlotCategory::Flex],
                    required: 3,
                    available: 2,
                },
            ],
        };
        assert_eq!(
            err.slots(),
            vec![
                SlotCategory::RunningBack,
                SlotCategory::WideReceiver,
                SlotCategory::Flex
            ]
        );
    }

    #[test]
    fn infeasible_error_lists_every_shortfall() {
        let err = InfeasibleError {
            shortfalls: vec![
                SlotShortfall {
                    slots: vec![SlotCategory::Quarterback],
                    required: 1,
                    available: 0,
                },
                SlotShortfall {
                    slots: vec![SlotCategory::Kicker],
                    required: 1,
                    available: 0,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("need 1 QB-eligible player"));
        assert!(msg.contains("need 1 K-eligible player"));
        assert_eq!(err.slots(), vec![SlotCategory::Quarterback, SlotCategory::Kicker]);
    }

    #[test]
    fn validation_error_message() {
        let err = ValidationError {
            index: 3,
            reason: ValidationReason::MissingIdentity,
        };
        assert_eq!(
            err.to_string(),
            "invalid candidate at index 3: missing both id and name"
        );
    }
}
