// Candidate records: the raw shape handed over by projection sources and the
// validated shape the engine works with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::Position;

/// Opaque player identifier. Unique within one candidate batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Numeric(i64),
    Text(String),
}

impl CandidateId {
    /// Synthetic id for records that only carry a name (team defenses, for
    /// example, have no numeric player id upstream).
    pub fn from_name(name: &str) -> Self {
        CandidateId::Text(format!("name:{name}"))
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateId::Numeric(n) => write!(f, "{n}"),
            CandidateId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for CandidateId {
    fn from(n: i64) -> Self {
        CandidateId::Numeric(n)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        CandidateId::Text(s.to_string())
    }
}

/// A numeric field as it arrives from upstream: already a number, or text
/// that may or may not parse as one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// The finite value this field holds, if any.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(n) => *n,
            RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawNumber {
    fn from(n: f64) -> Self {
        RawNumber::Number(n)
    }
}

/// One candidate record exactly as an upstream source produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub id: Option<CandidateId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub projected_points: Option<RawNumber>,
    #[serde(default)]
    pub uncertainty: Option<RawNumber>,
    #[serde(default)]
    pub floor: Option<RawNumber>,
    #[serde(default)]
    pub ceiling: Option<RawNumber>,
    #[serde(default)]
    pub team: Option<String>,
}

impl RawCandidate {
    /// Convenience constructor for a fully-populated record.
    pub fn new(
        id: impl Into<CandidateId>,
        name: &str,
        position: &str,
        projected_points: f64,
        uncertainty: f64,
    ) -> Self {
        RawCandidate {
            id: Some(id.into()),
            name: Some(name.to_string()),
            position: position.to_string(),
            projected_points: Some(RawNumber::Number(projected_points)),
            uncertainty: Some(RawNumber::Number(uncertainty)),
            ..Default::default()
        }
    }
}

/// A validated candidate with numeric fields coerced and the position code
/// normalized. The position code may still be unrecognized; eligibility
/// resolution decides what happens to those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub position: String,
    pub projected_points: f64,
    pub uncertainty: f64,
    /// Informational only; never read by the solver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    /// Informational only; never read by the solver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl Candidate {
    /// Projected points minus the uncertainty penalty.
    pub fn risk_adjusted(&self, risk_aversion: f64) -> f64 {
        self.projected_points - risk_aversion * self.uncertainty
    }

    /// The recognized position, if the code is one the engine knows.
    pub fn parsed_position(&self) -> Option<Position> {
        Position::from_code(&self.position)
    }
}
