// Input normalization: coerce numeric fields, fill identity gaps, and collapse
// position synonyms. Pure transformation over the raw batch.

use std::collections::HashSet;

use tracing::debug;

use crate::candidate::{Candidate, CandidateId, RawCandidate, RawNumber};
use crate::error::{ValidationError, ValidationReason};
use crate::position::normalize_position_code;

/// Uncertainty assumed when upstream data omits it.
pub const DEFAULT_UNCERTAINTY: f64 = 3.0;

/// Largest magnitude accepted for projected points or uncertainty.
pub const MAX_ABS_VALUE: f64 = 1e9;

/// Normalize a raw batch into validated candidates, preserving input order.
///
/// Missing or non-numeric `projected_points` become 0.0 and missing
/// `uncertainty` becomes [`DEFAULT_UNCERTAINTY`]; neither is an error. A record
/// with neither id nor name, a repeated id, a negative uncertainty, or a value
/// beyond [`MAX_ABS_VALUE`] fails the whole batch.
pub fn normalize(raw: &[RawCandidate]) -> Result<Vec<Candidate>, ValidationError> {
    let mut seen: HashSet<CandidateId> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for (index, record) in raw.iter().enumerate() {
        let candidate = normalize_one(index, record)?;
        if !seen.insert(candidate.id.clone()) {
            return Err(ValidationError {
                index,
                reason: ValidationReason::DuplicateId(candidate.id),
            });
        }
        out.push(candidate);
    }

    Ok(out)
}

fn normalize_one(index: usize, record: &RawCandidate) -> Result<Candidate, ValidationError> {
    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let id = record.id.clone().filter(|id| match id {
        CandidateId::Text(s) => !s.trim().is_empty(),
        CandidateId::Numeric(_) => true,
    });

    let (id, name) = match (id, name) {
        (Some(id), Some(name)) => (id, name.to_string()),
        (Some(id), None) => {
            let name = id.to_string();
            (id, name)
        }
        (None, Some(name)) => (CandidateId::from_name(name), name.to_string()),
        (None, None) => {
            return Err(ValidationError {
                index,
                reason: ValidationReason::MissingIdentity,
            })
        }
    };

    let projected_points = match coerce(record.projected_points.as_ref()) {
        Some(v) => v,
        None => {
            debug!("{name}: projected points missing or non-numeric, using 0.0");
            0.0
        }
    };
    check_range(index, "projected_points", projected_points)?;

    let uncertainty = match coerce(record.uncertainty.as_ref()) {
        Some(v) => v,
        None => {
            debug!("{name}: uncertainty missing, using {DEFAULT_UNCERTAINTY}");
            DEFAULT_UNCERTAINTY
        }
    };
    check_range(index, "uncertainty", uncertainty)?;
    if uncertainty < 0.0 {
        return Err(ValidationError {
            index,
            reason: ValidationReason::ValueOutOfRange {
                field: "uncertainty",
                value: uncertainty,
            },
        });
    }

    Ok(Candidate {
        id,
        name,
        position: normalize_position_code(&record.position).to_string(),
        projected_points,
        uncertainty,
        floor: coerce(record.floor.as_ref()),
        ceiling: coerce(record.ceiling.as_ref()),
        team: record.team.clone(),
    })
}

/// Reject a batch in which some candidate's risk-adjusted score is not a
/// finite number under `risk_aversion`.
///
/// Points and uncertainty are bounded by [`MAX_ABS_VALUE`], but λ is not, so
/// λ·uncertainty can still overflow.
pub fn check_scores(candidates: &[Candidate], risk_aversion: f64) -> Result<(), ValidationError> {
    match candidates
        .iter()
        .position(|c| !c.risk_adjusted(risk_aversion).is_finite())
    {
        Some(index) => Err(ValidationError {
            index,
            reason: ValidationReason::NonFiniteScore { risk_aversion },
        }),
        None => Ok(()),
    }
}

fn coerce(value: Option<&RawNumber>) -> Option<f64> {
    value.and_then(RawNumber::as_finite)
}

fn check_range(index: usize, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.abs() > MAX_ABS_VALUE {
        return Err(ValidationError {
            index,
            reason: ValidationReason::ValueOutOfRange { field, value },
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<CandidateId>, name: Option<&str>, pos: &str) -> RawCandidate {
        RawCandidate {
            id,
            name: name.map(str::to_string),
            position: pos.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_points_default_to_zero() {
        let out = normalize(&[raw(Some(CandidateId::Numeric(1)), Some("A"), "RB")]).unwrap();
        assert_eq!(out[0].projected_points, 0.0);
    }

    #[test]
    fn non_numeric_points_default_to_zero() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "RB");
        r.projected_points = Some(RawNumber::Text("--".into()));
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].projected_points, 0.0);
    }

    #[test]
    fn nan_points_default_to_zero() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "RB");
        r.projected_points = Some(RawNumber::Number(f64::NAN));
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].projected_points, 0.0);
    }

    #[test]
    fn textual_points_are_parsed() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "RB");
        r.projected_points = Some(RawNumber::Text("14.25".into()));
        let out = normalize(&[r]).unwrap();
        assert!((out[0].projected_points - 14.25).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_uncertainty_defaults_to_three() {
        let out = normalize(&[raw(Some(CandidateId::Numeric(1)), Some("A"), "WR")]).unwrap();
        assert_eq!(out[0].uncertainty, DEFAULT_UNCERTAINTY);
        assert_eq!(out[0].uncertainty, 3.0);
    }

    #[test]
    fn defense_synonyms_normalized() {
        let out = normalize(&[
            raw(Some(CandidateId::Numeric(1)), Some("Bears D/ST"), "DST"),
            raw(Some(CandidateId::Numeric(2)), Some("Jets D/ST"), "DEF"),
            raw(Some(CandidateId::Numeric(3)), Some("Bills D/ST"), "D/ST"),
        ])
        .unwrap();
        assert!(out.iter().all(|c| c.position == "D/ST"));
    }

    #[test]
    fn position_case_is_not_corrected() {
        let out = normalize(&[raw(Some(CandidateId::Numeric(1)), Some("A"), "wr")]).unwrap();
        assert_eq!(out[0].position, "wr");
    }

    #[test]
    fn normalizing_twice_is_a_no_op_for_positions() {
        let once = normalize(&[raw(Some(CandidateId::Numeric(1)), Some("A"), "DEF")]).unwrap();
        let again: Vec<RawCandidate> = once
            .iter()
            .map(|c| raw(Some(c.id.clone()), Some(&c.name), &c.position))
            .collect();
        let twice = normalize(&again).unwrap();
        assert_eq!(once[0].position, twice[0].position);
    }

    #[test]
    fn missing_id_gets_synthetic_key_from_name() {
        let out = normalize(&[raw(None, Some("Steelers D/ST"), "D/ST")]).unwrap();
        assert_eq!(out[0].id, CandidateId::from_name("Steelers D/ST"));
    }

    #[test]
    fn missing_name_uses_id() {
        let out = normalize(&[raw(Some(CandidateId::Numeric(3918298)), None, "QB")]).unwrap();
        assert_eq!(out[0].name, "3918298");
    }

    #[test]
    fn missing_id_and_name_fails_batch() {
        let err = normalize(&[
            raw(Some(CandidateId::Numeric(1)), Some("A"), "QB"),
            raw(None, Some("   "), "RB"),
        ])
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.reason, ValidationReason::MissingIdentity);
    }

    #[test]
    fn blank_text_id_counts_as_missing() {
        let err = normalize(&[raw(Some("".into()), None, "RB")]).unwrap_err();
        assert_eq!(err.reason, ValidationReason::MissingIdentity);
    }

    #[test]
    fn duplicate_ids_fail_batch() {
        let err = normalize(&[
            raw(Some(CandidateId::Numeric(7)), Some("A"), "QB"),
            raw(Some(CandidateId::Numeric(7)), Some("B"), "RB"),
        ])
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.reason, ValidationReason::DuplicateId(CandidateId::Numeric(7)));
    }

    #[test]
    fn negative_uncertainty_rejected() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "RB");
        r.uncertainty = Some(RawNumber::Number(-1.0));
        let err = normalize(&[r]).unwrap_err();
        assert!(matches!(
            err.reason,
            ValidationReason::ValueOutOfRange { field: "uncertainty", .. }
        ));
    }

    #[test]
    fn huge_points_rejected() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "RB");
        r.projected_points = Some(RawNumber::Number(5e12));
        let err = normalize(&[r]).unwrap_err();
        assert!(matches!(
            err.reason,
            ValidationReason::ValueOutOfRange { field: "projected_points", .. }
        ));
    }

    #[test]
    fn floor_and_ceiling_carried_through() {
        let mut r = raw(Some(CandidateId::Numeric(1)), Some("A"), "TE");
        r.floor = Some(RawNumber::Number(4.0));
        r.ceiling = Some(RawNumber::Text("bad".into()));
        let out = normalize(&[r]).unwrap();
        assert_eq!(out[0].floor, Some(4.0));
        assert_eq!(out[0].ceiling, None);
    }

    #[test]
    fn preserves_input_order() {
        let out = normalize(&[
            raw(Some(CandidateId::Numeric(3)), Some("C"), "QB"),
            raw(Some(CandidateId::Numeric(1)), Some("A"), "QB"),
            raw(Some(CandidateId::Numeric(2)), Some("B"), "QB"),
        ])
        .unwrap();
        let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn overflowing_risk_penalty_is_rejected() {
        let mut steady = raw(Some(CandidateId::Numeric(1)), Some("Steady"), "WR");
        steady.projected_points = Some(RawNumber::Number(1.0));
        steady.uncertainty = Some(RawNumber::Number(1e8));
        let mut wild = raw(Some(CandidateId::Numeric(2)), Some("Wild"), "WR");
        wild.projected_points = Some(RawNumber::Number(5.0));
        wild.uncertainty = Some(RawNumber::Number(1e9));
        let out = normalize(&[steady, wild]).unwrap();

        let err = check_scores(&out, 1e300).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(
            err.reason,
            ValidationReason::NonFiniteScore { risk_aversion: 1e300 }
        );
        assert!(check_scores(&out, 0.15).is_ok());
    }
}
