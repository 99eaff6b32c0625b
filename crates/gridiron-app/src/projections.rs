// Projection data loading.
//
// Reads weekly projection CSVs into raw candidate records for the lineup
// engine. Column names follow the common export formats (`player_id` or `id`,
// `pred_points` or `projected_points`, ...). Numeric cells are passed through
// as text; the engine decides what counts as a usable number.

use std::io::Read;
use std::path::Path;

use gridiron_core::{CandidateId, RawCandidate, RawNumber};
use serde::Deserialize;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One projection row. Every column is optional text so that a bad cell in
/// one column never costs the whole row; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct ProjectionRow {
    #[serde(default, alias = "id")]
    player_id: Option<String>,
    #[serde(default, alias = "name")]
    player_name: Option<String>,
    #[serde(default, alias = "position")]
    pos: Option<String>,
    #[serde(default, alias = "projected_points", alias = "proj_points")]
    pred_points: Option<String>,
    #[serde(default, alias = "uncertainty")]
    uncert: Option<String>,
    #[serde(default)]
    floor: Option<String>,
    #[serde(default)]
    ceiling: Option<String>,
    #[serde(default, alias = "team")]
    pro_team: Option<String>,
}

impl ProjectionRow {
    fn into_raw(self) -> RawCandidate {
        let floor = non_empty(self.floor).map(RawNumber::Text);
        let ceiling = non_empty(self.ceiling).map(RawNumber::Text);
        let mut uncertainty = non_empty(self.uncert).map(RawNumber::Text);

        if uncertainty.as_ref().and_then(RawNumber::as_finite).is_none() {
            if let Some(spread) = half_spread(floor.as_ref(), ceiling.as_ref()) {
                debug!(
                    "uncertainty for {:?} derived from floor/ceiling: {spread}",
                    self.player_name
                );
                uncertainty = Some(RawNumber::Number(spread));
            }
        }

        RawCandidate {
            id: non_empty(self.player_id).map(parse_id),
            name: non_empty(self.player_name),
            position: self.pos.unwrap_or_default(),
            projected_points: non_empty(self.pred_points).map(RawNumber::Text),
            uncertainty,
            floor,
            ceiling,
            team: non_empty(self.pro_team),
        }
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.is_empty())
}

/// Numeric ids stay numeric so they compare equal to ids from other sources.
fn parse_id(raw: String) -> CandidateId {
    match raw.parse::<i64>() {
        Ok(n) => CandidateId::Numeric(n),
        Err(_) => CandidateId::Text(raw),
    }
}

/// Half the floor-to-ceiling range, when both ends are usable and ordered.
fn half_spread(floor: Option<&RawNumber>, ceiling: Option<&RawNumber>) -> Option<f64> {
    let floor = floor?.as_finite()?;
    let ceiling = ceiling?.as_finite()?;
    if ceiling < floor {
        warn!("ignoring inverted floor/ceiling ({floor} > {ceiling})");
        return None;
    }
    Some((ceiling - floor) / 2.0)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_projections_from_reader<R: Read>(rdr: R) -> Result<Vec<RawCandidate>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut candidates = Vec::new();
    for result in reader.deserialize::<ProjectionRow>() {
        match result {
            Ok(row) => candidates.push(row.into_raw()),
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
            }
        }
    }
    Ok(candidates)
}

/// Load one team's projections from a CSV file.
pub fn load_projections(path: &Path) -> Result<Vec<RawCandidate>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let candidates = load_projections_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if candidates.is_empty() {
        return Err(ProjectionError::Validation(format!(
            "no projection rows in {}",
            path.display()
        )));
    }

    debug!("loaded {} projection rows from {}", candidates.len(), path.display());
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
