// Head-to-head orchestration.
//
// Solves my lineup and (optionally) the opponent's under the same rules and
// compares starter totals. Each solve is CPU-bound and runs on the blocking
// pool; the pair shares one caller-imposed deadline.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gridiron_core::{
    optimize_lineup, LineupError, LineupResult, LineupRules, RawCandidate, SlotCategory,
};
use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Which roster a lineup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Mine,
    Opponent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Mine => write!(f, "my"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchupError {
    #[error("failed to build {side} lineup: {source}")]
    Lineup { side: Side, source: LineupError },

    #[error("lineup solve did not finish within {0:?}")]
    Timeout(Duration),

    #[error("lineup solve task failed: {0}")]
    Join(#[from] JoinError),
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One side's lineup plus its headline totals.
#[derive(Debug, Clone, Serialize)]
pub struct SideReport {
    #[serde(flatten)]
    pub lineup: LineupResult,
    pub projected_total: f64,
    pub risk_adjusted_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_summary: Option<String>,
}

impl From<LineupResult> for SideReport {
    fn from(lineup: LineupResult) -> Self {
        SideReport {
            projected_total: lineup.projected_total(),
            risk_adjusted_total: lineup.risk_adjusted_total(),
            exclusion_summary: lineup.exclusion_summary(),
            lineup,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchupReport {
    pub generated_at: DateTime<Utc>,
    pub rules: LineupRules,
    pub mine: SideReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<SideReport>,
    /// My projected starter total minus the opponent's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_margin: Option<f64>,
}

impl MatchupReport {
    pub fn new(rules: LineupRules, mine: LineupResult, opponent: Option<LineupResult>) -> Self {
        let mine = SideReport::from(mine);
        let opponent = opponent.map(SideReport::from);
        let projected_margin = opponent
            .as_ref()
            .map(|opp| mine.projected_total - opp.projected_total);

        MatchupReport {
            generated_at: Utc::now(),
            rules,
            mine,
            opponent,
            projected_margin,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

fn spawn_solve(
    raw: Vec<RawCandidate>,
    rules: Arc<LineupRules>,
) -> JoinHandle<Result<LineupResult, LineupError>> {
    tokio::task::spawn_blocking(move || optimize_lineup(&raw, &rules))
}

async fn join_solve(
    side: Side,
    handle: JoinHandle<Result<LineupResult, LineupError>>,
) -> Result<LineupResult, MatchupError> {
    handle.await?.map_err(|source| {
        if let LineupError::Infeasible(e) = &source {
            let short: Vec<&str> = e.slots().iter().map(SlotCategory::label).collect();
            warn!("{side} roster cannot fill {}", short.join(", "));
        }
        MatchupError::Lineup { side, source }
    })
}

/// Await `fut`, failing with [`MatchupError::Timeout`] once `deadline` passes.
///
/// A blocking solve already running when the deadline passes is not
/// interrupted; its result is dropped.
async fn with_deadline<T>(
    deadline: Duration,
    fut: impl std::future::Future<Output = Result<T, MatchupError>>,
) -> Result<T, MatchupError> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!("lineup solve exceeded deadline of {:?}", deadline);
            Err(MatchupError::Timeout(deadline))
        }
    }
}

/// Solve both lineups concurrently and build the report.
pub async fn run_matchup(
    mine: Vec<RawCandidate>,
    opponent: Option<Vec<RawCandidate>>,
    rules: LineupRules,
    deadline: Duration,
) -> Result<MatchupReport, MatchupError> {
    let shared = Arc::new(rules.clone());

    let (mine, opponent) = with_deadline(deadline, async {
        let mine_task = spawn_solve(mine, Arc::clone(&shared));
        let opponent_task = opponent.map(|raw| spawn_solve(raw, Arc::clone(&shared)));

        let mine = join_solve(Side::Mine, mine_task).await?;
        let opponent = match opponent_task {
            Some(task) => Some(join_solve(Side::Opponent, task).await?),
            None => None,
        };
        Ok::<_, MatchupError>((mine, opponent))
    })
    .await?;

    let report = MatchupReport::new(rules, mine, opponent);
    info!(
        "matchup ready: my projected total {:.2} (risk-adjusted {:.2})",
        report.mine.projected_total, report.mine.risk_adjusted_total
    );
    if let (Some(opp), Some(margin)) = (&report.opponent, report.projected_margin) {
        info!(
            "opponent projected total {:.2}, margin {:+.2}",
            opp.projected_total, margin
        );
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
