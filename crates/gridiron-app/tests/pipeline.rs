// Integration tests for the gridiron app.
//
// These run the full flow through the library crate's public API: CSV
// projections in, both lineups solved concurrently, JSON report out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gridiron_app::matchup::{run_matchup, MatchupError, Side};
use gridiron_app::projections::load_projections;
use gridiron_core::{LineupError, LineupRules, SlotCategory};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory (relative to the package root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn starter_names(side: &gridiron_app::matchup::SideReport, slot: SlotCategory) -> Vec<String> {
    side.lineup
        .starters_in(slot)
        .map(|s| s.candidate.name.clone())
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn fixture_projections_load() {
    let mine = load_projections(&fixture("my_team.csv")).unwrap();
    // 16 data rows, one of them malformed.
    assert_eq!(mine.len(), 15);
    assert!(mine.iter().all(|c| c.name.as_deref() != Some("Broken Row")));

    let ravens = mine
        .iter()
        .find(|c| c.name.as_deref() == Some("Ravens D/ST"))
        .unwrap();
    assert!(ravens.id.is_none());
    // Blank uncertainty, floor 2.0, ceiling 14.0.
    assert_eq!(
        ravens.uncertainty.as_ref().and_then(|u| u.as_finite()),
        Some(6.0)
    );
}

#[tokio::test]
async fn full_matchup_from_fixtures() {
    let mine = load_projections(&fixture("my_team.csv")).unwrap();
    let opponent = load_projections(&fixture("opponent.csv")).unwrap();

    let report = run_matchup(
        mine,
        Some(opponent),
        LineupRules::standard(),
        Duration::from_secs(10),
    )
    .await
    .unwrap();

    // My side.
    assert_eq!(report.mine.lineup.starters.len(), 9);
    assert_eq!(starter_names(&report.mine, SlotCategory::Quarterback), vec!["Jalen Hurts"]);
    assert_eq!(
        starter_names(&report.mine, SlotCategory::WideReceiver),
        vec!["CeeDee Lamb", "Tyreek Hill"]
    );
    assert_eq!(starter_names(&report.mine, SlotCategory::Flex), vec!["DK Metcalf"]);
    assert_eq!(
        starter_names(&report.mine, SlotCategory::TeamDefense),
        vec!["Ravens D/ST"]
    );
    assert_eq!(report.mine.lineup.bench.len(), 5);
    assert_eq!(report.mine.lineup.excluded.len(), 1);
    assert_eq!(
        report.mine.exclusion_summary.as_deref(),
        Some("1 candidate excluded: unrecognized position")
    );
    assert!((report.mine.projected_total - 133.4).abs() < 1e-9);

    // Opponent: Garrett Wilson (13.8 - 0.6) takes FLEX over Rachaad White
    // (12.4 - 0.45).
    let opp = report.opponent.as_ref().unwrap();
    assert_eq!(starter_names(opp, SlotCategory::Flex), vec!["Garrett Wilson"]);
    assert_eq!(
        starter_names(opp, SlotCategory::TeamDefense),
        vec!["49ers D/ST"]
    );
    assert!((opp.projected_total - 138.3).abs() < 1e-9);

    assert!((report.projected_margin.unwrap() - (133.4 - 138.3)).abs() < 1e-9);
}

#[tokio::test]
async fn report_json_shape() {
    let mine = load_projections(&fixture("my_team.csv")).unwrap();
    let report = run_matchup(mine, None, LineupRules::standard(), Duration::from_secs(10))
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let starters = json["mine"]["starters"].as_array().unwrap();
    let slots: Vec<&str> = starters.iter().map(|s| s["slot"].as_str().unwrap()).collect();
    assert_eq!(slots, vec!["QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "D/ST", "K"]);

    // Native position and slot are both reported.
    assert_eq!(starters[6]["position"], "WR");
    assert_eq!(starters[7]["position"], "D/ST");
    assert_eq!(starters[0]["id"], 4241457);
    assert_eq!(starters[7]["id"], "name:Ravens D/ST");

    assert_eq!(json["mine"]["excluded"][0]["reason"], "unrecognized_position");
    assert_eq!(json["mine"]["warnings"][0]["kind"], "unrecognized_position");
    assert_eq!(json["rules"]["risk_aversion"], 0.15);
    assert!(json.get("opponent").is_none());
}

#[tokio::test]
async fn opponent_without_kicker_is_infeasible() {
    let mine = load_projections(&fixture("my_team.csv")).unwrap();
    let opponent = load_projections(&fixture("opponent_no_kicker.csv")).unwrap();

    let err = run_matchup(
        mine,
        Some(opponent),
        LineupRules::standard(),
        Duration::from_secs(10),
    )
    .await
    .unwrap_err();

    match err {
        MatchupError::Lineup {
            side: Side::Opponent,
            source: LineupError::Infeasible(e),
        } => {
            assert_eq!(e.slots(), vec![SlotCategory::Kicker]);
            assert!(e.to_string().contains("need 1 K-eligible player, only 0 available"));
        }
        other => panic!("expected opponent infeasibility, got: {other}"),
    }
}
