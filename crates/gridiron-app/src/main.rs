// Gridiron entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the report)
// 2. Load config
// 3. Load projections for my roster and the opponent's
// 4. Solve both lineups under the configured deadline
// 5. Write the JSON report

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use gridiron_app::{config, matchup, projections};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("gridiron starting up");

    let config = config::load_config().context("failed to load configuration")?;
    let rules = config.rules().context("invalid lineup rules")?;
    info!(
        "Config loaded: {} starters, risk aversion {}",
        rules.total_seats(),
        rules.risk_aversion()
    );

    let mine = projections::load_projections(Path::new(&config.data.projections))
        .with_context(|| format!("failed to load projections from {}", config.data.projections))?;
    let opponent = match &config.data.opponent_projections {
        Some(path) => Some(
            projections::load_projections(Path::new(path))
                .with_context(|| format!("failed to load opponent projections from {path}"))?,
        ),
        None => None,
    };
    info!(
        "Loaded {} candidates ({} for opponent)",
        mine.len(),
        opponent.as_ref().map_or(0, Vec::len)
    );

    let deadline = Duration::from_secs(config.runtime.solve_timeout_secs);
    let report = matchup::run_matchup(mine, opponent, rules, deadline)
        .await
        .context("lineup optimization failed")?;

    let json = report.to_json().context("failed to serialize report")?;
    match &config.runtime.report_path {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Initialize tracing to write to a log file in the `logs/` directory.
///
/// Stdout is reserved for the report. Set `RUST_LOG` to override the filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridiron.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridiron=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
