// Configuration loading and parsing (league.toml).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gridiron_core::{LineupRules, SlotCategory, DEFAULT_RISK_AVERSION};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const LEAGUE_FILE: &str = "league.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Assembled configuration, validated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lineup: LineupConfig,
    pub data: DataPaths,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupConfig {
    #[serde(default = "default_risk_aversion")]
    pub risk_aversion: f64,
    /// Slot label (QB, RB, WR, TE, FLEX, D/ST, K) -> number of starters.
    #[serde(default = "default_slots")]
    pub slots: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub projections: String,
    #[serde(default)]
    pub opponent_projections: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_solve_timeout_secs")]
    pub solve_timeout_secs: u64,
    /// Where to write the JSON report. Stdout when absent.
    #[serde(default)]
    pub report_path: Option<String>,
}

impl Default for LineupConfig {
    fn default() -> Self {
        LineupConfig {
            risk_aversion: default_risk_aversion(),
            slots: default_slots(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            solve_timeout_secs: default_solve_timeout_secs(),
            report_path: None,
        }
    }
}

fn default_risk_aversion() -> f64 {
    DEFAULT_RISK_AVERSION
}

fn default_slots() -> BTreeMap<String, usize> {
    LineupRules::standard()
        .slots()
        .map(|(slot, count)| (slot.label().to_string(), count))
        .collect()
}

fn default_solve_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Build the engine's lineup rules from the `[lineup]` section.
    pub fn rules(&self) -> Result<LineupRules, ConfigError> {
        let mut slots = Vec::with_capacity(self.lineup.slots.len());
        for (label, &count) in &self.lineup.slots {
            let slot = SlotCategory::from_label(label).ok_or_else(|| {
                ConfigError::ValidationError {
                    field: format!("lineup.slots.{label}"),
                    message: "unknown slot label (expected QB, RB, WR, TE, FLEX, D/ST or K)"
                        .into(),
                }
            })?;
            slots.push((slot, count));
        }

        LineupRules::new(slots, self.lineup.risk_aversion).map_err(|e| {
            ConfigError::ValidationError {
                field: match &e {
                    gridiron_core::RulesError::InvalidRiskAversion(_) => "lineup.risk_aversion",
                    gridiron_core::RulesError::NoSlots => "lineup.slots",
                }
                .into(),
                message: e.to_string(),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/league.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join(LEAGUE_FILE);
    let text = read_file(&league_path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/league.toml` from `defaults/league.toml` on first run.
///
/// Returns the path written, or `None` when a league file is already in
/// place. An existing file is never overwritten.
pub fn install_default_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(LEAGUE_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(LEAGUE_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {LEAGUE_FILE} under {}/config or {}/defaults",
                base_dir.display(),
                base_dir.display()
            ),
        });
    }

    target
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::copy(&source, &target))
        .map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
        })?;

    info!("installed default league config at {}", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    install_default_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    config.rules()?;

    if config.data.projections.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.projections".into(),
            message: "must not be empty".into(),
        });
    }

    if config
        .data
        .opponent_projections
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "data.opponent_projections".into(),
            message: "must not be empty when present".into(),
        });
    }

    if config.runtime.solve_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "runtime.solve_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
