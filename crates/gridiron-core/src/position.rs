// Player positions, lineup slot categories, and the eligibility table that
// links them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a candidate can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "D/ST", alias = "DST", alias = "DEF")]
    TeamDefense,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::TeamDefense,
    ];

    /// Parse a canonical position code.
    ///
    /// Accepts "QB", "RB", "WR", "TE", "K" and "D/ST", plus the "DST"/"DEF"
    /// synonyms for team defense. Matching is exact: "qb" or " QB" are not
    /// recognized.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "D/ST" | "DST" | "DEF" => Some(Position::TeamDefense),
            _ => None,
        }
    }

    /// Canonical code for this position.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::TeamDefense => "D/ST",
        }
    }

    /// Slot categories a player at this position may legally occupy.
    pub fn eligible_slots(&self) -> &'static [SlotCategory] {
        match self {
            Position::Quarterback => &[SlotCategory::Quarterback],
            Position::RunningBack => &[SlotCategory::RunningBack, SlotCategory::Flex],
            Position::WideReceiver => &[SlotCategory::WideReceiver, SlotCategory::Flex],
            Position::TightEnd => &[SlotCategory::TightEnd, SlotCategory::Flex],
            Position::Kicker => &[SlotCategory::Kicker],
            Position::TeamDefense => &[SlotCategory::TeamDefense],
        }
    }

    /// Whether a player at this position can fill `slot`.
    pub fn can_fill(&self, slot: SlotCategory) -> bool {
        self.eligible_slots().contains(&slot)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Collapse position synonyms to their canonical code.
///
/// "DST" and "DEF" become "D/ST"; every other string is returned as-is, so
/// applying this twice is the same as applying it once.
pub fn normalize_position_code(code: &str) -> &str {
    match code {
        "DST" | "DEF" => "D/ST",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Slot categories
// ---------------------------------------------------------------------------

/// A named lineup slot. Variant order is the presentation order of starters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotCategory {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "D/ST")]
    TeamDefense,
    #[serde(rename = "K")]
    Kicker,
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 7] = [
        SlotCategory::Quarterback,
        SlotCategory::RunningBack,
        SlotCategory::WideReceiver,
        SlotCategory::TightEnd,
        SlotCategory::Flex,
        SlotCategory::TeamDefense,
        SlotCategory::Kicker,
    ];

    /// Parse a slot label as it appears in league configuration.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "QB" => Some(SlotCategory::Quarterback),
            "RB" => Some(SlotCategory::RunningBack),
            "WR" => Some(SlotCategory::WideReceiver),
            "TE" => Some(SlotCategory::TightEnd),
            "FLEX" => Some(SlotCategory::Flex),
            "D/ST" | "DST" | "DEF" => Some(SlotCategory::TeamDefense),
            "K" => Some(SlotCategory::Kicker),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotCategory::Quarterback => "QB",
            SlotCategory::RunningBack => "RB",
            SlotCategory::WideReceiver => "WR",
            SlotCategory::TightEnd => "TE",
            SlotCategory::Flex => "FLEX",
            SlotCategory::TeamDefense => "D/ST",
            SlotCategory::Kicker => "K",
        }
    }

    /// Index used to order starters for display.
    pub fn presentation_order(&self) -> u8 {
        match self {
            SlotCategory::Quarterback => 0,
            SlotCategory::RunningBack => 1,
            SlotCategory::WideReceiver => 2,
            SlotCategory::TightEnd => 3,
            SlotCategory::Flex => 4,
            SlotCategory::TeamDefense => 5,
            SlotCategory::Kicker => 6,
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
