// Gridiron: weekly lineup recommendations from projection CSVs.

pub mod config;
pub mod matchup;
pub mod projections;
