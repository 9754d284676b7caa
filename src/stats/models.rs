use serde::{Deserialize, Serialize};

/// Records that can be ranked within a stats table.
pub trait RankedRecord {
    fn team(&self) -> &str;

    /// Primary ranking metric, sorted descending.
    fn ranking_metric(&self) -> i64;
}

/// Aggregate batting figures for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRecord {
    pub player: String,
    pub team: String,
    pub total_runs: i64,
    /// Batting average; absent for players never dismissed
    pub avg_runs: Option<f64>,
    pub avg_strikerate: Option<f64>,
    pub total_4s: i64,
    pub total_6s: i64,
    pub innings_count: i64,
}

/// Aggregate bowling figures for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingRecord {
    pub player: String,
    pub team: String,
    pub total_wicket: i64,
    /// Runs conceded
    pub total_runs1: i64,
    /// Economy rate
    pub avg_runrate: Option<f64>,
    pub total_overs: f64,
    pub total_maiden: i64,
    pub matches: i64,
}

impl RankedRecord for BattingRecord {
    fn team(&self) -> &str {
        &self.team
    }

    fn ranking_metric(&self) -> i64 {
        self.total_runs
    }
}

impl RankedRecord for BowlingRecord {
    fn team(&self) -> &str {
        &self.team
    }

    fn ranking_metric(&self) -> i64 {
        self.total_wicket
    }
}
