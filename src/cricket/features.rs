//! Match-state → model-input feature derivation.
//!
//! Pure functions only. Every division is guarded so a fresh innings
//! (0 overs) or an exhausted one (50 overs) never divides by zero.

use serde::Serialize;

use super::teams::{Team, Venue};

/// Balls in a full 50-over ODI innings.
pub const BALLS_PER_INNINGS: i64 = 300;
pub const BALLS_PER_OVER: f64 = 6.0;
pub const WICKETS_PER_INNINGS: i64 = 10;

/// Second-innings chase state submitted from the match form.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub venue: Venue,
    pub target: u32,
    pub current_score: u32,
    pub overs_completed: f64,
    pub wickets_lost: u32,
}

/// Chase features fed to the win-probability model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFeatures {
    /// Negative once the target has been passed.
    pub runs_left: i64,
    /// Clamped to `[0, 300]`.
    pub balls_left: i64,
    pub wickets_left: i64,
    pub current_run_rate: f64,
    pub required_run_rate: f64,
}

pub fn derive_features(state: &MatchState) -> DerivedFeatures {
    let runs_left = i64::from(state.target) - i64::from(state.current_score);
    let balls_left = remaining_balls(state.overs_completed);
    let wickets_left = WICKETS_PER_INNINGS - i64::from(state.wickets_lost);

    let current_run_rate = if state.overs_completed > 0.0 {
        f64::from(state.current_score) / state.overs_completed
    } else {
        0.0
    };
    let required_run_rate = if balls_left > 0 {
        runs_left as f64 * BALLS_PER_OVER / balls_left as f64
    } else {
        0.0
    };

    DerivedFeatures {
        runs_left,
        balls_left,
        wickets_left,
        current_run_rate,
        required_run_rate,
    }
}

/// Overs are taken as a decimal count (10.5 = ten and a half overs), the same
/// way the models were trained.
fn remaining_balls(overs_completed: f64) -> i64 {
    let bowled = (overs_completed * BALLS_PER_OVER).round() as i64;
    (BALLS_PER_INNINGS - bowled).clamp(0, BALLS_PER_INNINGS)
}

/// First-innings state submitted from the score form.
#[derive(Debug, Clone, PartialEq)]
pub struct InningsState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub venue: Venue,
    pub current_score: u32,
    pub runs_last_5: u32,
    pub wickets_lost: u32,
    pub wickets_last_5: u32,
    pub overs_completed: f64,
}

/// One value in a model input row.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

/// A named, ordered model input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRecord {
    pub fn numeric(mut self, name: &'static str, value: f64) -> Self {
        self.columns.push((name, FeatureValue::Numeric(value)));
        self
    }

    pub fn categorical(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.columns.push((name, FeatureValue::Categorical(value.into())));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (*name, value))
    }
}

/// Row layout expected by the win-probability model.
pub fn match_record(state: &MatchState, features: &DerivedFeatures) -> FeatureRecord {
    FeatureRecord::default()
        .categorical("batting_team", state.batting_team.name())
        .categorical("bowling_team", state.bowling_team.name())
        .categorical("city", state.venue.name())
        .numeric("runs_left", features.runs_left as f64)
        .numeric("balls_left", features.balls_left as f64)
        .numeric("wickets_left", features.wickets_left as f64)
        .numeric("total_runs_x", f64::from(state.target))
        .numeric("crr", features.current_run_rate)
        .numeric("rrr", features.required_run_rate)
}

/// Row layout expected by the score model. Inputs pass through as-is.
pub fn score_record(state: &InningsState) -> FeatureRecord {
    FeatureRecord::default()
        .numeric("ball", state.overs_completed)
        .categorical("batting_team", state.batting_team.name())
        .categorical("bowling_team", state.bowling_team.name())
        .numeric("innings_runs", f64::from(state.current_score))
        .numeric("runs_last_5_overs", f64::from(state.runs_last_5))
        .numeric("innings_wickets", f64::from(state.wickets_lost))
        .numeric("wickets_last_5_overs", f64::from(state.wickets_last_5))
        .categorical("city", state.venue.name())
}
