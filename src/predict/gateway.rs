//! Uniform prediction entry point over the two opaque models.
//!
//! Both paths share the same recovery: any model error is logged and turned
//! into [`AppError::PredictionFailed`], never a panic.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::model::{ScoreRegressor, WinClassifier};
use crate::cricket::{
    derive_features, match_record, score_record, DerivedFeatures, InningsState, MatchState, Team,
};
use crate::error::AppError;

/// Tolerance on `p_bowling + p_batting == 1`.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Serialize)]
pub struct MatchPrediction {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub win_probability_batting: f64,
    pub win_probability_bowling: f64,
    /// Display percentages, both rounded half to even.
    pub batting_win_pct: u8,
    pub bowling_win_pct: u8,
    pub features: DerivedFeatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScorePrediction {
    pub prediction: i64,
}

/// Read-only wrapper over the loaded model handles.
#[derive(Clone)]
pub struct PredictionGateway {
    win_model: Arc<dyn WinClassifier>,
    score_model: Arc<dyn ScoreRegressor>,
}

impl PredictionGateway {
    pub fn new(win_model: Arc<dyn WinClassifier>, score_model: Arc<dyn ScoreRegressor>) -> Self {
        PredictionGateway {
            win_model,
            score_model,
        }
    }

    pub fn predict_match(&self, state: &MatchState) -> Result<MatchPrediction, AppError> {
        let features = derive_features(state);
        let record = match_record(state, &features);
        debug!(?features, "Predicting {} vs {}", state.batting_team, state.bowling_team);

        let (bowling, batting) = self.win_model.predict_proba(&record).map_err(|e| {
            error!("Win model '{}' failed: {}", self.win_model.name(), e);
            AppError::PredictionFailed(e.to_string())
        })?;
        check_probabilities(bowling, batting).map_err(|msg| {
            error!("Win model '{}' returned {}", self.win_model.name(), msg);
            AppError::PredictionFailed(msg)
        })?;

        Ok(MatchPrediction {
            batting_team: state.batting_team,
            bowling_team: state.bowling_team,
            win_probability_batting: batting,
            win_probability_bowling: bowling,
            batting_win_pct: to_percent(batting),
            bowling_win_pct: to_percent(bowling),
            features,
        })
    }

    pub fn predict_score(&self, state: &InningsState) -> Result<ScorePrediction, AppError> {
        let record = score_record(state);
        debug!(
            "Projecting total for {} ({} after {} overs)",
            state.batting_team, state.current_score, state.overs_completed
        );

        let raw = self.score_model.predict(&record).map_err(|e| {
            error!("Score model '{}' failed: {}", self.score_model.name(), e);
            AppError::PredictionFailed(e.to_string())
        })?;
        if !raw.is_finite() {
            error!("Score model '{}' returned {}", self.score_model.name(), raw);
            return Err(AppError::PredictionFailed(
                "score model produced a non-finite value".to_string(),
            ));
        }

        Ok(ScorePrediction {
            prediction: raw.round_ties_even() as i64,
        })
    }
}

fn check_probabilities(bowling: f64, batting: f64) -> Result<(), String> {
    let valid = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    if !valid(bowling) || !valid(batting) {
        return Err(format!("probabilities out of range: ({}, {})", bowling, batting));
    }
    if ((bowling + batting) - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(format!(
            "probabilities do not sum to 1: ({}, {})",
            bowling, batting
        ));
    }
    Ok(())
}

fn to_percent(p: f64) -> u8 {
    (p * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cricket::FeatureRecord;
    use crate::predict::model::ModelError;
    use approx::assert_relative_eq;

    /// Returns a fixed class pair regardless of input.
    pub(crate) struct FixedClassifier(pub f64, pub f64);

    impl WinClassifier for FixedClassifier {
        fn predict_proba(&self, _: &FeatureRecord) -> Result<(f64, f64), ModelError> {
            Ok((self.0, self.1))
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Returns a fixed total regardless of input.
    pub(crate) struct FixedRegressor(pub f64);

    impl ScoreRegressor for FixedRegressor {
        fn predict(&self, _: &FeatureRecord) -> Result<f64, ModelError> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Fails every call the way an unseen category would.
    pub(crate) struct BrokenModel;

    impl WinClassifier for BrokenModel {
        fn predict_proba(&self, _: &FeatureRecord) -> Result<(f64, f64), ModelError> {
            Err(ModelError::UnknownCategory {
                column: "city".into(),
                value: "Nowhere".into(),
            })
        }
        fn name(&self) -> &str {
            "broken"
        }
    }

    impl ScoreRegressor for BrokenModel {
        fn predict(&self, _: &FeatureRecord) -> Result<f64, ModelError> {
            Err(ModelError::MissingFeature("ball".into()))
        }
        fn name(&self) -> &str {
            "broken"
        }
    }

    fn gateway(
        win: impl WinClassifier + 'static,
        score: impl ScoreRegressor + 'static,
    ) -> PredictionGateway {
        PredictionGateway::new(Arc::new(win), Arc::new(score))
    }

    fn chase() -> MatchState {
        MatchState {
            batting_team: Team::India,
            bowling_team: Team::Pakistan,
            venue: "Kolkata".parse().unwrap(),
            target: 180,
            current_score: 90,
            overs_completed: 10.0,
            wickets_lost: 2,
        }
    }

    fn innings() -> InningsState {
        InningsState {
            batting_team: Team::SriLanka,
            bowling_team: Team::Bangladesh,
            venue: "Colombo".parse().unwrap(),
            current_score: 120,
            runs_last_5: 30,
            wickets_lost: 2,
            wickets_last_5: 0,
            overs_completed: 22.0,
        }
    }

    #[test]
    fn match_prediction_carries_features_and_percentages() {
        let gw = gateway(FixedClassifier(0.27, 0.73), FixedRegressor(0.0));
        let p = gw.predict_match(&chase()).unwrap();
        assert_eq!(p.batting_win_pct, 73);
        assert_eq!(p.bowling_win_pct, 27);
        assert_relative_eq!(p.win_probability_batting, 0.73, epsilon = 1e-12);
        assert_eq!(p.features.runs_left, 90);
        assert_eq!(p.features.balls_left, 240);
        assert_eq!(p.features.wickets_left, 8);
        assert_relative_eq!(p.features.current_run_rate, 9.0, epsilon = 1e-12);
        assert_relative_eq!(p.features.required_run_rate, 2.25, epsilon = 1e-12);
    }

    #[test]
    fn percentages_sum_to_hundred_within_one() {
        for i in 0..=1000 {
            let batting = i as f64 / 1000.0;
            let gw = gateway(FixedClassifier(1.0 - batting, batting), FixedRegressor(0.0));
            let p = gw.predict_match(&chase()).unwrap();
            let total = i32::from(p.batting_win_pct) + i32::from(p.bowling_win_pct);
            assert!((99..=101).contains(&total), "{} -> {}", batting, total);
        }
    }

    #[test]
    fn invalid_probabilities_are_prediction_failures() {
        for (bowl, bat) in [(0.7, 0.7), (f64::NAN, 0.5), (-0.1, 1.1)] {
            let gw = gateway(FixedClassifier(bowl, bat), FixedRegressor(0.0));
            let err = gw.predict_match(&chase()).unwrap_err();
            assert_eq!(err.kind(), "PredictionFailed");
        }
    }

    #[test]
    fn model_error_becomes_prediction_failed() {
        let gw = gateway(BrokenModel, BrokenModel);
        let err = gw.predict_match(&chase()).unwrap_err();
        assert!(matches!(err, AppError::PredictionFailed(ref m) if m.contains("Nowhere")));
        let err = gw.predict_score(&innings()).unwrap_err();
        assert!(matches!(err, AppError::PredictionFailed(_)));
    }

    #[test]
    fn score_rounds_to_nearest() {
        let gw = gateway(FixedClassifier(0.5, 0.5), FixedRegressor(187.6));
        assert_eq!(gw.predict_score(&innings()).unwrap().prediction, 188);
        let gw = gateway(FixedClassifier(0.5, 0.5), FixedRegressor(187.4));
        assert_eq!(gw.predict_score(&innings()).unwrap().prediction, 187);
    }

    #[test]
    fn score_ties_round_to_even() {
        for (raw, expected) in [(186.5, 186), (187.5, 188), (0.5, 0)] {
            let gw = gateway(FixedClassifier(0.5, 0.5), FixedRegressor(raw));
            assert_eq!(gw.predict_score(&innings()).unwrap().prediction, expected, "{}", raw);
        }
    }

    #[test]
    fn percentage_ties_round_to_even() {
        let gw = gateway(FixedClassifier(0.875, 0.125), FixedRegressor(0.0));
        let p = gw.predict_match(&chase()).unwrap();
        assert_eq!(p.batting_win_pct, 12);
        assert_eq!(p.bowling_win_pct, 88);

        let gw = gateway(FixedClassifier(0.5, 0.5), FixedRegressor(0.0));
        let p = gw.predict_match(&chase()).unwrap();
        assert_eq!((p.batting_win_pct, p.bowling_win_pct), (50, 50));
    }

    #[test]
    fn non_finite_score_is_rejected() {
        let gw = gateway(FixedClassifier(0.5, 0.5), FixedRegressor(f64::INFINITY));
        assert!(gw.predict_score(&innings()).is_err());
    }
}
