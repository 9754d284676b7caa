//! Form decoding and boundary validation.
//!
//! Everything arrives as optional strings so a missing or malformed field
//! can be reported by name as a `ValidationError` instead of a generic
//! extractor rejection.

use serde::Deserialize;

use crate::cricket::teams::UnknownName;
use crate::cricket::{InningsState, MatchState, Team, Venue};
use crate::error::AppError;

const MAX_OVERS: f64 = 50.0;

/// `POST /predict` body.
#[derive(Debug, Default, Deserialize)]
pub struct MatchForm {
    #[serde(alias = "battingTeam")]
    pub batting_team: Option<String>,
    #[serde(alias = "bowlingTeam")]
    pub bowling_team: Option<String>,
    #[serde(alias = "city")]
    pub venue: Option<String>,
    #[serde(alias = "target")]
    pub score: Option<String>,
    #[serde(alias = "currentScore")]
    pub current_score: Option<String>,
    #[serde(alias = "oversCompleted")]
    pub overs: Option<String>,
    #[serde(alias = "wicketsLost")]
    pub wickets: Option<String>,
}

impl MatchForm {
    pub fn validate(&self) -> Result<MatchState, AppError> {
        let (batting_team, bowling_team) = teams(&self.batting_team, &self.bowling_team)?;
        Ok(MatchState {
            batting_team,
            bowling_team,
            venue: venue("venue", &self.venue)?,
            target: count("score", &self.score)?,
            current_score: count("current_score", &self.current_score)?,
            overs_completed: overs("overs", &self.overs)?,
            wickets_lost: count("wickets", &self.wickets)?,
        })
    }
}

/// `POST /score_prediction` body.
#[derive(Debug, Default, Deserialize)]
pub struct ScoreForm {
    #[serde(alias = "battingTeam")]
    pub batting_team: Option<String>,
    #[serde(alias = "bowlingTeam")]
    pub bowling_team: Option<String>,
    #[serde(alias = "currentScore")]
    pub current_score: Option<String>,
    #[serde(alias = "runsLast5")]
    pub last_five: Option<String>,
    #[serde(alias = "wicketsLost")]
    pub wickets: Option<String>,
    #[serde(alias = "wicketsLast5")]
    pub wickets_last_five: Option<String>,
    #[serde(alias = "oversCompleted")]
    pub overs: Option<String>,
    #[serde(alias = "venue")]
    pub city: Option<String>,
}

impl ScoreForm {
    pub fn validate(&self) -> Result<InningsState, AppError> {
        let (batting_team, bowling_team) = teams(&self.batting_team, &self.bowling_team)?;
        Ok(InningsState {
            batting_team,
            bowling_team,
            venue: venue("city", &self.city)?,
            current_score: count("current_score", &self.current_score)?,
            runs_last_5: count("last_five", &self.last_five)?,
            wickets_lost: count("wickets", &self.wickets)?,
            wickets_last_5: count("wickets_last_five", &self.wickets_last_five)?,
            overs_completed: overs("overs", &self.overs)?,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(field, "missing")),
    }
}

fn team(field: &'static str, value: &Option<String>) -> Result<Team, AppError> {
    required(field, value)?
        .parse()
        .map_err(|UnknownName(name)| {
            AppError::validation(field, format!("unknown team '{}'", name))
        })
}

fn teams(batting: &Option<String>, bowling: &Option<String>) -> Result<(Team, Team), AppError> {
    let batting = team("batting_team", batting)?;
    let bowling = team("bowling_team", bowling)?;
    if batting == bowling {
        return Err(AppError::validation(
            "bowling_team",
            "must differ from batting_team",
        ));
    }
    Ok((batting, bowling))
}

fn venue(field: &'static str, value: &Option<String>) -> Result<Venue, AppError> {
    required(field, value)?
        .parse()
        .map_err(|UnknownName(name)| {
            AppError::validation(field, format!("unknown venue '{}'", name))
        })
}

fn count(field: &'static str, value: &Option<String>) -> Result<u32, AppError> {
    let raw = required(field, value)?;
    raw.parse().map_err(|_| {
        AppError::validation(
            field,
            format!("expected a non-negative whole number, got '{}'", raw),
        )
    })
}

fn overs(field: &'static str, value: &Option<String>) -> Result<f64, AppError> {
    let raw = required(field, value)?;
    let overs: f64 = raw
        .parse()
        .map_err(|_| AppError::validation(field, format!("expected a number, got '{}'", raw)))?;
    if !overs.is_finite() || !(0.0..=MAX_OVERS).contains(&overs) {
        return Err(AppError::validation(
            field,
            format!("must be between 0 and {}, got '{}'", MAX_OVERS, raw),
        ));
    }
    Ok(overs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn match_form() -> MatchForm {
        MatchForm {
            batting_team: some("India"),
            bowling_team: some("South Africa"),
            venue: some("Kolkata"),
            score: some("180"),
            current_score: some("90"),
            overs: some("10.0"),
            wickets: some("2"),
        }
    }

    fn field_of(err: AppError) -> &'static str {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_match_form() {
        let state = match_form().validate().unwrap();
        assert_eq!(state.batting_team, Team::India);
        assert_eq!(state.bowling_team, Team::SouthAfrica);
        assert_eq!(state.venue.name(), "Kolkata");
        assert_eq!(state.target, 180);
        assert_eq!(state.overs_completed, 10.0);
    }

    #[test]
    fn missing_field_is_named() {
        let form = MatchForm {
            overs: None,
            ..match_form()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "overs");

        let form = MatchForm {
            score: some("   "),
            ..match_form()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "score");
    }

    #[test]
    fn unknown_team_and_venue_rejected() {
        let form = MatchForm {
            batting_team: some("Scotland"),
            ..match_form()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "batting_team");

        let form = MatchForm {
            venue: some("Atlantis"),
            ..match_form()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "venue");
    }

    #[test]
    fn same_team_twice_rejected() {
        let form = MatchForm {
            bowling_team: some("India"),
            ..match_form()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "bowling_team");
    }

    #[test]
    fn bad_numbers_rejected() {
        for (score, overs) in [("-5", "10"), ("12.5", "10"), ("abc", "10")] {
            let form = MatchForm {
                score: some(score),
                overs: some(overs),
                ..match_form()
            };
            assert_eq!(field_of(form.validate().unwrap_err()), "score");
        }
        for overs in ["NaN", "inf", "-1", "50.5", "ten"] {
            let form = MatchForm {
                overs: some(overs),
                ..match_form()
            };
            assert_eq!(field_of(form.validate().unwrap_err()), "overs", "{}", overs);
        }
    }

    #[test]
    fn too_many_wickets_pass_through() {
        let form = MatchForm {
            wickets: some("11"),
            ..match_form()
        };
        assert_eq!(form.validate().unwrap().wickets_lost, 11);
    }

    #[test]
    fn valid_score_form() {
        let form = ScoreForm {
            batting_team: some("New Zealand"),
            bowling_team: some("Netherlands"),
            current_score: some("143"),
            last_five: some("38"),
            wickets: some("4"),
            wickets_last_five: some("1"),
            overs: some("28.3"),
            city: some("Hyderabad"),
        };
        let state = form.validate().unwrap();
        assert_eq!(state.batting_team, Team::NewZealand);
        assert_eq!(state.runs_last_5, 38);
        assert_eq!(state.wickets_last_5, 1);
        assert_eq!(state.venue.name(), "Hyderabad");
    }

    #[test]
    fn score_form_missing_city() {
        let form = ScoreForm {
            batting_team: some("India"),
            bowling_team: some("Pakistan"),
            current_score: some("10"),
            last_five: some("10"),
            wickets: some("0"),
            wickets_last_five: some("0"),
            overs: some("2"),
            city: None,
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "city");
    }
}
