use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::predict::{MatchPrediction, PredictionGateway, ScorePrediction};
use crate::stats::StatsStore;

pub mod forms;
pub mod pages;

use forms::{MatchForm, ScoreForm};

/// Everything a request needs. Built once at startup, never mutated.
pub struct AppState {
    pub gateway: PredictionGateway,
    pub stats: StatsStore,
    /// Directory served under `/images`
    pub images_dir: PathBuf,
}

/// Build the Axum router for the site and its JSON API.
pub fn router(state: AppState) -> Router {
    let images = ServeDir::new(&state.images_dir);
    Router::new()
        .route("/", get(home_handler))
        .route("/match_prediction", get(match_form_handler))
        .route("/predict", post(predict_handler))
        .route(
            "/score_prediction",
            get(score_form_handler).post(score_predict_handler),
        )
        .route("/stats", get(batting_page_handler))
        .route("/bowl", get(bowling_page_handler))
        .route("/api/player_stats", get(player_stats_handler))
        .route("/api/bowl_stats", get(bowl_stats_handler))
        .nest_service("/images", images)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn home_handler() -> Html<String> {
    Html(pages::home_page())
}

/// GET /match_prediction
async fn match_form_handler() -> Html<String> {
    Html(pages::match_form_page())
}

/// POST /predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<MatchForm>, FormRejection>,
) -> Response {
    match predict_match(&state, form) {
        Ok(prediction) => Html(pages::result_page(&prediction)).into_response(),
        Err(err) => html_error(err),
    }
}

fn predict_match(
    state: &AppState,
    form: Result<Form<MatchForm>, FormRejection>,
) -> Result<MatchPrediction, AppError> {
    let Form(form) = form.map_err(form_rejection)?;
    let match_state = form.validate().inspect_err(log_rejected)?;
    let prediction = state.gateway.predict_match(&match_state)?;
    debug!(
        "{} {}% – {} {}%",
        prediction.batting_team,
        prediction.batting_win_pct,
        prediction.bowling_team,
        prediction.bowling_win_pct
    );
    Ok(prediction)
}

/// GET /score_prediction
async fn score_form_handler() -> Html<String> {
    Html(pages::score_page(None))
}

/// POST /score_prediction
///
/// Answers with JSON when called from the page script
/// (`X-Requested-With: XMLHttpRequest`), otherwise re-renders the page.
async fn score_predict_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<ScoreForm>, FormRejection>,
) -> Response {
    let result = predict_score(&state, form);
    if is_async_fetch(&headers) {
        match result {
            Ok(prediction) => Json(prediction).into_response(),
            Err(err) => err.into_response(),
        }
    } else {
        match result {
            Ok(prediction) => Html(pages::score_page(Some(prediction.prediction))).into_response(),
            Err(err) => html_error(err),
        }
    }
}

fn predict_score(
    state: &AppState,
    form: Result<Form<ScoreForm>, FormRejection>,
) -> Result<ScorePrediction, AppError> {
    let Form(form) = form.map_err(form_rejection)?;
    let innings = form.validate().inspect_err(log_rejected)?;
    let prediction = state.gateway.predict_score(&innings)?;
    debug!("{} projected to {}", innings.batting_team, prediction.prediction);
    Ok(prediction)
}

fn is_async_fetch(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "XMLHttpRequest")
}

async fn batting_page_handler() -> Html<String> {
    Html(pages::batting_stats_page())
}

async fn bowling_page_handler() -> Html<String> {
    Html(pages::bowling_stats_page())
}

#[derive(Debug, Deserialize)]
struct TeamQuery {
    team: Option<String>,
}

impl TeamQuery {
    /// An empty `team` means no filter.
    fn team(&self) -> Option<&str> {
        self.team.as_deref().filter(|t| !t.is_empty())
    }
}

/// GET /api/player_stats?team=India
async fn player_stats_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamQuery>,
) -> Response {
    let rows = state.stats.batting.query(query.team());
    debug!("player_stats team={:?} → {} rows", query.team(), rows.len());
    Json(rows).into_response()
}

/// GET /api/bowl_stats?team=India
async fn bowl_stats_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamQuery>,
) -> Response {
    let rows = state.stats.bowling.query(query.team());
    debug!("bowl_stats team={:?} → {} rows", query.team(), rows.len());
    Json(rows).into_response()
}

fn form_rejection(rejection: FormRejection) -> AppError {
    let err = AppError::validation("form", rejection.body_text());
    log_rejected(&err);
    err
}

fn log_rejected(err: &AppError) {
    warn!("Rejected request: {}", err);
}

fn html_error(err: AppError) -> Response {
    (err.status(), Html(pages::error_page(&err))).into_response()
}
