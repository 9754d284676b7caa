use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod cricket;
mod error;
mod predict;
mod stats;
mod web;

use config::Config;
use predict::{LinearPipeline, Link, PredictionGateway};
use stats::StatsStore;
use web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Models and tables are loaded once here and only read afterwards.
    let win_model = load_model(&config.match_model_path, Link::Logistic)?;
    let score_model = load_model(&config.score_model_path, Link::Identity)?;

    let stats = StatsStore::open(Path::new(&config.stats_db_path))?;
    info!(
        "Stats loaded from {}: {} batting rows, {} bowling rows",
        config.stats_db_path,
        stats.batting.len(),
        stats.bowling.len()
    );

    if stats.batting.is_empty() || stats.bowling.is_empty() {
        warn!("A stats table is empty; the matching API will always return []");
    }

    let images_dir = PathBuf::from(&config.images_dir);
    if !images_dir.is_dir() {
        warn!("Images directory {} not found; /images will 404", images_dir.display());
    }

    let state = AppState {
        gateway: PredictionGateway::new(Arc::new(win_model), Arc::new(score_model)),
        stats,
        images_dir,
    };
    let app = web::router(state);

    let addr = config.socket_addr()?;
    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_model(path: &str, link: Link) -> Result<LinearPipeline> {
    let model = LinearPipeline::load(Path::new(path), link)?;
    match model.trained_at {
        Some(ts) => info!(
            "Model {} loaded ({:?}, {} columns, trained {})",
            path,
            link,
            model.column_count(),
            ts
        ),
        None => info!(
            "Model {} loaded ({:?}, {} columns)",
            path,
            link,
            model.column_count()
        ),
    }
    Ok(model)
}
