use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

/// ODI match-prediction and player-statistics web service
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-oracle", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: String,

    /// Win-probability model artifact (JSON)
    #[arg(
        long,
        env = "MATCH_MODEL_PATH",
        default_value = "artifacts/match_model.json"
    )]
    pub match_model_path: String,

    /// Final-score model artifact (JSON)
    #[arg(
        long,
        env = "SCORE_MODEL_PATH",
        default_value = "artifacts/score_model.json"
    )]
    pub score_model_path: String,

    /// SQLite file holding the batting_stats and bowling_stats tables
    #[arg(long, env = "STATS_DB_PATH", default_value = "artifacts/player_stats.db")]
    pub stats_db_path: String,

    /// Directory served under /images
    #[arg(long, env = "IMAGES_DIR", default_value = "images")]
    pub images_dir: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("listen_addr '{}' is not a valid socket address", self.listen_addr);
        }
        for (name, path) in [
            ("match_model_path", &self.match_model_path),
            ("score_model_path", &self.score_model_path),
            ("stats_db_path", &self.stats_db_path),
        ] {
            if !Path::new(path).is_file() {
                anyhow::bail!("{} points to '{}', which is not a file", name, path);
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listen_addr.parse()?)
    }
}
