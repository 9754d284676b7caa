pub mod gateway;
pub mod model;

pub use gateway::{MatchPrediction, PredictionGateway, ScorePrediction};
pub use model::{Link, LinearPipeline};
