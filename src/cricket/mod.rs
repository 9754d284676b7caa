pub mod features;
pub mod teams;

pub use features::{
    derive_features, match_record, score_record, DerivedFeatures, FeatureRecord, FeatureValue,
    InningsState, MatchState,
};
pub use teams::{Team, Venue};
