pub mod weights;

pub use weights::{CriteriaWeights, ScoringDimension, ScoringWeights};
