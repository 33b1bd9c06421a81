pub mod weights;

pub use weights::{LinearWeights, WeightMatrix};
