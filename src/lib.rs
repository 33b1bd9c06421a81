pub mod error;
pub mod math;
pub mod data;
pub mod model;
pub mod loss;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use math::log_sum_exp::log_sum_exp;
pub use data::{Dataset, DatasetBuilder, DenseRow, FeatureCursor, SparseRow, TrainingData, TrainingRow};
pub use model::weights::{LinearWeights, WeightMatrix};
pub use loss::{HessianConfig, HessianStrategy, Loss, MultinomialLoss};
