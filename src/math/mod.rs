pub mod matrix;
pub mod log_sum_exp;

pub use matrix::Matrix;
pub use log_sum_exp::{log_sum_exp, reference_probability, scores_to_probabilities};
