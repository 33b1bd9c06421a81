pub mod traits;
pub mod multinomial;
pub mod hessian;
pub mod batch;
pub mod config;

pub use traits::Loss;
pub use multinomial::MultinomialLoss;
pub use batch::{mean_loss, total_loss, weight_gradient};
pub use config::{HessianConfig, HessianStrategy};
