use crate::data::dataset::TrainingData;
use crate::data::row::TrainingRow;
use crate::loss::config::{HessianConfig, HessianStrategy};
use crate::loss::hessian::{assemble_parallel, assemble_sequential};
use crate::loss::traits::Loss;
use crate::math::log_sum_exp::{log_sum_exp, reference_probability, scores_to_probabilities};
use crate::math::matrix::Matrix;
use crate::model::weights::WeightMatrix;

/// Multinomial loss (softmax cross-entropy) with a reference class.
///
/// With `K` classes a row carries `K-1` scores; the last class, `K-1`, is the
/// reference class and always scores zero. For a row of category `y`:
///
/// ```text
/// loss = ln(1 + Σ_c exp(s_c)) - (y == K-1 ? 0 : s_y)
/// ```
///
/// The engine is stateless: every call allocates its own output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultinomialLoss;

impl MultinomialLoss {
    /// Probabilities of all `K` classes for a score vector; the reference
    /// class comes last.
    pub fn probabilities(&self, scores: &[f64]) -> Vec<f64> {
        let mut probs = scores.to_vec();
        let lse = scores_to_probabilities(&mut probs);
        probs.push(reference_probability(lse));
        probs
    }

    /// Batch Hessian using the strategy in `config`.
    ///
    /// # Panics
    /// Panics on the same contract violations as [`Loss::hessian`], and if
    /// `config` asks for zero rows per parallel task.
    pub fn hessian_with<R, D, W>(&self, data: &D, beta: &W, config: &HessianConfig) -> Matrix
    where
        R: TrainingRow,
        D: TrainingData<Row = R> + Sync,
        W: WeightMatrix<R> + Sync,
    {
        match config.strategy {
            HessianStrategy::Sequential => assemble_sequential(data, beta),
            HessianStrategy::Parallel { min_rows_per_task } => {
                assemble_parallel(data, beta, min_rows_per_task)
            }
        }
    }
}

impl<R: TrainingRow> Loss<R> for MultinomialLoss {
    /// # Panics
    /// Panics if the row's category is above `scores.len()` or a score is
    /// not finite.
    fn evaluate(&self, row: &R, scores: &[f64]) -> f64 {
        let lse = log_sum_exp(scores);
        let cat = check_category(row, scores.len());
        if cat == scores.len() {
            lse
        } else {
            lse - scores[cat]
        }
    }

    /// `p_i - 1` for the row's own class, `p_i` for every other
    /// non-reference class.
    ///
    /// # Panics
    /// Same as [`evaluate`](Loss::evaluate).
    fn gradient(&self, row: &R, scores: &[f64]) -> Vec<f64> {
        let cat = check_category(row, scores.len());
        let lse = log_sum_exp(scores);
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let p = (s - lse).exp();
                assert!(
                    (0.0..=1.0).contains(&p),
                    "class {i} has probability {p}"
                );
                if i == cat { p - 1.0 } else { p }
            })
            .collect()
    }

    /// Sequential batch Hessian; see [`crate::loss::hessian`].
    fn hessian<D, W>(&self, data: &D, beta: &W) -> Matrix
    where
        D: TrainingData<Row = R>,
        W: WeightMatrix<R>,
    {
        assemble_sequential(data, beta)
    }
}

#[inline]
fn check_category<R: TrainingRow>(row: &R, n_targets: usize) -> usize {
    let cat = row.category();
    assert!(
        cat <= n_targets,
        "category {cat} out of range for {} classes",
        n_targets + 1
    );
    cat
}
