//! Batch sums of the per-row loss and gradient.
//!
//! A Newton driver needs the loss and the gradient with respect to the
//! flattened weights alongside [`Loss::hessian`]; these helpers score every
//! row with the weight matrix and chain the per-score gradient through the
//! row's features.

use crate::data::dataset::TrainingData;
use crate::data::row::TrainingRow;
use crate::loss::traits::Loss;
use crate::model::weights::WeightMatrix;

/// Σ over rows of `loss.evaluate(row, beta.predict(row))`.
pub fn total_loss<R, L, D, W>(loss: &L, data: &D, beta: &W) -> f64
where
    R: TrainingRow,
    L: Loss<R>,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    data.iter()
        .map(|row| loss.evaluate(row, &scores(beta, row)))
        .sum()
}

/// [`total_loss`] divided by the row count; zero for an empty dataset.
pub fn mean_loss<R, L, D, W>(loss: &L, data: &D, beta: &W) -> f64
where
    R: TrainingRow,
    L: Loss<R>,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    let n = data.row_count();
    if n == 0 {
        return 0.0;
    }
    total_loss(loss, data, beta) / n as f64
}

/// Gradient of [`total_loss`] with respect to the weights, flattened in
/// Hessian order: entry `c·F + f` is `Σ_rows gradient(row)[c] · x_f`.
///
/// # Panics
/// Panics if a row has a feature index `>= F` or `predict` returns the wrong
/// number of scores.
pub fn weight_gradient<R, L, D, W>(loss: &L, data: &D, beta: &W) -> Vec<f64>
where
    R: TrainingRow,
    L: Loss<R>,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    let n_targets = data.target_dimension();
    let n_features = data.feature_count();
    let mut out = vec![0.0; n_targets * n_features];

    for row in data.iter() {
        let g = loss.gradient(row, &scores(beta, row));
        for (idx, value) in row.features() {
            assert!(idx < n_features, "feature index {idx} out of range for {n_features} features");
            for (c, gc) in g.iter().enumerate() {
                out[c * n_features + idx] += gc * value;
            }
        }
    }
    out
}

fn scores<R: TrainingRow, W: WeightMatrix<R>>(beta: &W, row: &R) -> Vec<f64> {
    let s = beta.predict(row);
    assert_eq!(
        s.len(),
        beta.target_dimension(),
        "predict returned {} scores, expected {}",
        s.len(),
        beta.target_dimension()
    );
    s
}
