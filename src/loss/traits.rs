use crate::data::dataset::TrainingData;
use crate::data::row::TrainingRow;
use crate::math::matrix::Matrix;
use crate::model::weights::WeightMatrix;

/// A twice-differentiable loss over linear class scores.
///
/// `evaluate` and `gradient` work on one row and its score vector and are
/// pure. `hessian` is the batch second derivative with respect to the
/// flattened weights (`c·F + f` order).
pub trait Loss<R: TrainingRow> {
    fn evaluate(&self, row: &R, scores: &[f64]) -> f64;

    /// Derivative of [`evaluate`](Loss::evaluate) with respect to each score.
    fn gradient(&self, row: &R, scores: &[f64]) -> Vec<f64>;

    fn hessian<D, W>(&self, data: &D, beta: &W) -> Matrix
    where
        D: TrainingData<Row = R>,
        W: WeightMatrix<R>;
}
