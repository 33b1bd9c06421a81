use crate::data::row::TrainingRow;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Maps a row to its `K-1` linear class scores.
///
/// The reference class always scores zero and is not part of the output.
pub trait WeightMatrix<R: TrainingRow> {
    /// `K-1`.
    fn target_dimension(&self) -> usize;

    /// `F`.
    fn feature_count(&self) -> usize;

    /// Score vector of length `target_dimension()`.
    fn predict(&self, row: &R) -> Vec<f64>;
}

/// Dense `(K-1) × F` coefficient table.
///
/// Flattened parameter `c·F + f` is coefficient `(c, f)`, the same order the
/// Hessian rows and columns use.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearWeights {
    coefficients: Matrix,
}

impl LinearWeights {
    pub fn zeros(target_dimension: usize, n_features: usize) -> LinearWeights {
        LinearWeights { coefficients: Matrix::zeros(target_dimension, n_features) }
    }

    /// Seeded uniform initialization in `[-scale, scale)`.
    pub fn uniform(target_dimension: usize, n_features: usize, scale: f64, seed: u64) -> LinearWeights {
        LinearWeights { coefficients: Matrix::uniform(target_dimension, n_features, scale, seed) }
    }

    /// Wraps an existing coefficient table after checking its shape and that
    /// every coefficient is finite.
    pub fn from_matrix(
        coefficients: Matrix,
        target_dimension: usize,
        n_features: usize,
    ) -> Result<LinearWeights> {
        if coefficients.rows != target_dimension || coefficients.cols != n_features {
            return Err(Error::WeightShape {
                rows: coefficients.rows,
                cols: coefficients.cols,
                expected_rows: target_dimension,
                expected_cols: n_features,
            });
        }
        for (class, row) in coefficients.data.iter().enumerate() {
            if let Some((feature, &value)) = row.iter().enumerate().find(|(_, w)| !w.is_finite()) {
                return Err(Error::NonFiniteWeight { class, feature, value });
            }
        }
        Ok(LinearWeights { coefficients })
    }

    /// Builds weights from a flat parameter vector in Hessian order.
    pub fn from_flat(flat: &[f64], target_dimension: usize, n_features: usize) -> Result<LinearWeights> {
        if flat.len() != target_dimension * n_features {
            return Err(Error::WeightShape {
                rows: flat.len(),
                cols: 1,
                expected_rows: target_dimension * n_features,
                expected_cols: 1,
            });
        }
        let data = if n_features == 0 {
            vec![Vec::new(); target_dimension]
        } else {
            flat.chunks(n_features).map(<[f64]>::to_vec).collect()
        };
        LinearWeights::from_matrix(
            Matrix { rows: target_dimension, cols: n_features, data },
            target_dimension,
            n_features,
        )
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.coefficients
    }

    pub fn get(&self, class: usize, feature: usize) -> f64 {
        self.coefficients.data[class][feature]
    }

    pub fn set(&mut self, class: usize, feature: usize, value: f64) {
        self.coefficients.data[class][feature] = value;
    }

    /// Flattens the coefficients in Hessian order.
    pub fn flatten(&self) -> Vec<f64> {
        self.coefficients.data.iter().flatten().copied().collect()
    }

    /// `w ← w + step · delta`, with `delta` in Hessian order. This is the
    /// update a Newton driver applies after solving `H·delta = -g`.
    ///
    /// # Panics
    /// Panics if `delta` does not have `(K-1)·F` entries.
    pub fn add_scaled(&mut self, delta: &[f64], step: f64) {
        let n_features = self.coefficients.cols;
        assert_eq!(
            delta.len(),
            self.coefficients.rows * n_features,
            "delta length does not match the number of parameters"
        );
        for (c, row) in self.coefficients.data.iter_mut().enumerate() {
            for (f, w) in row.iter_mut().enumerate() {
                *w += step * delta[c * n_features + f];
            }
        }
    }
}

impl<R: TrainingRow> WeightMatrix<R> for LinearWeights {
    fn target_dimension(&self) -> usize {
        self.coefficients.rows
    }

    fn feature_count(&self) -> usize {
        self.coefficients.cols
    }

    /// Sparse dot product of each class's coefficients with the row.
    ///
    /// # Panics
    /// Panics if the row has a feature index `>= F`.
    fn predict(&self, row: &R) -> Vec<f64> {
        let mut scores = vec![0.0; self.coefficients.rows];
        for (idx, value) in row.features() {
            assert!(
                idx < self.coefficients.cols,
                "feature index {idx} out of range for {} features",
                self.coefficients.cols
            );
            for (score, coefs) in scores.iter_mut().zip(self.coefficients.data.iter()) {
                *score += coefs[idx] * value;
            }
        }
        scores
    }
}
