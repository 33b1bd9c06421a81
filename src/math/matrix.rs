use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use std::ops::{Add, AddAssign};

/// Dense row-major matrix of `f64`.
///
/// Used both for the `(K-1) × F` coefficient table of a linear model and for
/// the `(K-1)·F` square Hessian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples every entry uniformly from `[-scale, scale)` with a seeded RNG,
    /// so two calls with the same seed produce the same matrix.
    pub fn uniform(rows: usize, cols: usize, scale: f64, seed: u64) -> Matrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut res = Matrix::zeros(rows, cols);

        if scale > 0.0 {
            for i in 0..rows {
                for j in 0..cols {
                    res.data[i][j] = rng.gen_range(-scale..scale);
                }
            }
        }

        res
    }

    /// Builds a matrix from nested rows.
    ///
    /// # Panics
    /// Panics if the rows are ragged.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, Vec::len);
        assert!(
            data.iter().all(|row| row.len() == cols),
            "all matrix rows must have {cols} columns"
        );
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        )
    }

    /// Exact symmetry check: `self[i][j] == self[j][i]` bit for bit.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        (0..self.rows).all(|i| (i + 1..self.cols).all(|j| self.data[i][j] == self.data[j][i]))
    }

    /// Largest absolute element-wise difference between two same-shape matrices.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols), "Matrices are of incorrect sizes");
        self.data.iter().zip(other.data.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max)
    }

    /// Copies out the `size × size` block at block coordinates
    /// (`block_row`, `block_col`).
    pub fn block(&self, block_row: usize, block_col: usize, size: usize) -> Matrix {
        let r0 = block_row * size;
        let c0 = block_col * size;
        assert!(r0 + size <= self.rows && c0 + size <= self.cols, "block out of range");
        Matrix::from_data(
            self.data[r0..r0 + size]
                .iter()
                .map(|row| row[c0..c0 + size].to_vec())
                .collect()
        )
    }

    /// Matrix-vector product `M·v`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "vector length does not match matrix columns");
        self.data.iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Quadratic form `vᵀ·M·v`.
    pub fn quadratic_form(&self, v: &[f64]) -> f64 {
        self.mul_vec(v).iter().zip(v).map(|(a, b)| a * b).sum()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}
