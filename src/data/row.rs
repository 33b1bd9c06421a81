use crate::data::cursor::{DenseCursor, FeatureCursor, SparseCursor};
use crate::error::{Error, Result};

/// One labeled training example.
///
/// The category is in `[0, K-1]`, where `K-1` is the reference class. The
/// features are only reachable through a [`FeatureCursor`], so rows are free
/// to store them sparse or dense.
pub trait TrainingRow {
    type Cursor<'a>: FeatureCursor
    where
        Self: 'a;

    fn category(&self) -> usize;

    /// Cursor over the non-zero features, in increasing index order.
    fn features(&self) -> Self::Cursor<'_>;

    /// Value of a single feature; zero when it is not stored.
    fn feature(&self, index: usize) -> f64;

    /// Number of features the cursor yields.
    fn nnz(&self) -> usize {
        self.features().count()
    }

    /// Checks storage invariants the cursor relies on. `row` is only used
    /// for error reporting.
    fn check_storage(&self, _row: usize) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sparse rows
// ---------------------------------------------------------------------------

/// Row stored as strictly increasing feature indices plus their values.
///
/// Constructing one directly does not validate anything; go through
/// [`Dataset::new`](crate::data::Dataset::new) or the
/// [`DatasetBuilder`](crate::data::DatasetBuilder) to get checked rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
    pub category: usize,
}

impl SparseRow {
    pub fn new(indices: Vec<usize>, values: Vec<f64>, category: usize) -> SparseRow {
        SparseRow { indices, values, category }
    }

    /// Builds a sparse row from `(index, value)` pairs, dropping zeros.
    /// Pairs are expected in increasing index order.
    pub fn from_pairs(pairs: &[(usize, f64)], category: usize) -> SparseRow {
        let (indices, values) = pairs.iter().copied().filter(|&(_, v)| v != 0.0).unzip();
        SparseRow { indices, values, category }
    }
}

impl TrainingRow for SparseRow {
    type Cursor<'a> = SparseCursor<'a>;

    fn category(&self) -> usize {
        self.category
    }

    fn features(&self) -> SparseCursor<'_> {
        SparseCursor::new(&self.indices, &self.values)
    }

    fn feature(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    fn check_storage(&self, row: usize) -> Result<()> {
        if self.indices.len() != self.values.len() {
            return Err(Error::LengthMismatch {
                row,
                indices: self.indices.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dense rows
// ---------------------------------------------------------------------------

/// Row holding one value per feature. Zeros are skipped by its cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRow {
    pub values: Vec<f64>,
    pub category: usize,
}

impl DenseRow {
    pub fn new(values: Vec<f64>, category: usize) -> DenseRow {
        DenseRow { values, category }
    }

    /// Converts to the equivalent sparse row.
    pub fn to_sparse(&self) -> SparseRow {
        let pairs: Vec<(usize, f64)> = self.features().collect();
        SparseRow::from_pairs(&pairs, self.category)
    }
}

impl TrainingRow for DenseRow {
    type Cursor<'a> = DenseCursor<'a>;

    fn category(&self) -> usize {
        self.category
    }

    fn features(&self) -> DenseCursor<'_> {
        DenseCursor::new(&self.values)
    }

    fn feature(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}
