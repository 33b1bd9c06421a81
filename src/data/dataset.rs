use std::ops::Range;

use log::debug;

use crate::data::cursor::DenseCursor;
use crate::data::row::{SparseRow, TrainingRow};
use crate::error::{Error, Result};

/// A batch of labeled rows sharing one feature space and one class set.
///
/// `target_dimension()` is `K-1`: the number of classes that carry their own
/// weight vector. The remaining class `K-1` is the reference class.
pub trait TrainingData {
    type Row: TrainingRow;

    fn row_count(&self) -> usize;

    /// `F`, the number of feature columns.
    fn feature_count(&self) -> usize;

    /// `K-1`, the number of non-reference classes.
    fn target_dimension(&self) -> usize;

    /// # Panics
    /// Panics if `idx >= row_count()`.
    fn row(&self, idx: usize) -> &Self::Row;

    fn class_count(&self) -> usize {
        self.target_dimension() + 1
    }

    fn iter(&self) -> impl Iterator<Item = &Self::Row> + '_ {
        (0..self.row_count()).map(move |i| self.row(i))
    }
}

// ---------------------------------------------------------------------------
// Owned dataset
// ---------------------------------------------------------------------------

/// In-memory dataset whose rows have been validated against its shape.
#[derive(Debug, Clone)]
pub struct Dataset<R> {
    rows: Vec<R>,
    n_features: usize,
    n_classes: usize,
}

impl<R: TrainingRow> Dataset<R> {
    /// Validates `rows` against `n_features` columns and `n_classes` classes.
    ///
    /// Every category must be below `n_classes`, every feature index below
    /// `n_features`, indices strictly increasing and values finite.
    pub fn new(rows: Vec<R>, n_features: usize, n_classes: usize) -> Result<Dataset<R>> {
        if n_classes < 2 {
            return Err(Error::TooFewClasses(n_classes));
        }
        for (i, row) in rows.iter().enumerate() {
            validate_row(i, row, n_features, n_classes)?;
        }
        debug!(
            "dataset: {} rows, {} features, {} classes",
            rows.len(),
            n_features,
            n_classes
        );
        Ok(Dataset { rows, n_features, n_classes })
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// View over the rows in `range`.
    pub fn range(&self, range: Range<usize>) -> RowRange<'_, Self> {
        RowRange::new(self, range)
    }

    /// Splits the dataset into `parts` contiguous views of near-equal size.
    ///
    /// # Panics
    /// Panics if `parts == 0`.
    pub fn partition(&self, parts: usize) -> Vec<RowRange<'_, Self>> {
        partition_ranges(self.rows.len(), parts)
            .into_iter()
            .map(|r| self.range(r))
            .collect()
    }
}

impl<R: TrainingRow> TrainingData for Dataset<R> {
    type Row = R;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn feature_count(&self) -> usize {
        self.n_features
    }

    fn target_dimension(&self) -> usize {
        self.n_classes - 1
    }

    fn row(&self, idx: usize) -> &R {
        &self.rows[idx]
    }
}

fn validate_row<R: TrainingRow>(
    row_idx: usize,
    row: &R,
    n_features: usize,
    n_classes: usize,
) -> Result<()> {
    row.check_storage(row_idx)?;

    let category = row.category();
    if category >= n_classes {
        return Err(Error::InvalidCategory { row: row_idx, category, n_classes });
    }

    let mut previous: Option<usize> = None;
    for (index, value) in row.features() {
        if index >= n_features {
            return Err(Error::FeatureOutOfRange { row: row_idx, index, n_features });
        }
        if let Some(prev) = previous {
            if index <= prev {
                return Err(Error::UnsortedFeatures { row: row_idx, previous: prev, index });
            }
        }
        if !value.is_finite() {
            return Err(Error::NonFiniteFeature { row: row_idx, index, value });
        }
        previous = Some(index);
    }
    Ok(())
}

/// Near-equal contiguous split of `0..len`; the first `len % parts` ranges
/// get one extra row.
pub(crate) fn partition_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    assert!(parts > 0, "cannot partition into zero parts");
    let base = len / parts;
    let extra = len % parts;
    let mut start = 0;
    (0..parts)
        .map(|p| {
            let size = base + usize::from(p < extra);
            let r = start..start + size;
            start += size;
            r
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Row ranges
// ---------------------------------------------------------------------------

/// Borrowed contiguous slice of another dataset's rows.
///
/// Hessians are additive over rows, so the Hessian of a dataset equals the
/// sum of the Hessians of any set of ranges covering it.
#[derive(Debug)]
pub struct RowRange<'a, D> {
    data: &'a D,
    start: usize,
    end: usize,
}

impl<'a, D: TrainingData> RowRange<'a, D> {
    /// # Panics
    /// Panics if `range` reaches past the end of `data`.
    pub fn new(data: &'a D, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= data.row_count(),
            "row range {:?} out of bounds for {} rows",
            range,
            data.row_count()
        );
        RowRange { data, start: range.start, end: range.end }
    }
}

impl<D> Clone for RowRange<'_, D> {
    fn clone(&self) -> Self {
        RowRange { data: self.data, start: self.start, end: self.end }
    }
}

impl<D: TrainingData> TrainingData for RowRange<'_, D> {
    type Row = D::Row;

    fn row_count(&self) -> usize {
        self.end - self.start
    }

    fn feature_count(&self) -> usize {
        self.data.feature_count()
    }

    fn target_dimension(&self) -> usize {
        self.data.target_dimension()
    }

    fn row(&self, idx: usize) -> &D::Row {
        assert!(idx < self.row_count(), "row {idx} out of range for {} rows", self.row_count());
        self.data.row(self.start + idx)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects rows into a validated sparse [`Dataset`].
///
/// With [`with_intercept`](DatasetBuilder::with_intercept) every row gets a
/// constant feature `0 = 1.0` and all given feature indices are shifted up by
/// one, so the built dataset has `n_features + 1` columns.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    n_features: usize,
    n_classes: usize,
    intercept: bool,
    rows: Vec<SparseRow>,
}

impl DatasetBuilder {
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        DatasetBuilder { n_features, n_classes, intercept: false, rows: Vec::new() }
    }

    pub fn with_intercept(mut self) -> Self {
        self.intercept = true;
        self
    }

    /// Adds a row given as `(index, value)` pairs in increasing index order.
    /// Zero values are dropped.
    pub fn push_sparse(&mut self, pairs: &[(usize, f64)], category: usize) -> &mut Self {
        let shift = usize::from(self.intercept);
        let mut shifted: Vec<(usize, f64)> = Vec::with_capacity(pairs.len() + shift);
        if self.intercept {
            shifted.push((0, 1.0));
        }
        shifted.extend(pairs.iter().map(|&(i, v)| (i + shift, v)));
        self.rows.push(SparseRow::from_pairs(&shifted, category));
        self
    }

    /// Adds a row given as one value per feature.
    pub fn push_dense(&mut self, values: &[f64], category: usize) -> &mut Self {
        let pairs: Vec<(usize, f64)> = DenseCursor::new(values).collect();
        self.push_sparse(&pairs, category)
    }

    pub fn build(self) -> Result<Dataset<SparseRow>> {
        let n_features = self.n_features + usize::from(self.intercept);
        Dataset::new(self.rows, n_features, self.n_classes)
    }
}
