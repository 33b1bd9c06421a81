/// A finite, forward-only walk over the non-zero `(feature index, value)`
/// pairs of one row, in increasing index order.
///
/// Besides plain iteration a cursor can [`spawn`](FeatureCursor::spawn) an
/// independent cursor that starts at the feature it yielded last. Pairwise
/// traversal then looks like
///
/// ```text
/// while let Some((a, xa)) = outer.next() {
///     for (b, xb) in outer.spawn() { /* every unordered {a, b} once */ }
/// }
/// ```
///
/// and covers the diagonal `(a, a)` as well as each off-diagonal pair once.
pub trait FeatureCursor: Iterator<Item = (usize, f64)> {
    /// Returns a new cursor whose first item is the feature most recently
    /// yielded by `self`. If `self` has not yielded anything yet the new
    /// cursor starts where `self` starts. `self` is not advanced.
    fn spawn(&self) -> Self;
}

// ---------------------------------------------------------------------------
// Sparse
// ---------------------------------------------------------------------------

/// Cursor over parallel `indices` / `values` slices.
#[derive(Debug, Clone)]
pub struct SparseCursor<'a> {
    indices: &'a [usize],
    values: &'a [f64],
    /// Position of the next item to yield.
    pos: usize,
    /// Position of the last yielded item, if any.
    last: Option<usize>,
}

impl<'a> SparseCursor<'a> {
    pub fn new(indices: &'a [usize], values: &'a [f64]) -> Self {
        assert_eq!(indices.len(), values.len(), "indices and values must have equal length");
        SparseCursor { indices, values, pos: 0, last: None }
    }
}

impl Iterator for SparseCursor<'_> {
    type Item = (usize, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = (*self.indices.get(self.pos)?, self.values[self.pos]);
        self.last = Some(self.pos);
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.indices.len() - self.pos;
        (rest, Some(rest))
    }
}

impl FeatureCursor for SparseCursor<'_> {
    #[inline]
    fn spawn(&self) -> Self {
        SparseCursor {
            indices: self.indices,
            values: self.values,
            pos: self.last.unwrap_or(self.pos),
            last: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dense
// ---------------------------------------------------------------------------

/// Cursor over a dense value slice that skips exact zeros.
#[derive(Debug, Clone)]
pub struct DenseCursor<'a> {
    values: &'a [f64],
    pos: usize,
    /// Index of the last yielded feature, if any.
    last: Option<usize>,
}

impl<'a> DenseCursor<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        DenseCursor { values, pos: 0, last: None }
    }
}

impl Iterator for DenseCursor<'_> {
    type Item = (usize, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.values.len() {
            let idx = self.pos;
            self.pos += 1;
            let value = self.values[idx];
            if value != 0.0 {
                self.last = Some(idx);
                return Some((idx, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.values.len() - self.pos))
    }
}

impl FeatureCursor for DenseCursor<'_> {
    #[inline]
    fn spawn(&self) -> Self {
        DenseCursor {
            values: self.values,
            pos: self.last.unwrap_or(self.pos),
            last: None,
        }
    }
}
