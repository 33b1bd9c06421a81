//! Batch Hessian assembly for the multinomial loss.
//!
//! Parameters are ordered `c·F + f` (class-major), so the Hessian is a
//! `(K-1) × (K-1)` grid of `F × F` blocks. For one row with non-reference
//! class probabilities `p` and features `x`, block `(c, d)` is
//!
//! ```text
//! H[c·F + a][d·F + b] += x_a · x_b · (c == d ? p_c·(1 - p_c) : -p_c·p_d)
//! ```
//!
//! Every cell is written together with its mirror images, so the result is
//! symmetric bit for bit and not just up to rounding.

use std::ops::Range;
use std::time::Instant;

use log::{debug, trace};
use rayon::prelude::*;

use crate::data::cursor::FeatureCursor;
use crate::data::dataset::{partition_ranges, TrainingData};
use crate::data::row::TrainingRow;
use crate::math::log_sum_exp::scores_to_probabilities;
use crate::math::matrix::Matrix;
use crate::model::weights::WeightMatrix;

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Single-threaded assembly over every row of `data`.
///
/// # Panics
/// Panics if the dimensions of `data` and `beta` disagree, if `predict`
/// returns the wrong number of scores, or if a row has a feature index `>= F`.
pub fn assemble_sequential<R, D, W>(data: &D, beta: &W) -> Matrix
where
    R: TrainingRow,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    let (n_targets, n_features) = check_dimensions(data, beta);
    let dim = n_targets * n_features;
    let started = Instant::now();
    debug!(
        "hessian: sequential over {} rows, {dim}x{dim} matrix",
        data.row_count()
    );

    let hessian = accumulate_range(data, beta, 0..data.row_count(), n_targets, n_features);

    debug!("hessian: done in {:?}", started.elapsed());
    hessian
}

/// Multi-threaded assembly.
///
/// Rows are split into contiguous ranges of at least `min_rows_per_task`
/// rows (at most one range per rayon worker). Each task accumulates into its
/// own matrix; the partial matrices are summed at the end. The result equals
/// [`assemble_sequential`] up to floating-point summation order and is still
/// exactly symmetric.
///
/// # Panics
/// Same conditions as [`assemble_sequential`], and `min_rows_per_task == 0`.
pub fn assemble_parallel<R, D, W>(data: &D, beta: &W, min_rows_per_task: usize) -> Matrix
where
    R: TrainingRow,
    D: TrainingData<Row = R> + Sync,
    W: WeightMatrix<R> + Sync,
{
    assert!(min_rows_per_task > 0, "min_rows_per_task must be at least 1");
    let (n_targets, n_features) = check_dimensions(data, beta);
    let dim = n_targets * n_features;
    let n_rows = data.row_count();
    let n_tasks = n_rows
        .div_ceil(min_rows_per_task)
        .clamp(1, rayon::current_num_threads().max(1));
    let started = Instant::now();
    debug!("hessian: parallel over {n_rows} rows in {n_tasks} tasks, {dim}x{dim} matrix");

    let hessian = partition_ranges(n_rows, n_tasks)
        .into_par_iter()
        .map(|range| {
            trace!("hessian: task over rows {range:?}");
            accumulate_range(data, beta, range, n_targets, n_features)
        })
        .reduce_with(|mut acc, partial| {
            acc += &partial;
            acc
        })
        .unwrap_or_else(|| Matrix::zeros(dim, dim));

    debug!("hessian: done in {:?}", started.elapsed());
    hessian
}

// ---------------------------------------------------------------------------
// Row accumulation
// ---------------------------------------------------------------------------

/// Returns `(K-1, F)` after checking that `data` and `beta` agree on both.
fn check_dimensions<R, D, W>(data: &D, beta: &W) -> (usize, usize)
where
    R: TrainingRow,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    assert_eq!(
        beta.target_dimension(),
        data.target_dimension(),
        "weight matrix has {} class vectors but the data has {} non-reference classes",
        beta.target_dimension(),
        data.target_dimension()
    );
    assert_eq!(
        beta.feature_count(),
        data.feature_count(),
        "weight matrix has {} features but the data has {}",
        beta.feature_count(),
        data.feature_count()
    );
    (data.target_dimension(), data.feature_count())
}

fn accumulate_range<R, D, W>(
    data: &D,
    beta: &W,
    rows: Range<usize>,
    n_targets: usize,
    n_features: usize,
) -> Matrix
where
    R: TrainingRow,
    D: TrainingData<Row = R>,
    W: WeightMatrix<R>,
{
    let dim = n_targets * n_features;
    let mut hessian = Matrix::zeros(dim, dim);
    for i in rows {
        let row = data.row(i);
        let mut probabilities = beta.predict(row);
        assert_eq!(
            probabilities.len(),
            n_targets,
            "predict returned {} scores, expected {n_targets}",
            probabilities.len()
        );
        scores_to_probabilities(&mut probabilities);
        accumulate_row(&mut hessian, row, &probabilities, n_features);
    }
    hessian
}

/// Adds one row's contribution to `hessian`.
///
/// `probabilities` are the `K-1` non-reference class probabilities of the
/// row. The outer cursor walks the row's features; the inner cursor is
/// spawned at the outer position, so every unordered feature pair `{a, b}`
/// (including `a == b`) and every class pair `c <= d` is visited once.
pub fn accumulate_row<R: TrainingRow>(
    hessian: &mut Matrix,
    row: &R,
    probabilities: &[f64],
    n_features: usize,
) {
    let n_targets = probabilities.len();
    let dim = n_targets * n_features;
    assert!(
        hessian.rows == dim && hessian.cols == dim,
        "hessian is {}x{}, expected {dim}x{dim}",
        hessian.rows,
        hessian.cols
    );
    for (idx, _) in row.features() {
        assert!(idx < n_features, "feature index {idx} out of range for {n_features} features");
    }

    let h = &mut hessian.data;
    let mut outer = row.features();
    while let Some((outer_idx, outer_val)) = outer.next() {
        for (inner_idx, inner_val) in outer.spawn() {
            let x = outer_val * inner_val;
            for outer_cat in 0..n_targets {
                let oc = outer_cat * n_features;
                let p_outer = probabilities[outer_cat];
                for inner_cat in outer_cat..n_targets {
                    let ic = inner_cat * n_features;
                    let class_factor = if outer_cat == inner_cat {
                        p_outer * (1.0 - p_outer)
                    } else {
                        -p_outer * probabilities[inner_cat]
                    };
                    let value = h[oc + outer_idx][ic + inner_idx] + x * class_factor;
                    h[oc + outer_idx][ic + inner_idx] = value;
                    h[oc + inner_idx][ic + outer_idx] = value;
                    if outer_cat != inner_cat {
                        h[ic + inner_idx][oc + outer_idx] = value;
                        h[ic + outer_idx][oc + inner_idx] = value;
                    }
                }
            }
        }
    }
}
