mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use test_log::test;

use ferrite_mnl::loss::hessian::{assemble_parallel, assemble_sequential};
use ferrite_mnl::loss::weight_gradient;
use ferrite_mnl::{
    DatasetBuilder, HessianConfig, LinearWeights, Loss, Matrix, MultinomialLoss, TrainingData,
};

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn two_classes_one_feature() {
    let mut builder = DatasetBuilder::new(1, 2);
    builder.push_dense(&[1.0], 0);
    let data = builder.build().unwrap();
    let beta = LinearWeights::zeros(1, 1);

    let h = MultinomialLoss.hessian(&data, &beta);
    assert_eq!((h.rows, h.cols), (1, 1));
    // p = 0.5 → p(1-p) = 0.25
    assert_abs_diff_eq!(h.data[0][0], 0.25, epsilon = 1e-12);
}

#[test]
fn three_classes_hand_computed() {
    // one row, one feature of value 2, weights giving scores [2, -1]
    let mut builder = DatasetBuilder::new(1, 3);
    builder.push_dense(&[2.0], 1);
    let data = builder.build().unwrap();
    let beta = LinearWeights::from_flat(&[1.0, -0.5], 2, 1).unwrap();

    let denom = 1.0 + 2f64.exp() + (-1f64).exp();
    let p0 = 2f64.exp() / denom;
    let p1 = (-1f64).exp() / denom;

    let h = MultinomialLoss.hessian(&data, &beta);
    assert_relative_eq!(h.data[0][0], 4.0 * p0 * (1.0 - p0), max_relative = 1e-12);
    assert_relative_eq!(h.data[1][1], 4.0 * p1 * (1.0 - p1), max_relative = 1e-12);
    assert_relative_eq!(h.data[0][1], -4.0 * p0 * p1, max_relative = 1e-12);
    assert_eq!(h.data[0][1], h.data[1][0]);
}

// =============================================================================
// Structural properties
// =============================================================================

#[test]
fn matches_finite_difference_of_gradient() {
    let data = common::random_sparse(12, 4, 3, 0.7, 11);
    let beta = LinearWeights::uniform(2, 4, 0.5, 5);
    let h = MultinomialLoss.hessian(&data, &beta);

    let w = beta.flatten();
    let eps = 1e-5;
    for j in 0..w.len() {
        let mut plus = w.clone();
        let mut minus = w.clone();
        plus[j] += eps;
        minus[j] -= eps;
        let g_plus = weight_gradient(&MultinomialLoss, &data, &LinearWeights::from_flat(&plus, 2, 4).unwrap());
        let g_minus = weight_gradient(&MultinomialLoss, &data, &LinearWeights::from_flat(&minus, 2, 4).unwrap());
        for i in 0..w.len() {
            let fd = (g_plus[i] - g_minus[i]) / (2.0 * eps);
            assert_abs_diff_eq!(h.data[i][j], fd, epsilon = 1e-6);
        }
    }
}

#[test]
fn seeded_generator_is_reproducible() {
    let a = common::random_sparse(25, 8, 3, 0.5, 42);
    let b = common::random_sparse(25, 8, 3, 0.5, 42);
    assert_eq!(a.rows(), b.rows());
    assert_eq!(a.row_count(), 25);
    let stored: usize = a.rows().iter().map(|r| r.indices.len()).sum();
    assert!(stored > 0 && stored < 25 * 8);

    let empty = common::random_sparse(4, 3, 2, 0.0, 1);
    assert!(empty.rows().iter().all(|r| r.indices.is_empty()));
}

#[test]
fn exactly_symmetric() {
    let data = common::random_sparse(40, 6, 4, 0.5, 3);
    let beta = LinearWeights::uniform(3, 6, 1.0, 9);
    let h = MultinomialLoss.hessian(&data, &beta);
    assert!(h.is_symmetric());
    assert_eq!(h, h.transpose());
}

#[test]
fn additive_over_partitions() {
    let data = common::random_sparse(37, 5, 3, 0.6, 21);
    let beta = LinearWeights::uniform(2, 5, 0.8, 1);
    let full = MultinomialLoss.hessian(&data, &beta);

    for parts in [1, 2, 5, 37, 50] {
        let summed = data
            .partition(parts)
            .iter()
            .map(|range| MultinomialLoss.hessian(range, &beta))
            .fold(Matrix::zeros(full.rows, full.cols), |acc, h| acc + h);
        assert!(full.max_abs_diff(&summed) < 1e-10, "{parts} parts");
        assert!(summed.is_symmetric());
    }
}

#[test]
fn parallel_matches_sequential() {
    let data = common::random_sparse(200, 6, 4, 0.4, 8);
    let beta = LinearWeights::uniform(3, 6, 0.7, 2);
    let sequential = assemble_sequential(&data, &beta);

    for min_rows in [1, 7, 64, 1000] {
        let parallel = assemble_parallel(&data, &beta, min_rows);
        assert!(parallel.is_symmetric());
        assert!(sequential.max_abs_diff(&parallel) < 1e-10, "min_rows_per_task = {min_rows}");
    }

    let configured = MultinomialLoss.hessian_with(&data, &beta, &HessianConfig::parallel(25));
    assert!(sequential.max_abs_diff(&configured) < 1e-10);
    assert_eq!(
        MultinomialLoss.hessian_with(&data, &beta, &HessianConfig::sequential()),
        sequential
    );
}

#[test]
fn dense_rows_match_sparse_rows() {
    let sparse = common::random_sparse(30, 5, 3, 0.5, 17);
    let dense = common::to_dense(&sparse, 5, 3);
    let beta = LinearWeights::uniform(2, 5, 1.0, 4);

    let h_sparse = MultinomialLoss.hessian(&sparse, &beta);
    let h_dense = MultinomialLoss.hessian(&dense, &beta);
    assert_eq!(h_sparse, h_dense);
}

#[test]
fn unused_features_have_empty_rows_and_columns() {
    let mut builder = DatasetBuilder::new(3, 3);
    builder.push_sparse(&[(0, 1.0), (2, -1.0)], 0).push_sparse(&[(2, 0.5)], 2);
    let data = builder.build().unwrap();
    let beta = LinearWeights::uniform(2, 3, 0.3, 6);
    let h = MultinomialLoss.hessian(&data, &beta);

    for class in 0..data.target_dimension() {
        let p = class * data.feature_count() + 1;
        assert!(h.data[p].iter().all(|&x| x == 0.0));
        assert!(h.data.iter().all(|row| row[p] == 0.0));
    }
}

#[test]
fn intercept_diagonal_is_sum_of_variances() {
    // with only the intercept column, H[c][c] = Σ_rows p_c (1 - p_c)
    let mut builder = DatasetBuilder::new(0, 2).with_intercept();
    for class in [0, 1, 1, 0, 1] {
        builder.push_sparse(&[], class);
    }
    let data = builder.build().unwrap();
    let beta = LinearWeights::from_flat(&[0.4], 1, 1).unwrap();

    let p = 1.0 / (1.0 + (-0.4f64).exp());
    let h = MultinomialLoss.hessian(&data, &beta);
    assert_relative_eq!(h.data[0][0], 5.0 * p * (1.0 - p), max_relative = 1e-12);
}
