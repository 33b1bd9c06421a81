//! Property-based tests for the loss, gradient and Hessian.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use ferrite_mnl::loss::hessian::accumulate_row;
use ferrite_mnl::math::log_sum_exp::scores_to_probabilities;
use ferrite_mnl::{
    log_sum_exp, Dataset, DenseRow, LinearWeights, Loss, Matrix, MultinomialLoss, WeightMatrix,
};

// =============================================================================
// Strategies
// =============================================================================

/// Scores spanning ordinary and very large magnitudes.
fn arb_score() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -30.0f64..30.0,
        1 => -1e6f64..1e6,
        1 => Just(0.0),
    ]
}

fn arb_scores() -> impl Strategy<Value = Vec<f64>> {
    prop_vec(arb_score(), 0..6)
}

/// Scores plus a category in `[0, K-1]`, the last being the reference class.
fn arb_scored_row() -> impl Strategy<Value = (Vec<f64>, usize)> {
    arb_scores().prop_flat_map(|scores| {
        let n = scores.len();
        (Just(scores), 0..=n)
    })
}

fn arb_feature() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        2 => -3.0f64..3.0,
    ]
}

/// A small dense dataset and matching weights.
fn arb_problem() -> impl Strategy<Value = (Dataset<DenseRow>, LinearWeights)> {
    (2usize..5, 1usize..5).prop_flat_map(|(n_classes, n_features)| {
        let rows = prop_vec(
            (prop_vec(arb_feature(), n_features), 0..n_classes)
                .prop_map(|(values, category)| DenseRow::new(values, category)),
            0..8,
        );
        let weights = prop_vec(-2.0f64..2.0, (n_classes - 1) * n_features);
        (rows, weights).prop_map(move |(rows, weights)| {
            let data = Dataset::new(rows, n_features, n_classes).unwrap();
            let beta = LinearWeights::from_flat(&weights, n_classes - 1, n_features).unwrap();
            (data, beta)
        })
    })
}

fn row(category: usize) -> DenseRow {
    DenseRow::new(vec![1.0], category)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn log_sum_exp_is_finite_and_bounded(scores in arb_scores()) {
        let lse = log_sum_exp(&scores);
        prop_assert!(lse.is_finite());
        let max = scores.iter().copied().fold(0.0, f64::max);
        prop_assert!(lse >= max - 1e-12, "lse {} below max {}", lse, max);
    }

    #[test]
    fn probabilities_sum_to_one(scores in arb_scores()) {
        let probs = MultinomialLoss.probabilities(&scores);
        prop_assert_eq!(probs.len(), scores.len() + 1);
        prop_assert!(probs.iter().all(|&p| (0.0..=1.0 + 1e-12).contains(&p)));
        let total: f64 = probs.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total {}", total);
    }

    #[test]
    fn loss_is_non_negative((scores, category) in arb_scored_row()) {
        let loss = MultinomialLoss.evaluate(&row(category), &scores);
        prop_assert!(loss.is_finite());
        prop_assert!(loss >= -1e-12, "loss {}", loss);
    }

    #[test]
    fn gradient_is_bounded((scores, category) in arb_scored_row()) {
        let g = MultinomialLoss.gradient(&row(category), &scores);
        prop_assert_eq!(g.len(), scores.len());
        for (i, &gi) in g.iter().enumerate() {
            prop_assert!((-1.0..=1.0).contains(&gi));
            if i == category {
                prop_assert!(gi <= 0.0);
            } else {
                prop_assert!(gi >= 0.0);
            }
        }
    }

    #[test]
    fn hessian_is_exactly_symmetric((data, beta) in arb_problem()) {
        let h = MultinomialLoss.hessian(&data, &beta);
        prop_assert!(h.is_symmetric());
    }

    #[test]
    fn single_row_hessian_is_positive_semidefinite(
        (data, beta) in arb_problem(),
        direction in prop_vec(-1.0f64..1.0, 16),
    ) {
        let n_targets = WeightMatrix::<DenseRow>::target_dimension(&beta);
        let n_features = WeightMatrix::<DenseRow>::feature_count(&beta);
        let dim = n_targets * n_features;
        let v = &direction[..dim];

        for r in data.rows() {
            let mut probs = beta.predict(r);
            scores_to_probabilities(&mut probs);
            let mut h = Matrix::zeros(dim, dim);
            accumulate_row(&mut h, r, &probs, n_features);

            prop_assert!(h.quadratic_form(v) >= -1e-12);
            for c in 0..n_targets {
                let block = h.block(c, c, n_features);
                prop_assert!(block.quadratic_form(&v[..n_features]) >= -1e-12);
            }
        }
    }
}
