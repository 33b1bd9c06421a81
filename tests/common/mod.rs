#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ferrite_mnl::{Dataset, DatasetBuilder, DenseRow, SparseRow};

/// Seeded sparse dataset: each feature is non-zero with probability
/// `density`, categories are uniform over all classes.
pub fn random_sparse(
    n_rows: usize,
    n_features: usize,
    n_classes: usize,
    density: f64,
    seed: u64,
) -> Dataset<SparseRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = DatasetBuilder::new(n_features, n_classes);
    for _ in 0..n_rows {
        let mut pairs: Vec<(usize, f64)> = Vec::new();
        for f in 0..n_features {
            if rng.gen_bool(density) {
                pairs.push((f, rng.gen_range(-2.0..2.0)));
            }
        }
        let category = rng.gen_range(0..n_classes);
        builder.push_sparse(&pairs, category);
    }
    builder.build().expect("generated rows are valid")
}

/// The same rows as `data`, stored densely.
pub fn to_dense(data: &Dataset<SparseRow>, n_features: usize, n_classes: usize) -> Dataset<DenseRow> {
    let rows = data
        .rows()
        .iter()
        .map(|row| {
            let mut values = vec![0.0; n_features];
            for (&i, &v) in row.indices.iter().zip(row.values.iter()) {
                values[i] = v;
            }
            DenseRow::new(values, row.category)
        })
        .collect();
    Dataset::new(rows, n_features, n_classes).expect("dense copy is valid")
}
