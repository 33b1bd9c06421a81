// Small driver for the library: scores a built-in three-class dataset at zero
// weights and prints loss, gradient and Hessian as JSON.
//
//   cargo run -- [hessian-config.json]
//
// For an actual Newton training loop see `cargo run --example newton`.
use std::process::ExitCode;

use log::error;
use serde::Serialize;

use ferrite_mnl::loss::{mean_loss, weight_gradient};
use ferrite_mnl::{DatasetBuilder, HessianConfig, LinearWeights, Matrix, MultinomialLoss, TrainingData};

#[derive(Serialize)]
struct Report {
    rows: usize,
    features: usize,
    classes: usize,
    mean_loss: f64,
    gradient: Vec<f64>,
    hessian: Matrix,
}

fn run() -> ferrite_mnl::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => HessianConfig::load_json(path)?,
        None => HessianConfig::default(),
    };

    let mut builder = DatasetBuilder::new(2, 3).with_intercept();
    builder
        .push_dense(&[1.0, 0.0], 0)
        .push_dense(&[0.9, 0.2], 0)
        .push_dense(&[0.0, 1.0], 1)
        .push_dense(&[0.1, 1.1], 1)
        .push_dense(&[-1.0, -1.0], 2)
        .push_dense(&[-0.8, -1.2], 2);
    let data = builder.build()?;

    let beta = LinearWeights::zeros(data.target_dimension(), data.feature_count());
    let loss = MultinomialLoss;

    let report = Report {
        rows: data.row_count(),
        features: data.feature_count(),
        classes: data.class_count(),
        mean_loss: mean_loss(&loss, &data, &beta),
        gradient: weight_gradient(&loss, &data, &beta),
        hessian: loss.hessian_with(&data, &beta, &config),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
