use ferrite_mnl::loss::{mean_loss, weight_gradient};
use ferrite_mnl::{
    DatasetBuilder, HessianConfig, LinearWeights, Matrix, MultinomialLoss, TrainingData,
    TrainingRow, WeightMatrix,
};

/// Ridge added to the Hessian diagonal so the Newton system stays solvable
/// on (nearly) separable data.
const RIDGE: f64 = 1e-3;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Three well-separated blobs in 2-D, plus an intercept column.
    let mut builder = DatasetBuilder::new(2, 3).with_intercept();
    let centers = [(2.0, 0.0), (-1.0, 1.7), (-1.0, -1.7)];
    for (class, &(cx, cy)) in centers.iter().enumerate() {
        for k in 0..20 {
            let angle = k as f64 * 0.7;
            let radius = 0.4 + 0.05 * (k % 5) as f64;
            builder.push_dense(&[cx + radius * angle.cos(), cy + radius * angle.sin()], class);
        }
    }
    let data = builder.build().expect("demo data is valid");

    let loss = MultinomialLoss;
    let config = HessianConfig::parallel(16);
    let mut beta = LinearWeights::zeros(data.target_dimension(), data.feature_count());

    println!("{:>4}  {:>12}  {:>12}", "Iter", "Mean loss", "|grad|");
    for iter in 0..15 {
        let current = mean_loss(&loss, &data, &beta);
        let grad = weight_gradient(&loss, &data, &beta);
        let grad_norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        println!("{iter:>4}  {current:>12.6}  {grad_norm:>12.3e}");
        if grad_norm < 1e-8 {
            break;
        }

        let mut hessian = loss.hessian_with(&data, &beta, &config);
        for i in 0..hessian.rows {
            hessian.data[i][i] += RIDGE;
        }
        let rhs: Vec<f64> = grad.iter().map(|g| -g).collect();
        let Some(delta) = solve(hessian, rhs) else {
            println!("Hessian is singular, stopping");
            break;
        };

        // Backtracking line search on the mean loss.
        let mut step = 1.0;
        loop {
            let mut candidate = beta.clone();
            candidate.add_scaled(&delta, step);
            if mean_loss(&loss, &data, &candidate) <= current || step < 1e-6 {
                beta = candidate;
                break;
            }
            step *= 0.5;
        }
    }

    let correct = data
        .iter()
        .filter(|row| {
            let probs = loss.probabilities(&beta.predict(*row));
            argmax(&probs) == row.category()
        })
        .count();
    println!("\nTraining accuracy: {}/{}", correct, data.row_count());
    println!("Final mean loss: {:.6}", mean_loss(&loss, &data, &beta));
}

/// Gaussian elimination with partial pivoting. Returns `None` when a pivot
/// vanishes.
fn solve(mut a: Matrix, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a.data[i][col].abs().total_cmp(&a.data[j][col].abs()))?;
        if a.data[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.data.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a.data[row][col] / a.data[col][col];
            for k in col..n {
                a.data[row][k] -= factor * a.data[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a.data[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a.data[row][row];
    }
    Some(x)
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
