/// Lower bound of the shift used to stabilize [`log_sum_exp`].
///
/// Flooring at 1.0 instead of 0.0 keeps the reference term `exp(-shift)`
/// strictly below one. Changing it changes the last bits of every loss,
/// gradient and Hessian value, so it is kept fixed.
pub const SHIFT_FLOOR: f64 = 1.0;

/// Computes `ln(1 + Σ exp(scores[c]))`.
///
/// The `1` is the reference class, whose score is fixed at zero and never
/// stored. Evaluated as `ln(exp(-m) + Σ exp(scores[c] - m)) + m` with
/// `m = max(SHIFT_FLOOR, max(scores))`, so it neither overflows for huge
/// scores nor underflows to `ln(0)` when every score is very negative.
///
/// # Panics
/// Panics if the result is not finite (a NaN or infinite score).
#[inline]
pub fn log_sum_exp(scores: &[f64]) -> f64 {
    let shift = scores.iter().copied().fold(SHIFT_FLOOR, f64::max);

    // reference class: exp(0 - shift)
    let mut sum = (-shift).exp();
    for &s in scores {
        sum += (s - shift).exp();
    }

    let lse = sum.ln() + shift;
    assert!(lse.is_finite(), "log-sum-exp is not finite for scores {scores:?}");
    lse
}

/// Replaces the scores by the softmax probabilities of the non-reference
/// classes, in place. Returns the log-sum-exp that was used; the reference
/// class probability is `exp(-lse)`.
#[inline]
pub fn scores_to_probabilities(scores: &mut [f64]) -> f64 {
    let lse = log_sum_exp(scores);
    for s in scores.iter_mut() {
        *s = (*s - lse).exp();
    }
    lse
}

/// Probability of the reference class for a given log-sum-exp.
#[inline]
pub fn reference_probability(lse: f64) -> f64 {
    (-lse).exp()
}
