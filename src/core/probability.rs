//! Normal-distribution helpers for line markets.
//!
//! Round-total and player-prop models emit a (mu, sigma) distribution
//! rather than a direct win probability; these helpers turn that into
//! the probability of clearing a quoted line.

/// Standard normal CDF approximation (Abramowitz and Stegun).
pub fn normal_cdf(x: f64) -> f64 {
    // Constants for approximation
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Probability that a normally distributed total lands over `line`.
///
/// `sigma` must be positive; callers validate before reaching here.
/// The result is clamped to [0.01, 0.99] so a certainty claim from a
/// degenerate model never reaches the Kelly formula.
pub fn over_probability(mu: f64, sigma: f64, line: f64) -> f64 {
    let p = normal_cdf((mu - line) / sigma);
    p.clamp(0.01, 0.99)
}
