//! Exponential inter-arrival model.
//!
//! An event process firing at rate `λ` produces gaps distributed as
//! `Exp(λ)`, with density `f(x) = λ e^(-λx)` for `x >= 0`.
//!
//! All log-domain functions are evaluated in closed form
//! (`ln λ - λx`) rather than as `ln(f(x))`, so very long gaps under a
//! high rate stay finite instead of underflowing `f(x)` to zero.

/// Density of `Exp(rate)` at `x`.
///
/// Returns 0 for `x < 0` and NaN for a non-positive or NaN rate.
pub fn exponential_density(x: f64, rate: f64) -> f64 {
    if x.is_nan() || rate.is_nan() || rate <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return 0.0;
    }
    rate * (-rate * x).exp()
}

/// Log density of `Exp(rate)` at `x`: `ln(rate) - rate * x`.
///
/// Returns NEG_INFINITY for `x < 0` and NaN for a non-positive or NaN rate.
pub fn exponential_log_density(x: f64, rate: f64) -> f64 {
    if x.is_nan() || rate.is_nan() || rate <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return f64::NEG_INFINITY;
    }
    if rate == f64::INFINITY {
        return if x == 0.0 { f64::INFINITY } else { f64::NEG_INFINITY };
    }
    rate.ln() - rate * x
}

/// Negative log density of `Exp(rate)` at `x`: `rate * x - ln(rate)`.
///
/// This is the cost of explaining one observed gap `x` under the rate
/// hypothesis `rate`. It grows without bound as the gap gets long under
/// a fast rate, and is minimized over rates at `rate = 1 / x`.
pub fn exponential_neg_log_density(x: f64, rate: f64) -> f64 {
    -exponential_log_density(x, rate)
}
