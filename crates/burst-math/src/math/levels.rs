//! Geometric rate ladder.
//!
//! Level `j` stands for the rate hypothesis `s^j`, so level 0 is the
//! slowest rate and each level up multiplies the rate by the growth
//! factor `s`.

/// Highest level `k` the rate ladder supports.
///
/// The lattice holds `(n + 1) * (k + 1)` cells and each one scans `k + 1`
/// predecessors, so a growth factor close to 1 on a long input would need
/// far more levels than any fill can afford.
pub const MAX_LEVEL: usize = 4096;

/// Rate implied by level `j` under growth factor `s`: `s^j`.
pub fn level_rate(s: f64, j: usize) -> f64 {
    match i32::try_from(j) {
        Ok(exp) => s.powi(exp),
        Err(_) => s.powf(j as f64),
    }
}

/// All rates `s^0 ..= s^max_level`, in ascending level order.
pub fn level_rates(s: f64, max_level: usize) -> Vec<f64> {
    (0..=max_level).map(|j| level_rate(s, j)).collect()
}

/// Highest level `k = ceil(log_s(n))` needed for `n` observed gaps.
///
/// Computed as the smallest `k >= 0` with `s^k >= n`, so an `ln(n)/ln(s)`
/// ratio that lands a hair above an integer (e.g. `n = 125, s = 5`) does
/// not add a spurious level.
///
/// Returns `None` when `n == 0` (the logarithm is undefined), when `s`
/// is not a finite value greater than 1, or when `k` would exceed
/// [`MAX_LEVEL`].
pub fn level_count(n: usize, s: f64) -> Option<usize> {
    if n == 0 || !s.is_finite() || s <= 1.0 {
        return None;
    }
    if n == 1 {
        return Some(0);
    }

    let target = n as f64;
    let estimate = (target.ln() / s.ln()).ceil();
    if !estimate.is_finite() || estimate > (MAX_LEVEL + 1) as f64 {
        return None;
    }
    let mut k = estimate.max(0.0) as usize;
    while k > 0 && level_rate(s, k - 1) >= target {
        k -= 1;
    }
    while level_rate(s, k) < target {
        if k >= MAX_LEVEL {
            return None;
        }
        k += 1;
    }
    Some(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_rate_powers() {
        assert_eq!(level_rate(2.0, 0), 1.0);
        assert_eq!(level_rate(2.0, 3), 8.0);
        assert_eq!(level_rate(3.0, 2), 9.0);
    }

    #[test]
    fn level_rate_beyond_i32_exponent() {
        // (1 + 1e-12)^(7e12) = e^7 up to rounding of s
        let rate = level_rate(1.0 + 1e-12, 7_000_000_000_000);
        assert!((rate - 7f64.exp()).abs() / 7f64.exp() < 1e-2, "rate={rate}");
        assert_eq!(level_rate(2.0, usize::MAX), f64::INFINITY);
    }

    #[test]
    fn level_rates_ascending() {
        let rates = level_rates(2.0, 4);
        assert_eq!(rates, vec![1.0, 2.0, 4.0, 8.0, 16.0]);
    }

    #[test]
    fn level_count_small_inputs() {
        assert_eq!(level_count(0, 2.0), None);
        assert_eq!(level_count(1, 2.0), Some(0));
        assert_eq!(level_count(2, 2.0), Some(1));
        assert_eq!(level_count(3, 2.0), Some(2));
        assert_eq!(level_count(4, 2.0), Some(2));
        assert_eq!(level_count(5, 2.0), Some(3));
    }

    #[test]
    fn level_count_exact_powers() {
        assert_eq!(level_count(8, 2.0), Some(3));
        assert_eq!(level_count(1024, 2.0), Some(10));
        assert_eq!(level_count(1000, 10.0), Some(3));
        // ln(125)/ln(5) rounds to 3.0000000000000004
        assert_eq!(level_count(125, 5.0), Some(3));
        assert_eq!(level_count(243, 3.0), Some(5));
    }

    #[test]
    fn level_count_non_integer_factor() {
        // 1.5^5 = 7.59, 1.5^6 = 11.39
        assert_eq!(level_count(10, 1.5), Some(6));
    }

    #[test]
    fn level_count_limit() {
        assert_eq!(level_count(1000, 1.0 + 1e-12), None);
        assert_eq!(level_count(usize::MAX, 1.0 + f64::EPSILON), None);
        // 1.001^4079 = 58.96, 1.001^4080 = 59.02, 1.001^4096 = 59.98
        assert_eq!(level_count(59, 1.001), Some(4080));
        assert_eq!(level_count(60, 1.001), None);
        assert_eq!(level_count(1 << 20, 2.0), Some(20));
    }

    #[test]
    fn level_count_invalid_factor() {
        assert_eq!(level_count(10, 1.0), None);
        assert_eq!(level_count(10, 0.5), None);
        assert_eq!(level_count(10, f64::NAN), None);
        assert_eq!(level_count(10, f64::INFINITY), None);
    }
}
