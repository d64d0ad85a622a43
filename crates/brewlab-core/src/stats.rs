//! Numeric helpers for the correlation engine
//!
//! Pearson correlation plus the Student-t tail probability used for its
//! significance. The t tail goes through the regularized incomplete beta
//! function (continued fraction evaluation, Lanczos log-gamma).

use std::f64::consts::PI;

/// Pearson correlation of two equal-length series.
///
/// Returns `None` when there are fewer than two points or either series has
/// no variation (every value identical), where r is undefined.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if is_constant(xs) || is_constant(ys) {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }

    Some((cov / denom).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Two-tailed p-value for a Pearson r over n paired samples.
///
/// Uses `t = r * sqrt((n - 2) / (1 - r^2))` with n - 2 degrees of freedom.
/// Needs n >= 3; smaller samples carry no evidence and return 1.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 || !r.is_finite() {
        return 1.0;
    }
    let r2 = r * r;
    if r2 >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r2)).sqrt();
    student_t_two_tailed(t, df)
}

/// P(|T| >= |t|) for a Student-t variable with `df` degrees of freedom
pub fn student_t_two_tailed(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Regularized incomplete beta function I_x(a, b)
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fast only below this split point
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 3.0e-16;
    const TINY: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}

/// Natural log of the gamma function (Lanczos approximation, g = 7)
#[allow(clippy::excessive_precision)]
pub fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, coefficient) in COEFFICIENTS.iter().enumerate().skip(1) {
        sum += coefficient / (x + i as f64);
    }
    let t = x + G + 0.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!(close(pearson(&xs, &ys).unwrap(), 1.0, 1e-12));
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert!(close(pearson(&xs, &ys).unwrap(), -1.0, 1e-12));
    }

    #[test]
    fn test_pearson_known_value() {
        // Hand-computed: cov = 10, var_x = 10, var_y = 14.8
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 6.0];
        let expected = 10.0 / (10.0f64 * 14.8).sqrt();
        assert!(close(pearson(&xs, &ys).unwrap(), expected, 1e-12));
    }

    #[test]
    fn test_pearson_constant_is_undefined() {
        let xs = [0.1, 0.1, 0.1, 0.1, 0.1];
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(pearson(&xs, &ys), None);
        assert_eq!(pearson(&ys, &xs), None);
    }

    #[test]
    fn test_pearson_rejects_mismatched_lengths() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_ln_gamma_integers() {
        // Gamma(n) = (n-1)!
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(2.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24.0f64.ln(), 1e-10));
        assert!(close(ln_gamma(0.5), PI.sqrt().ln(), 1e-10));
    }

    #[test]
    fn test_incomplete_beta_bounds_and_symmetry() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        let left = regularized_incomplete_beta(2.0, 3.0, 0.3);
        let right = regularized_incomplete_beta(3.0, 2.0, 0.7);
        assert!(close(left, 1.0 - right, 1e-12));
        // I_x(1, 1) = x
        assert!(close(regularized_incomplete_beta(1.0, 1.0, 0.42), 0.42, 1e-12));
    }

    #[test]
    fn test_student_t_cauchy() {
        // One degree of freedom is the Cauchy distribution: P(|T| >= 1) = 0.5
        assert!(close(student_t_two_tailed(1.0, 1.0), 0.5, 1e-10));
        assert!(close(student_t_two_tailed(0.0, 4.0), 1.0, 1e-12));
    }

    #[test]
    fn test_student_t_critical_value() {
        // t(0.975, 10) = 2.228
        assert!(close(student_t_two_tailed(2.228, 10.0), 0.05, 1e-3));
        assert!(close(student_t_two_tailed(-2.228, 10.0), 0.05, 1e-3));
    }

    #[test]
    fn test_correlation_p_value_edges() {
        assert_eq!(correlation_p_value(1.0, 6), 0.0);
        assert_eq!(correlation_p_value(-1.0, 6), 0.0);
        assert_eq!(correlation_p_value(0.9, 2), 1.0);
        assert!(close(correlation_p_value(0.0, 10), 1.0, 1e-12));
        let weak = correlation_p_value(0.2, 10);
        let strong = correlation_p_value(0.9, 10);
        assert!(strong < weak);
        assert!(strong < 0.01);
    }
}
