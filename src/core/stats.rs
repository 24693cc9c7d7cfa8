//! Welch's unequal-variance t-test

use crate::core::types::{NotComputable, Significance};

fn mean_and_variance(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

/// Two-sided Welch's t-test of `current` against `baseline`.
///
/// Needs at least two observations per side and a non-zero variance in at
/// least one of them; anything else is reported as not computable.
pub(crate) fn welch_t_test(current: &[f64], baseline: &[f64]) -> Significance {
    let (n_c, n_b) = (current.len(), baseline.len());
    if n_c < 2 || n_b < 2 {
        return Significance::NotComputable(NotComputable::InsufficientSamples {
            current: n_c,
            baseline: n_b,
        });
    }

    let (mean_c, var_c) = mean_and_variance(current);
    let (mean_b, var_b) = mean_and_variance(baseline);

    let s_c = var_c / n_c as f64;
    let s_b = var_b / n_b as f64;
    let se = (s_c + s_b).sqrt();
    if se == 0.0 || !se.is_finite() {
        return Significance::NotComputable(NotComputable::ZeroVariance);
    }

    let t = (mean_c - mean_b) / se;

    // Welch-Satterthwaite
    let df_denom = s_c.powi(2) / (n_c - 1) as f64 + s_b.powi(2) / (n_b - 1) as f64;
    if df_denom <= 0.0 || !df_denom.is_finite() {
        return Significance::NotComputable(NotComputable::ZeroVariance);
    }
    let df = (s_c + s_b).powi(2) / df_denom;

    Significance::Computed {
        t_statistic: t,
        degrees_of_freedom: df,
        p_value: students_t_two_tailed_p(t, df).clamp(0.0, 1.0),
    }
}

/// Two-tailed p-value of Student's t with `df` degrees of freedom,
/// `I_{df/(df+t^2)}(df/2, 1/2)`.
fn students_t_two_tailed_p(t: f64, df: f64) -> f64 {
    if !df.is_finite() || df <= 0.0 {
        return 1.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x)
}

fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();

    // The continued fraction converges fast only on one side of the mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        (front * beta_continued_fraction(a, b, x) / a).clamp(0.0, 1.0)
    } else {
        (1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b).clamp(0.0, 1.0)
    }
}

/// Lentz's method for the incomplete beta continued fraction
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERS: usize = 300;
    const EPS: f64 = 1.0e-12;
    const TINY: f64 = 1.0e-30;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let even = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + even * d);
        c = guard(1.0 + even / c);
        h *= d * c;

        let odd = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + odd * d);
        c = guard(1.0 + odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Lanczos approximation (g = 7) of ln Γ(x) for x > 0
#[allow(clippy::excessive_precision)]
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    use std::f64::consts::PI;

    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + 7.5;
    let acc = COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEFFICIENTS[0], |acc, (i, &c)| acc + c / (x + i as f64));

    0.5 * (2.0 * PI).ln() + t.ln() * (x + 0.5) - t + acc.ln()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn p(sig: Significance) -> f64 {
        sig.p_value().expect("computable")
    }

    #[test]
    fn single_observations_are_not_computable() {
        let sig = welch_t_test(&[100.0], &[200.0]);
        assert_eq!(
            sig,
            Significance::NotComputable(NotComputable::InsufficientSamples {
                current: 1,
                baseline: 1
            })
        );
    }

    #[test]
    fn empty_sample_is_not_computable() {
        let sig = welch_t_test(&[], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            sig,
            Significance::NotComputable(NotComputable::InsufficientSamples { current: 0, .. })
        ));
    }

    #[test]
    fn constant_samples_are_not_computable() {
        let sig = welch_t_test(&[5.0, 5.0, 5.0], &[7.0, 7.0]);
        assert_eq!(sig, Significance::NotComputable(NotComputable::ZeroVariance));
    }

    #[test]
    fn one_constant_side_is_still_computable() {
        let sig = welch_t_test(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]);
        assert!(sig.p_value().is_some());
    }

    #[test]
    fn identical_samples_give_p_of_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert!((p(welch_t_test(&a, &a)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn matches_reference_value() {
        // t = -4.992, df = 7.477, p = 0.0013
        let current = [19.1, 20.2, 18.5, 21.3, 20.0];
        let baseline = [22.4, 23.1, 21.8, 24.0, 22.9];
        match welch_t_test(&current, &baseline) {
            Significance::Computed {
                t_statistic,
                degrees_of_freedom,
                p_value,
            } => {
                assert!((t_statistic + 4.992).abs() < 1e-3, "t={t_statistic}");
                assert!((degrees_of_freedom - 7.477).abs() < 1e-3, "df={degrees_of_freedom}");
                assert!((p_value - 0.0013).abs() < 1e-4, "p={p_value}");
            }
            other => panic!("expected computed result, got {other:?}"),
        }
    }

    #[test]
    fn small_df_is_not_significant() {
        // t = 2.83 but df = 2, p = 0.1056
        let pv = p(welch_t_test(&[2.0, 3.0], &[0.0, 1.0]));
        assert!((pv - 0.1056).abs() < 1e-3, "p={pv}");
    }

    #[test]
    fn large_effect_is_significant() {
        let current: Vec<f64> = (0..200).map(|i| 150.0 + (i % 10) as f64).collect();
        let baseline: Vec<f64> = (0..200).map(|i| 100.0 + (i % 10) as f64).collect();
        assert!(p(welch_t_test(&current, &baseline)) < 1e-6);
    }

    #[test]
    fn p_value_is_symmetric() {
        let a = [3.0, 4.0, 8.0, 1.0];
        let b = [5.0, 9.0, 7.0, 6.0, 10.0];
        let ab = p(welch_t_test(&a, &b));
        let ba = p(welch_t_test(&b, &a));
        assert!((ab - ba).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn ln_gamma_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }
}
