//! Scalar samplers used to scatter galaxy particles.
//!
//! Both samplers are pure functions of their arguments and the RNG passed in.
//! There is no shared state, so independent threads can sample concurrently
//! as long as each owns its own RNG.
//!
//! # Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let offset = sample_log_normal_distance(&mut rng, 1.0, 0.5);
//! let spread = sample_half_gaussian(&mut rng, 0.2);
//! ```

use rand::Rng;
use std::f32::consts::TAU;

/// Smallest value [`open_unit`] returns, `2^-24`.
pub const OPEN_UNIT_MIN: f32 = 1.0 / 16_777_216.0;

/// Largest exponent [`sample_log_normal_distance`] supports. Up to here
/// `exp` stays finite and its reciprocal is a normal f32.
pub const LOG_NORMAL_MAX_EXPONENT: f32 = 87.0;

/// Uniform draw in `(0, 1]`.
///
/// `Rng::gen::<f32>()` covers `[0, 1)`, so flipping it excludes zero and keeps
/// `ln(u)` finite.
#[inline]
pub fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    1.0 - rng.gen::<f32>()
}

/// Random sign, `1.0` or `-1.0` with equal probability.
#[inline]
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen::<f32>() < 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Largest exponent `mu + sigma * sqrt(-2 ln u)` reachable with
/// `u >= OPEN_UNIT_MIN`.
#[inline]
pub fn log_normal_exponent_bound(mu: f32, sigma: f32) -> f32 {
    mu + sigma * (-2.0 * OPEN_UNIT_MIN.ln()).sqrt()
}

/// Signed distance whose magnitude is the reciprocal of a log-normal-style draw.
///
/// Computes `x = 1 / exp(mu + sigma * sqrt(-2 ln u))` with `u` uniform in
/// `(0, 1]` and returns `x` or `-x` with equal probability. For `mu > 0`,
/// `sigma > 0` and [`log_normal_exponent_bound`] at most
/// [`LOG_NORMAL_MAX_EXPONENT`], the magnitude lies in `(0, exp(-mu)]`, so the
/// result is finite and nonzero. Past that bound `exp` overflows and the
/// result collapses to zero; `AdvancedParameters` rejects such pairs.
///
/// A zero uniform draw would push the exponent to infinity and the result to
/// zero. [`open_unit`] never yields zero, so that case cannot occur here.
pub fn sample_log_normal_distance<R: Rng + ?Sized>(rng: &mut R, mu: f32, sigma: f32) -> f32 {
    let u = open_unit(rng);
    let log_normal = (mu + sigma * (-2.0 * u.ln()).sqrt()).exp();
    let x = 1.0 / log_normal;
    x * random_sign(rng)
}

/// Half-Gaussian sample with scale `std`, always `>= 0`.
///
/// Uses the Box-Muller transform on two independent uniforms and folds the
/// result onto the positive axis. The mean is `std * sqrt(2 / pi)`.
pub fn sample_half_gaussian<R: Rng + ?Sized>(rng: &mut R, std: f32) -> f32 {
    let u1 = open_unit(rng);
    let u2 = rng.gen::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    (z * std).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_open_unit_excludes_zero() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let u = open_unit(&mut rng);
            assert!(u > 0.0 && u <= 1.0);
        }
    }

    #[test]
    fn test_log_normal_distance_finite_and_bounded() {
        let mut rng = SmallRng::seed_from_u64(2);
        let (mu, sigma) = (1.0_f32, 0.5_f32);
        let bound = (-mu).exp();
        let mut negatives = 0;
        for _ in 0..10_000 {
            let d = sample_log_normal_distance(&mut rng, mu, sigma);
            assert!(d.is_finite());
            assert!(d != 0.0);
            assert!(d.abs() <= bound + 1e-6);
            if d < 0.0 {
                negatives += 1;
            }
        }
        // Sign is a fair coin
        assert!(negatives > 4_500 && negatives < 5_500, "negatives = {}", negatives);
    }

    #[test]
    fn test_log_normal_distance_nonzero_at_exponent_limit() {
        let mut rng = SmallRng::seed_from_u64(5);
        let (mu, sigma) = (80.0_f32, 1.0_f32);
        assert!(log_normal_exponent_bound(mu, sigma) <= LOG_NORMAL_MAX_EXPONENT);
        for _ in 0..10_000 {
            let d = sample_log_normal_distance(&mut rng, mu, sigma);
            assert!(d.is_finite());
            assert!(d != 0.0);
        }
    }

    #[test]
    fn test_exponent_bound_flags_overflowing_pairs() {
        assert!(log_normal_exponent_bound(1.0, 0.5) <= LOG_NORMAL_MAX_EXPONENT);
        assert!(log_normal_exponent_bound(90.0, 0.5) > LOG_NORMAL_MAX_EXPONENT);
        assert!(log_normal_exponent_bound(1.0, 30.0) > LOG_NORMAL_MAX_EXPONENT);
        // sqrt(-2 ln 2^-24) is about 5.77
        assert!((log_normal_exponent_bound(0.0, 1.0) - 5.768).abs() < 1e-3);
    }

    #[test]
    fn test_half_gaussian_non_negative() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10_000 {
            assert!(sample_half_gaussian(&mut rng, 2.5) >= 0.0);
        }
    }

    #[test]
    fn test_half_gaussian_mean() {
        let mut rng = SmallRng::seed_from_u64(4);
        let std = 1.5_f32;
        let trials = 10_000;
        let sum: f64 = (0..trials)
            .map(|_| sample_half_gaussian(&mut rng, std) as f64)
            .sum();
        let mean = sum / trials as f64;
        let expected = std as f64 * (2.0 / std::f64::consts::PI).sqrt();
        // Standard error of the mean is ~0.009 here, allow a wide margin
        assert!((mean - expected).abs() < 0.05, "mean {} vs {}", mean, expected);
    }
}
