//! Random distributions biasing edge-target selection.
//!
//! This module implements the samplers used by the connection selector:
//! a polar-transform standard normal sampler and a scaled log-normal index
//! sampler. The log-normal index picks a rank in a distance-sorted
//! candidate list, favoring near neighbours with a long tail toward
//! distant ones.
//!
//! All rejection loops here are bounded-probability retries, not errors.
//! A defensive iteration cap with a deterministic fallback guards against
//! pathological randomness.

use rand::Rng;

/// Iteration cap for rejection loops. The polar transform accepts with
/// probability pi/4 per attempt, so hitting this cap is astronomically
/// unlikely with a working RNG.
const MAX_REJECTION_ATTEMPTS: usize = 1024;

/// Standard normal sampler using the polar (Marsaglia) transform.
///
/// Each accepted draw produces two independent samples from two uniform
/// draws; the second is kept in a one-slot spare buffer and returned by
/// the next call.
#[derive(Debug, Default)]
pub struct NormalSampler {
    spare: Option<f64>,
}

impl NormalSampler {
    pub fn new() -> Self {
        Self { spare: None }
    }

    /// Draw one sample from the standard normal distribution.
    pub fn sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }

        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let u: f64 = rng.gen::<f64>() * 2.0 - 1.0;
            let v: f64 = rng.gen::<f64>() * 2.0 - 1.0;
            let s = u * u + v * v;
            if s == 0.0 || s >= 1.0 {
                continue;
            }
            let mul = (-2.0 * s.ln() / s).sqrt();
            self.spare = Some(v * mul);
            return u * mul;
        }

        // Deterministic fallback; only reachable with a broken RNG.
        0.0
    }

    /// Rejection-sample until the result falls in `[min, max]`.
    pub fn sample_in_range<R: Rng>(&mut self, rng: &mut R, min: f64, max: f64) -> f64 {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let val = self.sample(rng);
            if val >= min && val <= max {
                return val;
            }
        }
        // Fallback clamps into the requested range.
        0.0f64.clamp(min, max)
    }

    /// Draw a skewed index into a distance-sorted candidate list.
    ///
    /// A normal sample in `[0, max]` is rescaled through
    /// `exp(r * ln(std_dev) + ln(mean))` and rounded. Results above `max`
    /// or below zero are coerced to 0, so the returned index is always in
    /// `[0, max]`.
    pub fn scaled_log_normal_index<R: Rng>(
        &mut self,
        rng: &mut R,
        mean: f64,
        std_dev: f64,
        max: usize,
    ) -> usize {
        if max == 0 {
            return 0;
        }
        let r = self.sample_in_range(rng, 0.0, max as f64);
        let scaled = (r * std_dev.ln() + mean.ln()).exp().round();
        if scaled < 0.0 || scaled > max as f64 {
            0
        } else {
            scaled as usize
        }
    }
}
