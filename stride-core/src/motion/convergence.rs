//! Convergence detection
//!
//! A fixed-capacity ring of recent samples. Each time the write cursor laps
//! the ring, the population standard deviation of the sample magnitudes is
//! compared against a tolerance. A partly filled ring never yields a verdict.

use heapless::Vec;
use libm::{fabsf, sqrtf};

use super::error::MotionError;

/// Largest supported ring size
pub const MAX_CACHE_SIZE: usize = 64;

/// Check whether samples are statistically stable
///
/// Returns true when the standard deviation of `|s|` over all samples is at
/// most `tolerance`. An empty slice is never stable.
pub fn is_stable(samples: &[f32], tolerance: f32) -> bool {
    if samples.is_empty() {
        return false;
    }

    let n = samples.len() as f32;
    let mean = samples.iter().map(|s| fabsf(*s)).sum::<f32>() / n;
    let variance = samples
        .iter()
        .map(|s| {
            let d = fabsf(*s) - mean;
            d * d
        })
        .sum::<f32>()
        / n;

    sqrtf(variance) <= tolerance
}

/// Fixed-capacity circular sample buffer with a write cursor
#[derive(Debug, Clone)]
pub struct SampleRing {
    /// Sample storage, sized to the requested cache size
    samples: Vec<f32, MAX_CACHE_SIZE>,
    /// Index of the oldest sample (next write position)
    oldest: usize,
    /// Whether the cursor has completed at least one lap
    wrapped: bool,
}

impl SampleRing {
    /// Create a ring holding `cache_size` samples
    pub fn new(cache_size: usize) -> Result<Self, MotionError> {
        if cache_size == 0 || cache_size > MAX_CACHE_SIZE {
            return Err(MotionError::InvalidCacheSize);
        }

        let mut samples = Vec::new();
        samples
            .resize(cache_size, 0.0)
            .map_err(|_| MotionError::InvalidCacheSize)?;

        Ok(Self {
            samples,
            oldest: 0,
            wrapped: false,
        })
    }

    /// Write a sample over the oldest one
    ///
    /// Returns true when this write completed a lap (cursor back to 0).
    pub fn push(&mut self, value: f32) -> bool {
        self.samples[self.oldest] = value;
        self.oldest = (self.oldest + 1) % self.samples.len();

        if self.oldest == 0 {
            self.wrapped = true;
            true
        } else {
            false
        }
    }

    /// Get the stored samples in storage order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get the index of the oldest sample
    pub fn oldest_sample_index(&self) -> usize {
        self.oldest
    }

    /// Get the ring size
    pub fn cache_size(&self) -> usize {
        self.samples.len()
    }

    /// Check whether the ring has been completely filled at least once
    pub fn has_wrapped(&self) -> bool {
        self.wrapped
    }
}

/// A sample ring paired with a stability tolerance
#[derive(Debug, Clone)]
pub struct ConvergenceDetector {
    ring: SampleRing,
    tolerance: f32,
}

impl ConvergenceDetector {
    /// Create a detector over `cache_size` samples
    pub fn new(cache_size: usize, tolerance: f32) -> Result<Self, MotionError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(MotionError::InvalidTolerance);
        }

        Ok(Self {
            ring: SampleRing::new(cache_size)?,
            tolerance,
        })
    }

    /// Record a sample
    ///
    /// Returns true only on a lap boundary where the full ring is stable.
    pub fn sample(&mut self, value: f32) -> bool {
        self.ring.push(value) && is_stable(self.ring.samples(), self.tolerance)
    }

    /// Get the underlying ring
    pub fn ring(&self) -> &SampleRing {
        &self.ring
    }

    /// Get the stability tolerance
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }
}
