//! Fixed-capacity sample window and RMS/peak reduction
//!
//! The sampling task owns exactly one [`SampleWindow`]; it is never shared.
//! A full window is reduced in a single pass and cleared, so accumulation
//! of the next window starts immediately with no gap.

use heapless::Vec;
use libm::sqrtf;

/// One tri-axis acceleration sample in g
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Acceleration magnitude: sqrt(x² + y² + z²)
    pub fn magnitude(&self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Errors from window operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowError {
    /// Reduce called before the window filled
    NotReady,
    /// Push on a full, not-yet-reduced window
    Overflow,
}

/// Result of reducing one full window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowSummary {
    /// Root-mean-square of sample magnitudes in g
    pub rms_g: f32,
    /// Largest sample magnitude in g
    pub peak_g: f32,
}

/// Fixed-capacity accumulation window for `N` samples
///
/// The caller keeps the window from overflowing by reducing synchronously
/// whenever [`is_full`](Self::is_full) reports true.
pub struct SampleWindow<const N: usize> {
    samples: Vec<Sample, N>,
}

impl<const N: usize> SampleWindow<N> {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Append one sample
    pub fn push(&mut self, sample: Sample) -> Result<(), WindowError> {
        self.samples.push(sample).map_err(|_| WindowError::Overflow)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == N
    }

    /// Reduce a full window to RMS and peak magnitude, then clear it
    ///
    /// Accumulates the sum of squared magnitudes and the running maximum in
    /// one pass, keeping reduction latency bounded on the sampling task.
    /// Fails with [`WindowError::NotReady`] and leaves the window untouched
    /// when fewer than `N` samples have been pushed.
    pub fn reduce(&mut self) -> Result<WindowSummary, WindowError> {
        if !self.is_full() {
            return Err(WindowError::NotReady);
        }

        let mut sum_sq = 0.0f32;
        let mut peak = 0.0f32;

        for sample in self.samples.iter() {
            let mag = sample.magnitude();
            sum_sq += mag * mag;
            if mag > peak {
                peak = mag;
            }
        }

        self.samples.clear();

        Ok(WindowSummary {
            rms_g: sqrtf(sum_sq / N as f32),
            peak_g: peak,
        })
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fill<const N: usize>(window: &mut SampleWindow<N>, sample: Sample, count: usize) {
        for _ in 0..count {
            window.push(sample).unwrap();
        }
    }

    #[test]
    fn unit_magnitude_window_reduces_to_one_g() {
        let mut window = SampleWindow::<500>::new();
        fill(&mut window, Sample::new(1.0, 0.0, 0.0), 500);

        let summary = window.reduce().unwrap();
        assert!((summary.rms_g - 1.0).abs() < 1e-6);
        assert!((summary.peak_g - 1.0).abs() < 1e-6);
        assert!(window.is_empty());
    }

    #[test]
    fn partial_window_is_not_ready() {
        let mut window = SampleWindow::<500>::new();
        fill(&mut window, Sample::new(0.0, 1.0, 0.0), 499);

        assert_eq!(window.reduce(), Err(WindowError::NotReady));
        assert_eq!(window.len(), 499);
    }

    #[test]
    fn push_on_full_window_overflows() {
        let mut window = SampleWindow::<4>::new();
        fill(&mut window, Sample::new(0.0, 0.0, 1.0), 4);

        assert_eq!(
            window.push(Sample::new(0.0, 0.0, 1.0)),
            Err(WindowError::Overflow)
        );
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn reduce_clears_window_for_next_accumulation() {
        let mut window = SampleWindow::<4>::new();
        fill(&mut window, Sample::new(2.0, 0.0, 0.0), 4);
        window.reduce().unwrap();

        fill(&mut window, Sample::new(0.5, 0.0, 0.0), 4);
        let summary = window.reduce().unwrap();
        assert!((summary.rms_g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mixed_magnitudes() {
        // Magnitudes 3, 4 -> rms = sqrt((9 + 16) / 2), peak = 4
        let mut window = SampleWindow::<2>::new();
        window.push(Sample::new(3.0, 0.0, 0.0)).unwrap();
        window.push(Sample::new(0.0, 4.0, 0.0)).unwrap();

        let summary = window.reduce().unwrap();
        assert!((summary.rms_g - libm::sqrtf(12.5)).abs() < 1e-5);
        assert!((summary.peak_g - 4.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn reduction_matches_reference(axes in proptest::collection::vec((-8.0f32..8.0, -8.0f32..8.0, -8.0f32..8.0), 16)) {
            let mut window = SampleWindow::<16>::new();
            let mut sum_sq = 0.0f64;
            let mut peak = 0.0f64;

            for (x, y, z) in &axes {
                let sample = Sample::new(*x, *y, *z);
                let mag = f64::from(sample.magnitude());
                sum_sq += mag * mag;
                peak = peak.max(mag);
                window.push(sample).unwrap();
            }

            let summary = window.reduce().unwrap();
            let expected_rms = (sum_sq / 16.0).sqrt();
            prop_assert!((f64::from(summary.rms_g) - expected_rms).abs() < 1e-3);
            prop_assert!((f64::from(summary.peak_g) - peak).abs() < 1e-3);
            prop_assert!(window.is_empty());
        }
    }
}
