//! Dominant frequency estimation from a magnitude spectrum
//!
//! # Algorithm
//!
//! 1. Scan the first [`PEAK_SEARCH_BINS`] bins for the largest magnitude
//! 2. Fit a parabola through the peak and its two neighbours
//! 3. Convert the interpolated bin position to Hz
//!
//! # Reference
//!
//! Smith, J. O. Spectral Audio Signal Processing, "Quadratic Interpolation of
//! Spectral Peaks". CCRMA, Stanford University.

use crate::config::{
    FFT_LEN, FFT_SAMPLE_RATE, MIN_FREQUENCY, PARABOLIC_EPSILON, PEAK_SEARCH_BINS,
};
use rustfft::num_complex::Complex32;

/// Index of the loudest bin among bins `1..PEAK_SEARCH_BINS`
///
/// Returns 0 when every candidate is silent (or NaN).
pub fn max_bin(bins: &[Complex32]) -> usize {
    let mut max = 0.0f32;
    let mut max_i = 0;
    for (i, bin) in bins
        .iter()
        .enumerate()
        .take(PEAK_SEARCH_BINS)
        .skip(1)
    {
        let magnitude = bin.norm();
        if magnitude > max {
            max = magnitude;
            max_i = i;
        }
    }
    max_i
}

/// Sub-bin offset of a peak from the magnitudes at `k-1`, `k`, `k+1`
///
/// `0.5 * (a - g) / (a - 2b + g + ε)`
#[inline]
pub fn parabolic_offset(a: f32, b: f32, g: f32) -> f32 {
    0.5 * (a - g) / (a - 2.0 * b + g + PARABOLIC_EPSILON)
}

/// Frequency of the dominant spectral peak in Hz, never below [`MIN_FREQUENCY`]
///
/// `bins` must hold at least `PEAK_SEARCH_BINS + 1` bins of a
/// [`FFT_LEN`]-point transform of audio at [`FFT_SAMPLE_RATE`].
pub fn max_frequency(bins: &[Complex32]) -> f32 {
    let k = max_bin(bins).max(1);

    let a = bins[k - 1].norm();
    let b = bins[k].norm();
    let g = bins[k + 1].norm();
    let bin = k as f32 + parabolic_offset(a, b, g);

    // f32::max discards a NaN operand
    (bin * FFT_SAMPLE_RATE as f32 / FFT_LEN as f32).max(MIN_FREQUENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_with(peaks: &[(usize, f32)]) -> Vec<Complex32> {
        let mut bins = vec![Complex32::new(0.0, 0.0); FFT_LEN / 2 + 1];
        for &(i, magnitude) in peaks {
            bins[i] = Complex32::new(0.0, magnitude);
        }
        bins
    }

    #[test]
    fn test_max_bin_ignores_dc_and_high_bins() {
        let bins = spectrum_with(&[(0, 100.0), (20, 3.0), (150, 50.0)]);
        assert_eq!(max_bin(&bins), 20);
    }

    #[test]
    fn test_max_bin_silence() {
        let bins = spectrum_with(&[]);
        assert_eq!(max_bin(&bins), 0);
    }

    #[test]
    fn test_parabolic_offset_symmetric_peak() {
        assert!(parabolic_offset(1.0, 2.0, 1.0).abs() < 1e-6);
        // Heavier right neighbour pulls the peak right
        assert!(parabolic_offset(1.0, 2.0, 1.5) > 0.0);
        assert!(parabolic_offset(1.5, 2.0, 1.0) < 0.0);
    }

    #[test]
    fn test_max_frequency_interpolates() {
        let hz_per_bin = FFT_SAMPLE_RATE as f32 / FFT_LEN as f32;

        let bins = spectrum_with(&[(19, 1.0), (20, 4.0), (21, 1.0)]);
        assert!((max_frequency(&bins) - 20.0 * hz_per_bin).abs() < 1e-3);

        let bins = spectrum_with(&[(19, 1.0), (20, 4.0), (21, 3.0)]);
        let f = max_frequency(&bins);
        assert!(f > 20.0 * hz_per_bin && f < 21.0 * hz_per_bin);
    }

    #[test]
    fn test_max_frequency_floor() {
        // Silence resolves to bin 1 with no usable offset
        assert_eq!(max_frequency(&spectrum_with(&[])), MIN_FREQUENCY);

        // Interpolated peak between bins 1 and 2 is still under 10 Hz
        let bins = spectrum_with(&[(0, 10.0), (1, 1.0)]);
        assert_eq!(max_frequency(&bins), MIN_FREQUENCY);
    }
}
