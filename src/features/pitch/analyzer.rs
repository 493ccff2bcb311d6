//! Spectral analyzer: downsample, window, transform, lock
//!
//! Every cycle the analyzer looks at the whole capture buffer at half rate,
//! starting at the write cursor so the newest audio ends the window. Note the
//! deliberate asymmetry with the waveform path, which starts at the read
//! cursor: the spectrum shows the latest audio, the waveform a phase-locked
//! older window.

use super::harmonic::harmonic_less_than;
use super::peak::max_frequency;
use super::transform::{RealFftTransform, Transform};
use super::window::hann_window;
use crate::config::{
    CHANNELS, DEFAULT_PITCH, ENVELOPE_EPSILON, FFT_LEN, HARMONIC_THRESHOLD,
};
use crate::error::SyncError;
use crate::io::capture_buffer::CaptureBuffer;
use rustfft::num_complex::Complex32;

/// Per-channel transform buffers, sized once and reused every cycle
#[derive(Debug)]
struct Workspace {
    input: Vec<f32>,
    bins: Vec<Complex32>,
}

impl Workspace {
    fn new() -> Self {
        Self {
            input: vec![0.0; FFT_LEN],
            bins: vec![Complex32::new(0.0, 0.0); FFT_LEN / 2 + 1],
        }
    }
}

/// Spectrum and dominant-pitch estimator for both channels
#[derive(Debug)]
pub struct SpectralAnalyzer<T: Transform = RealFftTransform> {
    transform: T,
    window: Vec<f32>,
    magnitude_scale: f32,
    workspaces: [Workspace; CHANNELS],
}

impl SpectralAnalyzer<RealFftTransform> {
    /// Create an analyzer backed by a `realfft` plan of [`FFT_LEN`] points
    pub fn new() -> Self {
        Self::build(RealFftTransform::new(FFT_LEN))
    }
}

impl Default for SpectralAnalyzer<RealFftTransform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transform> SpectralAnalyzer<T> {
    /// Create an analyzer around a caller-supplied transform
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConfigurationMismatch` if the transform was not
    /// planned for [`FFT_LEN`] points.
    pub fn with_transform(transform: T) -> Result<Self, SyncError> {
        if transform.len() != FFT_LEN {
            return Err(SyncError::ConfigurationMismatch(format!(
                "Transform length {} does not match analysis window {}",
                transform.len(),
                FFT_LEN
            )));
        }
        Ok(Self::build(transform))
    }

    fn build(transform: T) -> Self {
        Self {
            transform,
            window: hann_window(FFT_LEN),
            magnitude_scale: 1.0 / (FFT_LEN as f32).sqrt(),
            workspaces: [Workspace::new(), Workspace::new()],
        }
    }

    /// Transform the current capture buffer contents of both channels
    ///
    /// Samples are divided by the channel envelope before windowing. The DC
    /// bin is zeroed afterwards so it cannot win the peak search.
    pub fn analyze(&mut self, capture: &CaptureBuffer, envelopes: &[f32; CHANNELS]) {
        for (channel, workspace) in self.workspaces.iter_mut().enumerate() {
            let gain = 1.0 / (envelopes[channel] + ENVELOPE_EPSILON);
            for (i, (x, w)) in workspace.input.iter_mut().zip(&self.window).enumerate() {
                *x = capture.downsampled(channel, i) * gain * w;
            }
            self.transform
                .process(&mut workspace.input, &mut workspace.bins);
            workspace.bins[0] = Complex32::new(0.0, 0.0);
        }
    }

    /// Complex bins of the last analysis of `channel`
    pub fn bins(&self, channel: usize) -> &[Complex32] {
        &self.workspaces[channel].bins
    }

    /// Display magnitude of bin `i`, scaled by `1/sqrt(FFT_LEN)`
    #[inline]
    pub fn magnitude(&self, channel: usize, i: usize) -> f32 {
        self.workspaces[channel].bins[i].norm() * self.magnitude_scale
    }

    /// Interpolated frequency of the dominant peak in Hz
    pub fn dominant_frequency(&self, channel: usize) -> f32 {
        max_frequency(&self.workspaces[channel].bins)
    }

    /// Frequency the reader should lock to for the next cycle
    ///
    /// With `fft_sync` the dominant peak folded below [`HARMONIC_THRESHOLD`],
    /// otherwise [`DEFAULT_PITCH`].
    pub fn locked_frequency(&self, channel: usize, fft_sync: bool) -> f32 {
        if fft_sync {
            harmonic_less_than(self.dominant_frequency(channel), HARMONIC_THRESHOLD)
        } else {
            DEFAULT_PITCH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CAPTURE_LEN, CHUNK_LEN, MIN_FREQUENCY, SAMPLE_RATE};
    use crate::io::stream::ToneStream;

    fn filled_buffer(left_hz: f32, right_hz: f32) -> CaptureBuffer {
        let mut stream = ToneStream::new(SAMPLE_RATE, left_hz, right_hz).unwrap();
        let mut capture = CaptureBuffer::new();
        for _ in 0..CAPTURE_LEN / CHUNK_LEN + 3 {
            capture.ingest(&mut stream);
        }
        capture
    }

    #[test]
    fn test_dominant_frequency_of_tone() {
        let capture = filled_buffer(220.0, 330.0);
        let mut analyzer = SpectralAnalyzer::new();
        analyzer.analyze(&capture, &[0.5, 0.5]);

        let left = analyzer.dominant_frequency(0);
        let right = analyzer.dominant_frequency(1);
        assert!((left - 220.0).abs() < 1.5, "left estimate {:.2}", left);
        assert!((right - 330.0).abs() < 1.5, "right estimate {:.2}", right);
    }

    #[test]
    fn test_locked_frequency_folds_or_free_runs() {
        let capture = filled_buffer(220.0, 220.0);
        let mut analyzer = SpectralAnalyzer::new();
        analyzer.analyze(&capture, &[1.0, 1.0]);

        let locked = analyzer.locked_frequency(0, true);
        assert!((locked - 55.0).abs() < 0.5, "locked at {:.2}", locked);
        assert_eq!(analyzer.locked_frequency(0, false), DEFAULT_PITCH);
    }

    #[test]
    fn test_dc_bin_is_zeroed() {
        let mut stream = ToneStream::new(SAMPLE_RATE, 100.0, 100.0).unwrap();
        let mut capture = CaptureBuffer::new();
        capture.ingest(&mut stream);

        let mut analyzer = SpectralAnalyzer::new();
        analyzer.analyze(&capture, &[1.0, 1.0]);
        assert_eq!(analyzer.bins(0)[0].norm(), 0.0);
        assert_eq!(analyzer.magnitude(1, 0), 0.0);
    }

    #[test]
    fn test_silence_locks_to_top_of_band() {
        let capture = CaptureBuffer::new();
        let mut analyzer = SpectralAnalyzer::new();
        analyzer.analyze(&capture, &[1.0, 1.0]);

        // 10 Hz floor, three octaves up
        assert_eq!(analyzer.dominant_frequency(0), MIN_FREQUENCY);
        assert_eq!(analyzer.locked_frequency(0, true), 80.0);
        assert_eq!(analyzer.locked_frequency(1, true), 80.0);
    }

    struct WrongLength;

    impl Transform for WrongLength {
        fn len(&self) -> usize {
            FFT_LEN / 2
        }

        fn process(&mut self, _input: &mut [f32], _output: &mut [Complex32]) {}
    }

    #[test]
    fn test_mismatched_transform_rejected() {
        let result = SpectralAnalyzer::with_transform(WrongLength);
        assert!(matches!(result, Err(SyncError::ConfigurationMismatch(_))));
    }
}
