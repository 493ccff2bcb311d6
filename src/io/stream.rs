//! Audio stream capability and a procedural tone source
//!
//! The core never opens audio devices itself. Whatever owns it hands over
//! something implementing [`AudioStream`]: a capture backend, a file, or the
//! [`ToneStream`] generator below.

use crate::error::SyncError;
use std::f64::consts::TAU;
use std::thread;
use std::time::Duration;

/// Source of fixed-size stereo chunks at a fixed sample rate
pub trait AudioStream {
    /// Fill `left` and `right` (equal lengths) with the next samples
    ///
    /// May block until the samples are available.
    fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Sample rate of the delivered audio in Hz
    fn sample_rate(&self) -> u32;

    /// Largest chunk the stream can deliver per call
    fn max_chunk_len(&self) -> usize;
}

impl<S: AudioStream + ?Sized> AudioStream for &mut S {
    fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]) {
        (**self).next_chunk(left, right)
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn max_chunk_len(&self) -> usize {
        (**self).max_chunk_len()
    }
}

impl<S: AudioStream + ?Sized> AudioStream for Box<S> {
    fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]) {
        (**self).next_chunk(left, right)
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn max_chunk_len(&self) -> usize {
        (**self).max_chunk_len()
    }
}

/// Stereo sine generator
///
/// Each channel has its own frequency; phase carries over between chunks so
/// the output is continuous. With [`ToneStream::paced`] every call sleeps for
/// the duration of the chunk it produced, which approximates a capture device.
#[derive(Debug, Clone)]
pub struct ToneStream {
    sample_rate: u32,
    frequencies: [f64; 2],
    amplitude: f32,
    phases: [f64; 2],
    max_chunk_len: usize,
    paced: bool,
}

impl ToneStream {
    /// Create a generator playing `left_hz` and `right_hz` at amplitude 0.5
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidInput` if the sample rate is zero or a
    /// frequency is not a positive finite number.
    pub fn new(sample_rate: u32, left_hz: f32, right_hz: f32) -> Result<Self, SyncError> {
        if sample_rate == 0 {
            return Err(SyncError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        for hz in [left_hz, right_hz] {
            if !hz.is_finite() || hz <= 0.0 {
                return Err(SyncError::InvalidInput(format!(
                    "Tone frequency must be positive, got {}",
                    hz
                )));
            }
        }

        Ok(Self {
            sample_rate,
            frequencies: [left_hz as f64, right_hz as f64],
            amplitude: 0.5,
            phases: [0.0; 2],
            max_chunk_len: 4096,
            paced: false,
        })
    }

    /// Set the peak amplitude of both channels
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the largest chunk size reported to the consumer
    pub fn with_max_chunk_len(mut self, max_chunk_len: usize) -> Self {
        self.max_chunk_len = max_chunk_len;
        self
    }

    /// Sleep for the real-time duration of every produced chunk
    pub fn paced(mut self) -> Self {
        self.paced = true;
        self
    }

    fn fill(&mut self, channel: usize, out: &mut [f32]) {
        let step = TAU * self.frequencies[channel] / self.sample_rate as f64;
        let mut phase = self.phases[channel];
        for sample in out.iter_mut() {
            *sample = self.amplitude * phase.sin() as f32;
            phase = (phase + step) % TAU;
        }
        self.phases[channel] = phase;
    }
}

impl AudioStream for ToneStream {
    fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.fill(0, left);
        self.fill(1, right);

        if self.paced {
            let secs = left.len() as f64 / self.sample_rate as f64;
            thread::sleep(Duration::from_secs_f64(secs));
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn max_chunk_len(&self) -> usize {
        self.max_chunk_len
    }
}
