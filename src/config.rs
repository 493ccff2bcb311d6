//! Fixed buffer layout and runtime options
//!
//! Buffer sizes are compile-time constants chosen for one latency/resolution
//! tradeoff; every piece of index arithmetic in the crate assumes they hold
//! exactly. Only [`SyncOptions`] can change at runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sample rate the audio stream must deliver (Hz)
pub const SAMPLE_RATE: u32 = 48_000;

/// Sample rate of the downsampled spectral analysis window (Hz)
pub const FFT_SAMPLE_RATE: u32 = SAMPLE_RATE / 2;

/// Samples per capture chunk, per channel
pub const CHUNK_LEN: usize = 512;

/// Number of chunks held by the capture buffer
pub const CHUNK_COUNT: usize = 16;

/// Capture buffer capacity, per channel
pub const CAPTURE_LEN: usize = CHUNK_LEN * CHUNK_COUNT;

/// Length of the spectral analysis window (every other capture sample)
pub const FFT_LEN: usize = CAPTURE_LEN / 2;

/// Number of samples in each emitted waveform / spectrum array
pub const VISUALIZER_LEN: usize = 1024;

/// Number of audio channels carried through the core
pub const CHANNELS: usize = 2;

// Cross-correlation sync.
// Cost per frame and channel is
// SEARCH_RANGE / SEARCH_GRANULARITY * HISTORY_FRAMES * VISUALIZER_LEN multiply-adds.

/// Number of previously emitted frames the synchronizer compares against
pub const HISTORY_FRAMES: usize = 7;

/// Width of the window of read positions searched around the advanced cursor
pub const SEARCH_RANGE: usize = 350;

/// Stride between searched read positions
pub const SEARCH_GRANULARITY: usize = 3;

// Pitch lock.

/// Number of low bins scanned for the dominant peak (about 5.9-586 Hz)
pub const PEAK_SEARCH_BINS: usize = 100;

/// Locked frequency used when the estimate is unusable or lock is disabled (Hz)
pub const DEFAULT_PITCH: f32 = 60.0;

/// Upper edge of the octave band the locked frequency is folded into (Hz)
pub const HARMONIC_THRESHOLD: f32 = 80.0;

/// Floor applied to the interpolated peak frequency (Hz)
pub const MIN_FREQUENCY: f32 = 10.0;

/// Denominator guard for parabolic peak interpolation
pub const PARABOLIC_EPSILON: f32 = 0.001;

// Output normalization.

/// Scale applied to envelope-normalized waveform samples
pub const WAVE_SCALE: f32 = 0.66;

/// Added to the channel envelope before it is used as a divisor
pub const ENVELOPE_EPSILON: f32 = 0.0001;

/// Weight with which the envelope moves toward the latest frame peak
pub const ENVELOPE_WEIGHT: f32 = 0.5;

// Pacing.

/// Cadence of processing cycles (60 Hz)
pub const FRAME_PERIOD: Duration = Duration::from_nanos(16_666_667);

/// Drift past the target after which pending cycles are dropped
pub const BACKLOG_LIMIT: Duration = Duration::from_millis(60);

/// How far behind `now` the target is placed after a backlog drop
pub const BACKLOG_SNAP: Duration = Duration::from_millis(1);

/// Sleep of the run loop while the process is paused
pub const PAUSE_POLL: Duration = Duration::from_millis(500);

/// Runtime options of the synchronization core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Lock the reader to the dominant pitch (default: true)
    ///
    /// When disabled the reader free-runs at [`DEFAULT_PITCH`].
    pub fft_sync: bool,

    /// Refine the reader by cross-correlating against recent frames (default: true)
    pub xcorr_sync: bool,

    /// Weight of the new frame when blending into the output waveform (default: 0.8)
    /// 1.0 = no smoothing, values near 0.0 = heavy smoothing
    pub wave_smooth: f32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            fft_sync: true,
            xcorr_sync: true,
            wave_smooth: 0.8,
        }
    }
}

impl SyncOptions {
    /// Returns a copy with `wave_smooth` forced into `[0, 1]`
    ///
    /// A non-finite weight is replaced by the default.
    pub fn normalized(mut self) -> Self {
        self.wave_smooth = if self.wave_smooth.is_finite() {
            self.wave_smooth.clamp(0.0, 1.0)
        } else {
            Self::default().wave_smooth
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(CAPTURE_LEN, 8192);
        assert_eq!(FFT_LEN, 4096);
        assert_eq!(CAPTURE_LEN % CHUNK_LEN, 0);
        // The output window plus one chunk must fit behind the writer
        assert!(VISUALIZER_LEN + CHUNK_LEN < CAPTURE_LEN);
        assert!(PEAK_SEARCH_BINS + 1 < FFT_LEN / 2 + 1);
    }

    #[test]
    fn test_normalized_clamps_smoothing() {
        let options = SyncOptions {
            wave_smooth: 3.0,
            ..SyncOptions::default()
        };
        assert_eq!(options.normalized().wave_smooth, 1.0);

        let options = SyncOptions {
            wave_smooth: -0.5,
            ..SyncOptions::default()
        };
        assert_eq!(options.normalized().wave_smooth, 0.0);

        let options = SyncOptions {
            wave_smooth: f32::NAN,
            ..SyncOptions::default()
        };
        assert_eq!(options.normalized().wave_smooth, 0.8);
    }
}
