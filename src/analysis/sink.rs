//! Lock-guarded output arrays shared with consumers
//!
//! The sink is the only state shared across threads. The producer holds the
//! lock for exactly one emission loop, so a reader sees either the previous
//! frame or the current one, never a mix.

use crate::config::{CHANNELS, VISUALIZER_LEN};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Display data of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
    /// Normalized, smoothed waveform starting at the read cursor
    pub wave: Vec<f32>,

    /// Spectrum magnitudes of the lowest [`VISUALIZER_LEN`] bins
    pub spectrum: Vec<f32>,
}

impl ChannelFrame {
    fn zeroed() -> Self {
        Self {
            wave: vec![0.0; VISUALIZER_LEN],
            spectrum: vec![0.0; VISUALIZER_LEN],
        }
    }
}

/// Complete output of one processing cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFrame {
    /// Id of the cycle that wrote this frame, `None` before the first one
    pub frame_id: Option<u64>,

    /// Left and right channel data
    pub channels: [ChannelFrame; CHANNELS],
}

impl AudioFrame {
    /// All-zero frame, as exposed before the first emission
    pub fn zeroed() -> Self {
        Self {
            frame_id: None,
            channels: [ChannelFrame::zeroed(), ChannelFrame::zeroed()],
        }
    }

    /// Left channel
    pub fn left(&self) -> &ChannelFrame {
        &self.channels[0]
    }

    /// Right channel
    pub fn right(&self) -> &ChannelFrame {
        &self.channels[1]
    }
}

impl Default for AudioFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Handoff point between the producer and any number of readers
#[derive(Debug, Default)]
pub struct OutputSink {
    frame: Mutex<AudioFrame>,
}

impl OutputSink {
    /// Create a sink holding a zeroed frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the frame under the lock
    pub fn write<R>(&self, f: impl FnOnce(&mut AudioFrame) -> R) -> R {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut frame)
    }

    /// Inspect the frame under the lock without copying it
    pub fn read<R>(&self, f: impl FnOnce(&AudioFrame) -> R) -> R {
        let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        f(&frame)
    }

    /// Owned copy of the latest frame
    pub fn snapshot(&self) -> AudioFrame {
        self.read(AudioFrame::clone)
    }
}
