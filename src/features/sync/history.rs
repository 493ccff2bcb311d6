//! Ring of recently emitted waveform frames

use crate::config::{HISTORY_FRAMES, VISUALIZER_LEN};

/// Last [`HISTORY_FRAMES`] emitted waveforms of one channel
///
/// Frame `n` is stored in slot `n % HISTORY_FRAMES`, overwriting the frame
/// emitted `HISTORY_FRAMES` cycles earlier.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    frames: Vec<Vec<f32>>,
}

impl HistoryRing {
    /// Create a ring of zeroed frames
    pub fn new() -> Self {
        Self {
            frames: vec![vec![0.0; VISUALIZER_LEN]; HISTORY_FRAMES],
        }
    }

    /// Store the waveform emitted as frame `frame_id`
    pub fn record(&mut self, frame_id: u64, wave: &[f32]) {
        let slot = (frame_id % HISTORY_FRAMES as u64) as usize;
        self.frames[slot].copy_from_slice(wave);
    }

    /// Frame held in `slot`
    pub fn frame(&self, slot: usize) -> &[f32] {
        &self.frames[slot]
    }

    /// All stored frames, in slot order
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.frames.iter().map(Vec::as_slice)
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}
