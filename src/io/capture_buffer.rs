//! Per-channel circular store of raw captured samples

use super::ring::move_index;
use super::stream::AudioStream;
use crate::config::{CAPTURE_LEN, CHANNELS, CHUNK_LEN};

/// Circular capture buffer holding the last [`CAPTURE_LEN`] samples per channel
///
/// The write cursor always points at the next slot to be overwritten, which
/// is also the oldest sample still held. It only ever moves in whole chunks,
/// so a chunk never wraps around the end of the storage.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    channels: [Vec<f32>; CHANNELS],
    writer: usize,
}

impl CaptureBuffer {
    /// Create a zero-filled buffer with the writer at position 0
    pub fn new() -> Self {
        Self {
            channels: [vec![0.0; CAPTURE_LEN], vec![0.0; CAPTURE_LEN]],
            writer: 0,
        }
    }

    /// Pull one chunk from `stream` into the slots at the write cursor
    pub fn ingest<S: AudioStream + ?Sized>(&mut self, stream: &mut S) {
        let w = self.writer;
        let [left, right] = &mut self.channels;
        stream.next_chunk(
            &mut left[w..w + CHUNK_LEN],
            &mut right[w..w + CHUNK_LEN],
        );
        self.writer = move_index(w, CHUNK_LEN as isize, CAPTURE_LEN);
    }

    /// Position of the next slot to be overwritten
    pub fn writer(&self) -> usize {
        self.writer
    }

    /// Raw storage of one channel, in storage order (not time order)
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    /// Sample at `index`, wrapped into the buffer
    #[inline]
    pub fn sample(&self, channel: usize, index: usize) -> f32 {
        self.channels[channel][index % CAPTURE_LEN]
    }

    /// `i`-th sample of the half-rate view anchored at the write cursor
    ///
    /// `downsampled(ch, 0)` is the oldest sample held; successive indices
    /// skip every other sample and wrap around the storage.
    #[inline]
    pub fn downsampled(&self, channel: usize, i: usize) -> f32 {
        self.sample(channel, i * 2 + self.writer)
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_RATE;

    /// Emits an increasing counter on the left and its negation on the right
    struct CountingStream {
        next: f32,
    }

    impl AudioStream for CountingStream {
        fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]) {
            for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                *l = self.next;
                *r = -self.next;
                self.next += 1.0;
            }
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn max_chunk_len(&self) -> usize {
            CHUNK_LEN
        }
    }

    #[test]
    fn test_ingest_advances_writer_by_chunk() {
        let mut buffer = CaptureBuffer::new();
        let mut stream = CountingStream { next: 0.0 };

        buffer.ingest(&mut stream);
        assert_eq!(buffer.writer(), CHUNK_LEN);
        assert_eq!(buffer.sample(0, 0), 0.0);
        assert_eq!(buffer.sample(0, CHUNK_LEN - 1), (CHUNK_LEN - 1) as f32);
        assert_eq!(buffer.sample(1, 3), -3.0);
    }

    #[test]
    fn test_writer_wraps_after_full_cycle() {
        let mut buffer = CaptureBuffer::new();
        let mut stream = CountingStream { next: 0.0 };

        for _ in 0..CAPTURE_LEN / CHUNK_LEN {
            buffer.ingest(&mut stream);
        }
        assert_eq!(buffer.writer(), 0);

        buffer.ingest(&mut stream);
        // Oldest chunk was overwritten with the newest samples
        assert_eq!(buffer.sample(0, 0), CAPTURE_LEN as f32);
        assert_eq!(buffer.writer(), CHUNK_LEN);
    }

    #[test]
    fn test_downsampled_view_starts_at_oldest_sample() {
        let mut buffer = CaptureBuffer::new();
        let mut stream = CountingStream { next: 0.0 };

        // One extra chunk so the writer sits mid-buffer
        for _ in 0..CAPTURE_LEN / CHUNK_LEN + 1 {
            buffer.ingest(&mut stream);
        }

        let oldest = CHUNK_LEN as f32;
        assert_eq!(buffer.downsampled(0, 0), oldest);
        assert_eq!(buffer.downsampled(0, 1), oldest + 2.0);
        // Last element of the view is the second newest sample
        let newest = (CAPTURE_LEN + CHUNK_LEN - 1) as f32;
        assert_eq!(buffer.downsampled(0, CAPTURE_LEN / 2 - 1), newest - 1.0);
    }
}
