//! Reader advance in whole wavelengths
//!
//! The wavelength of a periodic signal is `sample_rate / frequency` samples.
//! Moving the read cursor only by whole multiples of it makes consecutive
//! frames of a quasi-periodic waveform start at the same phase, so the
//! displayed wave stands still instead of scrolling.

use crate::config::{SAMPLE_RATE, VISUALIZER_LEN};
use crate::io::ring::{dist_forward, move_index};

/// Wavelength of `freq` in samples, rounded and clamped to `[1, capacity - 1]`
pub fn wavelength(freq: f32, capacity: usize) -> usize {
    let samples = (SAMPLE_RATE as f32 / freq + 0.5) as usize;
    samples.clamp(1, capacity.saturating_sub(1).max(1))
}

/// Advance `reader` by one wavelength of `freq`, then keep stepping until the
/// output window no longer runs into the write cursor
///
/// On return `dist_forward(reader, writer, capacity) >= VISUALIZER_LEN`.
/// Safety of the window takes priority over stepping exactly once.
///
/// # Arguments
///
/// * `writer` - Write cursor of the capture buffer
/// * `reader` - Current read cursor
/// * `freq` - Locked frequency in Hz
/// * `capacity` - Capture buffer capacity (must exceed `VISUALIZER_LEN`)
pub fn advance_reader(writer: usize, reader: usize, freq: f32, capacity: usize) -> usize {
    let step = wavelength(freq, capacity) as isize;

    let mut r = move_index(reader, step, capacity);
    // Skip past the discontinuity at the writer
    while dist_forward(r, writer, capacity) < VISUALIZER_LEN {
        r = move_index(r, step, capacity);
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CAPTURE_LEN, CHUNK_LEN, DEFAULT_PITCH};

    #[test]
    fn test_wavelength() {
        assert_eq!(wavelength(60.0, CAPTURE_LEN), 800);
        assert_eq!(wavelength(55.0, CAPTURE_LEN), 873);
        // Degenerate frequencies cannot produce a zero or full-circle step
        assert_eq!(wavelength(f32::INFINITY, CAPTURE_LEN), 1);
        assert_eq!(wavelength(0.0, CAPTURE_LEN), CAPTURE_LEN - 1);
        assert_eq!(wavelength(1.0, CAPTURE_LEN), CAPTURE_LEN - 1);
    }

    #[test]
    fn test_single_step_when_far_from_writer() {
        let writer = 4096;
        let reader = 0;
        let r = advance_reader(writer, reader, DEFAULT_PITCH, CAPTURE_LEN);
        assert_eq!(r, 800);
    }

    #[test]
    fn test_skips_past_discontinuity() {
        // One 800-sample step from 2500 lands at 3300, only 796 short of the writer
        let writer = 4096;
        let r = advance_reader(writer, 2500, DEFAULT_PITCH, CAPTURE_LEN);
        assert_eq!(r, 4100);
        assert!(dist_forward(r, writer, CAPTURE_LEN) >= VISUALIZER_LEN);
    }

    #[test]
    fn test_reader_always_clear_of_writer() {
        for freq in [40.1f32, 47.0, 55.0, 60.0, 63.3, 79.9, 80.0, 93.75] {
            for writer in (0..CAPTURE_LEN).step_by(CHUNK_LEN) {
                for reader in (0..CAPTURE_LEN).step_by(97) {
                    let r = advance_reader(writer, reader, freq, CAPTURE_LEN);
                    assert!(r < CAPTURE_LEN);
                    assert!(
                        dist_forward(r, writer, CAPTURE_LEN) >= VISUALIZER_LEN,
                        "freq={} writer={} reader={} -> {}",
                        freq,
                        writer,
                        reader,
                        r
                    );
                }
            }
        }
    }

    #[test]
    fn test_moves_in_whole_wavelengths() {
        let capacity = CAPTURE_LEN;
        let step = wavelength(55.0, capacity);
        let writer = 1024;
        let reader = 7000;
        let r = advance_reader(writer, reader, 55.0, capacity);
        assert_eq!(dist_forward(reader, r, capacity) % step, 0);
    }
}
