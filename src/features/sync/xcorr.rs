//! Cross-correlation sync against recently emitted frames
//!
//! Wavelength stepping alone inherits every error of the pitch estimate. This
//! pass searches a small neighbourhood of the advanced cursor for the read
//! position whose window best continues the frames already shown.
//!
//! # Algorithm
//!
//! 1. Start `SEARCH_RANGE / 2` samples behind the advanced cursor
//! 2. Step forward `SEARCH_GRANULARITY` samples at a time, for
//!    `SEARCH_RANGE / SEARCH_GRANULARITY` candidates
//! 3. Score each candidate by summing, over every history frame, the dot
//!    product of the candidate window with the history frame read backwards
//! 4. Keep the best-scoring candidate whose window stays clear of the writer
//!
//! Cost is `SEARCH_RANGE / SEARCH_GRANULARITY * HISTORY_FRAMES * VISUALIZER_LEN`
//! multiply-adds per channel and frame.

use super::history::HistoryRing;
use crate::config::{ENVELOPE_EPSILON, SEARCH_GRANULARITY, VISUALIZER_LEN};
use crate::io::ring::{dist_forward, move_index};

/// Dot product of a window of `circular` with `frame` reversed
///
/// Reads `frame.len()` samples of `circular` starting at `offset` (wrapping),
/// divides them by `scale`, and pairs sample `i` with `frame[len - 1 - i]`.
/// `circular` must be at least as long as `frame`.
pub fn reverse_dot_prod(circular: &[f32], frame: &[f32], offset: usize, scale: f32) -> f32 {
    let (tail, head) = circular.split_at(offset % circular.len());
    let sum: f32 = head
        .iter()
        .chain(tail)
        .zip(frame.iter().rev())
        .map(|(a, b)| a * b)
        .sum();
    sum / scale
}

/// Search around `reader` for the position most similar to the history
///
/// # Arguments
///
/// * `writer` - Write cursor of the capture buffer
/// * `reader` - Wavelength-advanced read cursor
/// * `range` - Width of the searched neighbourhood, centered on `reader`
/// * `history` - Recently emitted frames of this channel
/// * `samples` - Capture buffer storage of this channel
/// * `envelope` - Channel envelope the samples are normalized by
///
/// # Returns
///
/// The winning read cursor, `dist_forward(reader - range/2, result) < range`.
/// If every candidate would run into the writer, `reader` is returned as is.
pub fn cross_correlation_sync(
    writer: usize,
    reader: usize,
    range: usize,
    history: &HistoryRing,
    samples: &[f32],
    envelope: f32,
) -> usize {
    let capacity = samples.len();
    let scale = envelope + ENVELOPE_EPSILON;

    let mut r = move_index(reader, -((range / 2) as isize), capacity);
    let mut best: Option<(usize, f32)> = None;

    for _ in 0..range / SEARCH_GRANULARITY {
        if dist_forward(r, writer, capacity) >= VISUALIZER_LEN {
            let score: f32 = history
                .frames()
                .map(|frame| reverse_dot_prod(samples, frame, r, scale))
                .sum();
            if best.map_or(true, |(_, max)| score > max) {
                best = Some((r, score));
            }
        }
        r = move_index(r, SEARCH_GRANULARITY as isize, capacity);
    }

    best.map_or(reader, |(r, _)| r)
}
