//! Harmonic (octave) folding of the locked frequency

use crate::config::DEFAULT_PITCH;

/// Rescale `freq` by a power of two so it lands in `(thres / 2, thres]`
///
/// Returns the largest `freq * 2^k` (integer `k`) not exceeding `thres`.
/// Non-finite, zero, negative or subnormal results fall back to
/// [`DEFAULT_PITCH`].
///
/// # Example
///
/// ```
/// use wavelock::features::pitch::harmonic::harmonic_less_than;
///
/// assert_eq!(harmonic_less_than(220.0, 80.0), 55.0);
/// assert_eq!(harmonic_less_than(30.0, 80.0), 60.0);
/// ```
pub fn harmonic_less_than(freq: f32, thres: f32) -> f32 {
    let octaves = (thres.log2() - freq.log2()).floor();
    let folded = freq * octaves.exp2();
    if folded.is_normal() {
        folded
    } else {
        DEFAULT_PITCH
    }
}
