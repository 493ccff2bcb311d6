//! Analysis window

use std::f32::consts::PI;

/// Periodic Hann window of length `len` (`sin²(πi/len)`)
///
/// Periodic rather than symmetric: the last coefficient is not zero, which is
/// what a window meant to be slid over a stream wants.
pub fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (1.0 - (2.0 * PI * i as f32 / len as f32).cos()) / 2.0)
        .collect()
}
