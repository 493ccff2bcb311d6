//! Modular index arithmetic over a fixed-capacity circular buffer
//!
//! All positions are in `[0, capacity)`. Every function here is closed over
//! that range, which is what keeps the capture buffer reads in bounds.

/// Move `p` around a circular buffer by `delta` (either direction)
///
/// The result is always in `[0, capacity)`, including when `|delta|`
/// exceeds `capacity`.
///
/// # Example
///
/// ```
/// use wavelock::io::ring::move_index;
///
/// assert_eq!(move_index(8000, 500, 8192), 308);
/// assert_eq!(move_index(10, -20, 8192), 8182);
/// ```
#[inline]
pub fn move_index(p: usize, delta: isize, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    let p = p % capacity;
    // Forward step in [0, capacity), so the sum never leaves usize range
    let step = delta.rem_euclid(capacity as isize) as usize;
    if p >= capacity - step {
        p - (capacity - step)
    } else {
        p + step
    }
}

/// Number of steps walking forward from `from` until reaching `to`
///
/// Zero when `from == to`. For `a != b`,
/// `dist_forward(a, b, c) + dist_forward(b, a, c) == c`.
#[inline]
pub fn dist_forward(from: usize, to: usize, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (to as isize - from as isize).rem_euclid(capacity as isize) as usize
}

/// Number of steps walking backward from `from` until reaching `to`
#[inline]
pub fn dist_backward(from: usize, to: usize, capacity: usize) -> usize {
    dist_forward(to, from, capacity)
}
