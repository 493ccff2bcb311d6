//! Pitch tracking
//!
//! This module turns the capture buffer into a magnitude spectrum and a
//! locked frequency:
//! - Hann analysis window
//! - Forward real transform capability (`realfft` by default)
//! - Peak search with parabolic interpolation
//! - Harmonic folding into a fixed octave band

pub mod analyzer;
pub mod harmonic;
pub mod peak;
pub mod transform;
pub mod window;

pub use analyzer::SpectralAnalyzer;
pub use transform::{RealFftTransform, Transform};
