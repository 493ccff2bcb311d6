//! Signal analysis modules
//!
//! - Pitch tracking (spectrum, peak interpolation, harmonic fold)
//! - Read cursor synchronization (wavelength lock, cross-correlation)

pub mod pitch;
pub mod sync;
