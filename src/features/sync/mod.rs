//! Read cursor synchronization
//!
//! Decides where in the capture buffer each emitted frame starts:
//! - Wavelength lock (whole-period reader advance)
//! - History ring of emitted frames
//! - Cross-correlation refinement against that history

pub mod history;
pub mod wavelength;
pub mod xcorr;

pub use history::HistoryRing;
pub use wavelength::advance_reader;
pub use xcorr::cross_correlation_sync;
