//! Frame production
//!
//! Pacing, the shared output sink, lifecycle control and the step cycle that
//! ties capture, pitch tracking and synchronization together.

pub mod control;
pub mod pacer;
pub mod process;
pub mod sink;

pub use control::ProcessControl;
pub use pacer::FramePacer;
pub use process::AudioProcess;
pub use sink::{AudioFrame, ChannelFrame, OutputSink};
