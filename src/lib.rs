//! # wavelock
//!
//! Turns a continuous stereo audio stream into a steady 60 Hz sequence of
//! display frames: a waveform snippet and a spectrum snippet per channel,
//! phase-locked so a periodic signal stands still on screen instead of
//! scrolling.
//!
//! ## Features
//!
//! - **Wavelength lock**: the read cursor moves in whole periods of the dominant pitch
//! - **Pitch tracking**: Hann-windowed FFT peak with parabolic interpolation, folded into one octave
//! - **Cross-correlation sync**: optional refinement against the last few emitted frames
//! - **Frame pacing**: fixed 1/60 s cadence with backlog drop
//! - **Snapshot output**: lock-guarded frames readable from any thread
//!
//! ## Quick Start
//!
//! ```no_run
//! use wavelock::{AudioProcess, SyncOptions, SystemClock, ToneStream};
//!
//! // Any 48 kHz stereo source; here a paced sine generator
//! let stream = ToneStream::new(48_000, 220.0, 330.0)?.paced();
//! let mut process = AudioProcess::new(stream, SystemClock::new(), SyncOptions::default())?;
//!
//! let sink = process.sink();
//! let control = process.control();
//! let producer = std::thread::spawn(move || process.run());
//!
//! let frame = sink.snapshot();
//! println!("left wave[0] = {:.3}", frame.left().wave[0]);
//!
//! control.exit();
//! producer.join().unwrap();
//! # Ok::<(), wavelock::SyncError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Stream → Capture Buffer → Pacer → Reader Advance → Xcorr Sync → Spectrum → Output Sink
//! ```
//!
//! Buffer sizes are fixed constants in [`config`]; only [`SyncOptions`] change
//! at runtime.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;

// Re-export main types
pub use analysis::{AudioFrame, AudioProcess, ChannelFrame, OutputSink, ProcessControl};
pub use config::SyncOptions;
pub use error::SyncError;
pub use features::pitch::{RealFftTransform, SpectralAnalyzer, Transform};
pub use io::clock::{Clock, ManualClock, SystemClock};
pub use io::stream::{AudioStream, ToneStream};
pub use io::wav_stream::WavStream;
