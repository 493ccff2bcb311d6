//! The step cycle
//!
//! One call to [`AudioProcess::step`] ingests a capture chunk and, when the
//! pacer says a frame is due, runs a full processing cycle:
//!
//! ```text
//! ingest → pace → advance readers → xcorr sync → spectrum → emit (locked) → history → envelope/pitch
//! ```
//!
//! Each reader advances with the frequency locked in the previous cycle; the
//! spectrum of this cycle supplies the frequency for the next one.

use super::control::ProcessControl;
use super::pacer::FramePacer;
use super::sink::{AudioFrame, OutputSink};
use crate::config::{
    SyncOptions, CAPTURE_LEN, CHANNELS, CHUNK_LEN, DEFAULT_PITCH, ENVELOPE_EPSILON,
    ENVELOPE_WEIGHT, PAUSE_POLL, SAMPLE_RATE, SEARCH_RANGE, VISUALIZER_LEN, WAVE_SCALE,
};
use crate::error::SyncError;
use crate::features::pitch::{RealFftTransform, SpectralAnalyzer, Transform};
use crate::features::sync::{advance_reader, cross_correlation_sync, HistoryRing};
use crate::io::capture_buffer::CaptureBuffer;
use crate::io::clock::Clock;
use crate::io::stream::AudioStream;
use std::sync::Arc;
use std::thread;

/// Exponential blend: `(1 - m) * x + m * y`
#[inline]
fn mix(x: f32, y: f32, m: f32) -> f32 {
    (1.0 - m) * x + m * y
}

/// Per-channel state carried from one cycle to the next
#[derive(Debug, Clone)]
struct ChannelState {
    reader: usize,
    /// Locked frequency used by the next reader advance
    freq: f32,
    /// Smoothed peak amplitude, lags the signal by one frame
    envelope: f32,
    /// Producer-side copy of the last emitted waveform
    wave: Vec<f32>,
    history: HistoryRing,
}

impl ChannelState {
    fn new() -> Self {
        Self {
            reader: 0,
            freq: DEFAULT_PITCH,
            envelope: 1.0,
            wave: vec![0.0; VISUALIZER_LEN],
            history: HistoryRing::new(),
        }
    }
}

/// Check that `stream` can honor the fixed buffer contract
fn validate_stream<S: AudioStream + ?Sized>(stream: &S) -> Result<(), SyncError> {
    if stream.sample_rate() != SAMPLE_RATE {
        return Err(SyncError::ConfigurationMismatch(format!(
            "Expected {} Hz audio but the stream produces {} Hz",
            SAMPLE_RATE,
            stream.sample_rate()
        )));
    }
    if stream.max_chunk_len() < CHUNK_LEN {
        return Err(SyncError::ConfigurationMismatch(format!(
            "Need at least {} frames per chunk but the stream only provides {}",
            CHUNK_LEN,
            stream.max_chunk_len()
        )));
    }
    Ok(())
}

/// Synchronization core: turns a live stream into paced, phase-stable frames
///
/// Owned and driven by a single producer thread. Consumers get the output
/// through [`AudioProcess::sink`] and steer the process through
/// [`AudioProcess::control`].
pub struct AudioProcess<C: Clock, S: AudioStream, T: Transform = RealFftTransform> {
    stream: S,
    clock: C,
    control: Arc<ProcessControl>,
    sink: Arc<OutputSink>,
    pacer: FramePacer,
    capture: CaptureBuffer,
    analyzer: SpectralAnalyzer<T>,
    channels: [ChannelState; CHANNELS],
}

impl<C: Clock, S: AudioStream> AudioProcess<C, S, RealFftTransform> {
    /// Create a process reading from `stream`, paced by `clock`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConfigurationMismatch` if the stream does not
    /// deliver [`SAMPLE_RATE`] audio in chunks of at least [`CHUNK_LEN`].
    /// No cycle can run on a process that failed validation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wavelock::{AudioProcess, SyncOptions, SystemClock, ToneStream};
    ///
    /// let stream = ToneStream::new(48_000, 110.0, 220.0)?.paced();
    /// let mut process = AudioProcess::new(stream, SystemClock::new(), SyncOptions::default())?;
    /// let sink = process.sink();
    ///
    /// std::thread::spawn(move || process.run());
    /// let frame = sink.snapshot();
    /// # Ok::<(), wavelock::SyncError>(())
    /// ```
    pub fn new(stream: S, clock: C, options: SyncOptions) -> Result<Self, SyncError> {
        Self::with_analyzer(stream, clock, options, SpectralAnalyzer::new())
    }
}

impl<C: Clock, S: AudioStream, T: Transform> AudioProcess<C, S, T> {
    /// Create a process with a caller-built spectral analyzer
    ///
    /// # Errors
    ///
    /// Same as [`AudioProcess::new`].
    pub fn with_analyzer(
        stream: S,
        clock: C,
        options: SyncOptions,
        analyzer: SpectralAnalyzer<T>,
    ) -> Result<Self, SyncError> {
        validate_stream(&stream)?;

        log::info!(
            "Audio process ready: {} Hz, {} x {} sample capture, {} sample frames",
            SAMPLE_RATE,
            CAPTURE_LEN / CHUNK_LEN,
            CHUNK_LEN,
            VISUALIZER_LEN
        );

        let start = clock.now();
        Ok(Self {
            stream,
            clock,
            control: Arc::new(ProcessControl::new(options)),
            sink: Arc::new(OutputSink::new()),
            pacer: FramePacer::new(start),
            capture: CaptureBuffer::new(),
            analyzer,
            channels: [ChannelState::new(), ChannelState::new()],
        })
    }

    /// Ingest one chunk and run a processing cycle if one is due
    ///
    /// Returns the id of the emitted frame, or `None` if the pacer held the
    /// cycle back.
    pub fn step(&mut self) -> Option<u64> {
        self.capture.ingest(&mut self.stream);

        let now = self.clock.now();
        if !self.pacer.poll(now) {
            return None;
        }

        let options = self.control.options();
        let writer = self.capture.writer();
        let frame_id = self.pacer.frame_id();

        for (channel, state) in self.channels.iter_mut().enumerate() {
            state.reader = advance_reader(writer, state.reader, state.freq, CAPTURE_LEN);
            if options.xcorr_sync {
                state.reader = cross_correlation_sync(
                    writer,
                    state.reader,
                    SEARCH_RANGE,
                    &state.history,
                    self.capture.channel(channel),
                    state.envelope,
                );
            }
        }

        let envelopes = [self.channels[0].envelope, self.channels[1].envelope];
        self.analyzer.analyze(&self.capture, &envelopes);

        let peaks = self.emit(frame_id, options.wave_smooth);

        if options.xcorr_sync {
            for state in self.channels.iter_mut() {
                state.history.record(frame_id, &state.wave);
            }
        }

        for (channel, state) in self.channels.iter_mut().enumerate() {
            // Rescale with a one-frame delay so it is less visible
            state.envelope = mix(state.envelope, peaks[channel], ENVELOPE_WEIGHT);
            state.freq = self.analyzer.locked_frequency(channel, options.fft_sync);
        }

        log::trace!(
            "Frame {}: writer={} readers=({}, {}) locked=({:.2}, {:.2}) Hz",
            frame_id,
            writer,
            self.channels[0].reader,
            self.channels[1].reader,
            self.channels[0].freq,
            self.channels[1].freq
        );

        self.pacer.complete();
        Some(frame_id)
    }

    /// Blend the new waveforms and publish the frame; returns the peak
    /// amplitude per channel
    ///
    /// The sink lock is held only for the copy into the shared frame.
    fn emit(&mut self, frame_id: u64, smooth: f32) -> [f32; CHANNELS] {
        let mut peaks = [f32::NEG_INFINITY; CHANNELS];
        for (c, state) in self.channels.iter_mut().enumerate() {
            let gain = WAVE_SCALE / (state.envelope + ENVELOPE_EPSILON);
            for (i, wave) in state.wave.iter_mut().enumerate() {
                let sample = self.capture.sample(c, state.reader + i);
                peaks[c] = peaks[c].max(sample.abs());
                *wave = mix(*wave, sample * gain, smooth);
            }
        }

        let analyzer = &self.analyzer;
        let channels = &self.channels;
        self.sink.write(|frame: &mut AudioFrame| {
            for (c, out) in frame.channels.iter_mut().enumerate() {
                out.wave.copy_from_slice(&channels[c].wave);
                for (i, magnitude) in out.spectrum.iter_mut().enumerate() {
                    *magnitude = analyzer.magnitude(c, i);
                }
            }
            frame.frame_id = Some(frame_id);
        });
        peaks
    }

    /// Step until [`ProcessControl::exit`] is called
    ///
    /// While paused the loop sleeps [`PAUSE_POLL`] between checks. Blocking
    /// for audio is left to the stream.
    pub fn run(&mut self) {
        log::debug!("Audio process loop started");
        while !self.control.should_exit() {
            if self.control.is_running() {
                self.step();
            } else {
                thread::sleep(PAUSE_POLL);
            }
        }
        log::debug!(
            "Audio process loop stopped after {} frames ({} backlog drops)",
            self.pacer.frame_id(),
            self.pacer.backlog_drops()
        );
    }

    /// Shared handle to the output frames
    pub fn sink(&self) -> Arc<OutputSink> {
        Arc::clone(&self.sink)
    }

    /// Shared handle for pause/resume/exit and option changes
    pub fn control(&self) -> Arc<ProcessControl> {
        Arc::clone(&self.control)
    }

    /// Replace the runtime options (same as going through [`AudioProcess::control`])
    pub fn set_options(&self, options: SyncOptions) {
        self.control.set_options(options);
    }

    /// Number of frames emitted so far
    pub fn frame_count(&self) -> u64 {
        self.pacer.frame_id()
    }

    /// Number of times the pacer dropped its backlog
    pub fn backlog_drops(&self) -> u64 {
        self.pacer.backlog_drops()
    }

    /// Frequency `channel` will advance by in the next cycle (Hz)
    pub fn locked_frequency(&self, channel: usize) -> f32 {
        self.channels[channel].freq
    }

    /// Read cursor of `channel`
    pub fn reader(&self, channel: usize) -> usize {
        self.channels[channel].reader
    }

    /// Write cursor of the capture buffer
    pub fn writer(&self) -> usize {
        self.capture.writer()
    }

    /// Current envelope of `channel`
    pub fn envelope(&self, channel: usize) -> f32 {
        self.channels[channel].envelope
    }
}
