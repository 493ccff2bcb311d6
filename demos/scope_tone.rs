//! Drive the synchronizer from a paced test tone and print what a display
//! thread would see.
//!
//! ```text
//! RUST_LOG=debug cargo run --example scope_tone -- 220 330
//! ```

use std::thread;
use std::time::Duration;

use wavelock::config::SAMPLE_RATE;
use wavelock::{AudioProcess, SyncError, SyncOptions, SystemClock, ToneStream};

fn parse_hz(arg: Option<String>, default: f32) -> Result<f32, SyncError> {
    match arg {
        Some(s) => s
            .parse()
            .map_err(|_| SyncError::InvalidInput(format!("Not a frequency: {}", s))),
        None => Ok(default),
    }
}

fn main() -> Result<(), SyncError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let left_hz = parse_hz(args.next(), 220.0)?;
    let right_hz = parse_hz(args.next(), 330.0)?;

    let stream = ToneStream::new(SAMPLE_RATE, left_hz, right_hz)?.paced();
    let mut process = AudioProcess::new(stream, SystemClock::new(), SyncOptions::default())?;
    let sink = process.sink();
    let control = process.control();

    let producer = thread::spawn(move || process.run());

    for _ in 0..10 {
        thread::sleep(Duration::from_millis(200));
        let frame = sink.snapshot();
        let peak = |wave: &[f32]| wave.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        println!(
            "frame {:?}: left peak {:.3} first {:+.3} | right peak {:.3} first {:+.3}",
            frame.frame_id,
            peak(&frame.left().wave),
            frame.left().wave[0],
            peak(&frame.right().wave),
            frame.right().wave[0],
        );
    }

    control.exit();
    if producer.join().is_err() {
        log::error!("Audio thread panicked");
    }
    Ok(())
}
