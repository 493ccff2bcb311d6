//! Audio input plumbing
//!
//! Stream and clock capabilities, the circular capture buffer and the index
//! arithmetic it is addressed with.

pub mod capture_buffer;
pub mod clock;
pub mod ring;
pub mod stream;
pub mod wav_stream;
