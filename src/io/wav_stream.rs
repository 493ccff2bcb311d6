//! Looping WAV file source

use super::stream::AudioStream;
use crate::error::SyncError;
use std::io::Read;
use std::path::Path;

/// Audio stream backed by a decoded WAV file
///
/// The whole file is decoded up front and played in a loop. Mono files feed
/// both channels; channels beyond the first two are dropped.
#[derive(Debug, Clone)]
pub struct WavStream {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
    position: usize,
}

impl WavStream {
    /// Decode the WAV file at `path`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DecodingError` if the file cannot be read and
    /// `SyncError::InvalidInput` if it holds no samples.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let reader = hound::WavReader::open(path.as_ref())?;
        log::debug!("Opened WAV source {}", path.as_ref().display());
        Self::from_wav(reader)
    }

    /// Decode WAV data from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SyncError> {
        Self::from_wav(hound::WavReader::new(reader)?)
    }

    fn from_wav<R: Read>(mut reader: hound::WavReader<R>) -> Result<Self, SyncError> {
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let (left, right): (Vec<f32>, Vec<f32>) = samples
            .chunks_exact(channels)
            .map(|frame| (frame[0], frame[if channels > 1 { 1 } else { 0 }]))
            .unzip();

        if left.is_empty() {
            return Err(SyncError::InvalidInput("WAV file holds no samples".to_string()));
        }

        log::debug!(
            "Decoded {} frames ({} channels) at {} Hz",
            left.len(),
            channels,
            spec.sample_rate
        );

        Ok(Self {
            left,
            right,
            sample_rate: spec.sample_rate,
            position: 0,
        })
    }

    /// Number of frames in the decoded file
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Always false: construction rejects empty files
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

impl AudioStream for WavStream {
    fn next_chunk(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = self.left[self.position];
            *r = self.right[self.position];
            self.position = (self.position + 1) % self.left.len();
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn max_chunk_len(&self) -> usize {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_stereo_int_is_split_and_scaled() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[16384, -16384, 0, 8192]);
        let mut stream = WavStream::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.sample_rate(), 48_000);

        let mut left = [0.0f32; 3];
        let mut right = [0.0f32; 3];
        stream.next_chunk(&mut left, &mut right);

        assert!((left[0] - 0.5).abs() < 1e-6);
        assert!((right[0] + 0.5).abs() < 1e-6);
        assert_eq!(left[1], 0.0);
        assert!((right[1] - 0.25).abs() < 1e-6);
        // Loops back to the first frame
        assert!((left[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mono_feeds_both_channels() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[1000, 2000, 3000]);
        let mut stream = WavStream::from_reader(Cursor::new(bytes)).unwrap();

        let mut left = [0.0f32; 3];
        let mut right = [0.0f32; 3];
        stream.next_chunk(&mut left, &mut right);
        assert_eq!(left, right);
        assert_eq!(stream.sample_rate(), 44_100);
    }

    #[test]
    fn test_empty_wav_is_rejected() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[]);
        assert!(WavStream::from_reader(Cursor::new(bytes)).is_err());
    }

    #[test]
    fn test_garbage_is_decoding_error() {
        let result = WavStream::from_reader(Cursor::new(vec![1u8, 2, 3, 4]));
        assert!(matches!(result, Err(SyncError::DecodingError(_))));
    }
}
