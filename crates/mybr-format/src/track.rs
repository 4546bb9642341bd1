//! Track metadata and encoder-side track sources.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

/// Bytes per sample per channel. The container stores 16-bit PCM only.
pub const SAMPLE_WIDTH_BYTES: u8 = 2;

/// Wire metadata for one track, as stored in its header.
///
/// Per-track header layout (little-endian):
/// - `channels`: u8
/// - `sample_rate`: u32
/// - `num_samples`: u32 (sample frames, not bytes)
/// - `name_length`: u8
/// - `name`: UTF-8 bytes
/// - `data_offset`: u32 (absolute payload start)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track name, at most 255 UTF-8 bytes
    pub name: String,
    /// Channel count (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of sample frames (one sample per channel per frame)
    pub num_samples: u32,
}

impl TrackInfo {
    /// Create track metadata.
    pub fn new(name: impl Into<String>, channels: u8, sample_rate: u32, num_samples: u32) -> Self {
        Self {
            name: name.into(),
            channels,
            sample_rate,
            num_samples,
        }
    }

    /// Raw PCM byte length of this track: `num_samples * channels * 2`.
    pub fn pcm_len(&self) -> u64 {
        self.num_samples as u64 * self.channels as u64 * SAMPLE_WIDTH_BYTES as u64
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / self.sample_rate as f64
    }
}

/// PCM bytes for one track queued for encoding.
pub enum TrackPayload {
    /// Interleaved 16-bit little-endian samples already in memory.
    Buffer(Vec<u8>),
    /// Streaming source; must yield exactly the track's PCM byte length.
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for TrackPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackPayload::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            TrackPayload::Reader(_) => write!(f, "Reader(..)"),
        }
    }
}

/// One audio stream queued for encoding: wire metadata plus its PCM bytes.
///
/// `sample_width_bytes` describes the source stream and must be 2; the field
/// exists so callers holding wider PCM get a validation error instead of a
/// corrupt layout.
#[derive(Debug)]
pub struct TrackSource {
    pub info: TrackInfo,
    pub sample_width_bytes: u8,
    pub payload: TrackPayload,
}

impl TrackSource {
    /// Track source from in-memory 16-bit PCM bytes.
    pub fn from_pcm(info: TrackInfo, pcm: Vec<u8>) -> Self {
        Self {
            info,
            sample_width_bytes: SAMPLE_WIDTH_BYTES,
            payload: TrackPayload::Buffer(pcm),
        }
    }

    /// Track source streaming its 16-bit PCM from a reader.
    pub fn from_reader(info: TrackInfo, reader: Box<dyn Read + Send>) -> Self {
        Self {
            info,
            sample_width_bytes: SAMPLE_WIDTH_BYTES,
            payload: TrackPayload::Reader(reader),
        }
    }
}
