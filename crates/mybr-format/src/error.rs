//! Error types for the MYBR format crate.

use thiserror::Error;

use crate::loops::LoopViolation;

/// Errors that can occur when encoding or decoding MYBR containers.
#[derive(Error, Debug)]
pub enum MybrError {
    #[error("Container has no tracks")]
    EmptyContainer,

    #[error("Maximum track count exceeded (max {max}, got {got})")]
    TooManyTracks { max: usize, got: usize },

    #[error("Track {track} name is {len} bytes; names are limited to {max} UTF-8 bytes")]
    NameTooLong { track: usize, len: usize, max: usize },

    #[error("Track {track} has a sample width of {width} bytes; only 16-bit (2-byte) PCM is supported")]
    UnsupportedSampleWidth { track: usize, width: u8 },

    #[error("Track {track} payload is {actual} bytes, expected {expected} (num_samples * channels * 2)")]
    PayloadSizeMismatch {
        track: usize,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid loop bounds: {0}")]
    InvalidLoop(#[from] LoopViolation),

    #[error("Container layout is {size} bytes, which overflows the format's u32 fields")]
    ContainerTooLarge { size: u64 },

    #[error("Invalid magic bytes {found:02X?}: expected MYBR (0x5242594D)")]
    BadMagic { found: [u8; 4] },

    #[error("Track {track} name is not valid UTF-8: {source}")]
    BadName {
        track: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("Corrupt data offsets: track {track} at offset {offset}: {reason}")]
    CorruptOffsets {
        track: usize,
        offset: u32,
        reason: String,
    },

    #[error("Track {track} embedded WAV block is malformed")]
    MalformedWavBlock { track: usize },

    #[error("Track index {index} out of range ({count} tracks)")]
    TrackIndexOutOfRange { index: usize, count: usize },

    #[error("Allocation too large: track {track} payload is {requested} bytes, limit is {limit} bytes")]
    AllocationTooLarge {
        track: usize,
        requested: u64,
        limit: u64,
    },

    #[error("Encode cancelled before track {track} payload")]
    Cancelled { track: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MybrError>;
