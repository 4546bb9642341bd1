//! # mybr-format
//!
//! The MYBR multi-track audio container library. Handles reading and writing
//! `.mybr` files including the global header, per-track headers, loop
//! metadata, and both payload conventions.
//!
//! ## Format Overview
//!
//! A `.mybr` file consists of:
//! - **Global header** (14 bytes): magic bytes, track count, loop flag and loop points
//! - **Track headers**: channels, sample rate, length, and name per track, plus an absolute data offset
//! - **Payloads**: 16-bit little-endian PCM per track, raw or wrapped in a canonical 44-byte WAV header
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//! use mybr_format::{MybrWriter, MybrReader, PayloadConvention, TrackSource, TrackInfo};
//!
//! // Writing
//! let writer = MybrWriter::new(PayloadConvention::RawPcm);
//! // ... add tracks, set a loop, finalize
//!
//! // Reading
//! let reader = MybrReader::open(Path::new("song.mybr")).unwrap();
//! println!("{:?}", reader.header());
//! ```

pub mod error;
pub mod header;
pub mod layout;
pub mod loops;
pub mod reader;
pub mod track;
pub mod wav;
pub mod writer;

pub use error::{MybrError, Result};
pub use header::*;
pub use layout::*;
pub use loops::*;
pub use reader::{MybrReader, DEFAULT_ALLOCATION_LIMIT};
pub use track::*;
pub use wav::*;
pub use writer::{MybrWriter, ProgressFn};
