//! MYBR global header — the first 14 bytes of every `.mybr` file.

use serde::{Deserialize, Serialize};

use crate::loops::LoopSpec;

/// Magic bytes identifying a MYBR file: `MYBR` (0x5242594D as a little-endian u32)
pub const MYBR_MAGIC: [u8; 4] = [0x4D, 0x59, 0x42, 0x52];

/// Maximum number of tracks per container (the count is stored in one byte)
pub const MAX_TRACKS: usize = 255;

/// Size of the fixed global header in bytes
pub const GLOBAL_HEADER_SIZE: usize = 14;

/// The fixed-size header at the beginning of every `.mybr` file.
///
/// Layout (14 bytes, little-endian):
/// - `[0..4]`   magic: `MYBR`
/// - `[4]`      track_count: u8 (1–255)
/// - `[5]`      loop_enabled: u8 (0 or 1)
/// - `[6..10]`  loop_start_sample: u32
/// - `[10..14]` loop_end_sample: u32
///
/// Track headers follow immediately, one per track; payloads follow the last
/// track header in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHeader {
    /// Number of tracks in this container (1–255)
    pub track_count: u8,
    /// Loop points, relative to track 0
    pub loop_spec: LoopSpec,
}

impl ContainerHeader {
    /// Create a header for the given track count and loop points.
    pub fn new(track_count: u8, loop_spec: LoopSpec) -> Self {
        Self {
            track_count,
            loop_spec,
        }
    }
}
