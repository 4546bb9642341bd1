//! Container byte geometry — header sizes, payload sizes, and data offsets.
//!
//! The encoder and the decoder both derive offsets from this module, so the
//! two sides can never disagree about where a payload starts. Every size
//! rule of the format lives here.

use serde::{Deserialize, Serialize};

use crate::error::{MybrError, Result};
use crate::header::{GLOBAL_HEADER_SIZE, MAX_TRACKS};
use crate::track::TrackInfo;
use crate::wav::WAV_HEADER_SIZE;

/// Fixed portion of a track header: channels(1) + sample_rate(4) +
/// num_samples(4) + name_length(1) + data_offset(4).
pub const TRACK_HEADER_FIXED_SIZE: usize = 14;

/// Maximum UTF-8 byte length of a track name (the length is stored in one byte).
pub const MAX_NAME_LEN: usize = 255;

/// How track payloads are laid out on disk.
///
/// The convention is uniform across a file and chosen at encode time; the
/// decoder detects it from the first payload's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadConvention {
    /// Raw interleaved 16-bit little-endian PCM samples.
    RawPcm,
    /// A canonical 44-byte PCM WAVE header followed by the raw samples.
    WavBlock,
}

impl PayloadConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadConvention::RawPcm => "raw-pcm",
            PayloadConvention::WavBlock => "wav-block",
        }
    }
}

/// Size in bytes of one track's header: the fixed fields plus the name bytes.
pub fn track_header_size(info: &TrackInfo) -> u64 {
    TRACK_HEADER_FIXED_SIZE as u64 + info.name.len() as u64
}

/// Size in bytes of one track's on-disk payload under the given convention.
pub fn payload_size(info: &TrackInfo, convention: PayloadConvention) -> u64 {
    match convention {
        PayloadConvention::RawPcm => info.pcm_len(),
        PayloadConvention::WavBlock => WAV_HEADER_SIZE as u64 + info.pcm_len(),
    }
}

/// Computed byte geometry for a whole container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Convention the payload sizes were computed under.
    pub convention: PayloadConvention,
    /// Offset of the first payload byte: global header plus all track headers.
    pub first_data_offset: u32,
    /// Absolute payload start offset for each track, in track order.
    pub data_offsets: Vec<u32>,
    /// Total container size in bytes.
    pub total_size: u64,
}

impl Layout {
    /// Compute the container geometry for an ordered track list.
    ///
    /// Oversized names are rejected before any offset math, and a layout
    /// whose data offsets would overflow the u32 fields they are stored in
    /// is rejected before any byte could be written.
    pub fn compute(tracks: &[TrackInfo], convention: PayloadConvention) -> Result<Self> {
        if tracks.is_empty() {
            return Err(MybrError::EmptyContainer);
        }
        if tracks.len() > MAX_TRACKS {
            return Err(MybrError::TooManyTracks {
                max: MAX_TRACKS,
                got: tracks.len(),
            });
        }

        let mut first_data_offset = GLOBAL_HEADER_SIZE as u64;
        for (index, info) in tracks.iter().enumerate() {
            let name_len = info.name.len();
            if name_len > MAX_NAME_LEN {
                return Err(MybrError::NameTooLong {
                    track: index,
                    len: name_len,
                    max: MAX_NAME_LEN,
                });
            }
            first_data_offset += track_header_size(info);
        }

        let total_size = first_data_offset
            + tracks
                .iter()
                .map(|info| payload_size(info, convention))
                .sum::<u64>();
        if total_size > u32::MAX as u64 {
            return Err(MybrError::ContainerTooLarge { size: total_size });
        }

        let mut data_offsets = Vec::with_capacity(tracks.len());
        let mut cursor = first_data_offset;
        for info in tracks {
            data_offsets.push(cursor as u32);
            cursor += payload_size(info, convention);
        }

        Ok(Self {
            convention,
            first_data_offset: first_data_offset as u32,
            data_offsets,
            total_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tracks() -> Vec<TrackInfo> {
        vec![
            TrackInfo::new("A", 2, 44100, 1000),
            TrackInfo::new("B", 1, 22050, 500),
            TrackInfo::new("C", 2, 44100, 2000),
        ]
    }

    #[test]
    fn test_first_data_offset() {
        // 14 (global) + 3 * (14 fixed + 1-byte name) = 14 + 45
        let layout = Layout::compute(&three_tracks(), PayloadConvention::RawPcm).unwrap();
        assert_eq!(layout.first_data_offset, 14 + 3 * 15);
        assert_eq!(layout.data_offsets[0], layout.first_data_offset);
    }

    #[test]
    fn test_offsets_chain_by_payload_size() {
        let tracks = three_tracks();
        let layout = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap();

        // Payload sizes: 1000*2*2 = 4000, 500*1*2 = 1000, 2000*2*2 = 8000
        assert_eq!(layout.data_offsets[1], layout.data_offsets[0] + 4000);
        assert_eq!(layout.data_offsets[2], layout.data_offsets[1] + 1000);
        assert_eq!(
            layout.total_size,
            layout.data_offsets[2] as u64 + 8000
        );
    }

    #[test]
    fn test_wav_block_adds_44_per_track() {
        let tracks = three_tracks();
        let raw = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap();
        let wav = Layout::compute(&tracks, PayloadConvention::WavBlock).unwrap();

        assert_eq!(raw.first_data_offset, wav.first_data_offset);
        assert_eq!(wav.data_offsets[1], wav.data_offsets[0] + 4000 + 44);
        assert_eq!(wav.total_size, raw.total_size + 3 * 44);
    }

    #[test]
    fn test_name_length_feeds_header_size() {
        let tracks = vec![TrackInfo::new("intro-theme", 2, 44100, 10)];
        let layout = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap();
        assert_eq!(layout.first_data_offset as usize, 14 + 14 + "intro-theme".len());
    }

    #[test]
    fn test_multibyte_names_counted_in_bytes() {
        // "àèì" is 3 chars but 6 UTF-8 bytes
        let tracks = vec![TrackInfo::new("àèì", 1, 44100, 10)];
        let layout = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap();
        assert_eq!(layout.first_data_offset as usize, 14 + 14 + 6);
    }

    #[test]
    fn test_oversized_name_rejected() {
        let tracks = vec![TrackInfo::new("x".repeat(256), 1, 44100, 10)];
        let err = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap_err();
        assert!(matches!(
            err,
            MybrError::NameTooLong {
                track: 0,
                len: 256,
                ..
            }
        ));

        // 255 bytes is the boundary and must pass
        let tracks = vec![TrackInfo::new("x".repeat(255), 1, 44100, 10)];
        assert!(Layout::compute(&tracks, PayloadConvention::RawPcm).is_ok());
    }

    #[test]
    fn test_empty_track_list_rejected() {
        let err = Layout::compute(&[], PayloadConvention::RawPcm).unwrap_err();
        assert!(matches!(err, MybrError::EmptyContainer));
    }

    #[test]
    fn test_too_many_tracks_rejected() {
        let tracks: Vec<TrackInfo> = (0..256)
            .map(|i| TrackInfo::new(format!("t{i}"), 1, 44100, 1))
            .collect();
        let err = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap_err();
        assert!(matches!(err, MybrError::TooManyTracks { max: 255, got: 256 }));
    }

    #[test]
    fn test_u32_offset_overflow_rejected() {
        // Two tracks whose first payload pushes the second offset past u32::MAX
        let tracks = vec![
            TrackInfo::new("a", 255, 44100, u32::MAX),
            TrackInfo::new("b", 1, 44100, 1),
        ];
        let err = Layout::compute(&tracks, PayloadConvention::RawPcm).unwrap_err();
        assert!(matches!(err, MybrError::ContainerTooLarge { .. }));
    }

    #[test]
    fn test_total_size_u32_boundary() {
        // One mono track with a 1-byte name: total = 14 + 15 + 2 * frames.
        // 2_147_483_633 frames lands exactly on u32::MAX; one more overflows.
        let at_limit = vec![TrackInfo::new("a", 1, 44100, 2_147_483_633)];
        let layout = Layout::compute(&at_limit, PayloadConvention::RawPcm).unwrap();
        assert_eq!(layout.total_size, u32::MAX as u64);

        let past_limit = vec![TrackInfo::new("a", 1, 44100, 2_147_483_634)];
        let err = Layout::compute(&past_limit, PayloadConvention::RawPcm).unwrap_err();
        assert!(matches!(err, MybrError::ContainerTooLarge { .. }));
    }
}
