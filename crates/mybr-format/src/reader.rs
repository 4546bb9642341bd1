//! MYBR file reader — parses `.mybr` containers and reads track payloads on
//! demand.
//!
//! [`MybrReader::open`] validates the global header, every track header, and
//! the recorded data offsets before returning; payload bytes are only read
//! when a caller asks for a specific track, so a large multi-track file never
//! has to fit in memory at once. Structural problems fail the open with a
//! typed error. Invalid loop metadata does not: the tracks stay readable and
//! the loop is reported as [`LoopMetadata::Invalid`].

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{MybrError, Result};
use crate::header::{ContainerHeader, MYBR_MAGIC};
use crate::layout::{payload_size, Layout, PayloadConvention};
use crate::loops::{LoopMetadata, LoopSpec, LoopViolation};
use crate::track::TrackInfo;
use crate::wav;
use crate::wav::WAV_HEADER_SIZE;

/// Default cap on a single eager payload read (256 MiB). Streamed reads via
/// [`MybrReader::read_track_into`] are not subject to it.
pub const DEFAULT_ALLOCATION_LIMIT: u64 = 256 * 1024 * 1024;

/// Buffer size for streamed payload copies.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Global header fields exactly as stored, before interpretation.
struct RawGlobalHeader {
    track_count: u8,
    loop_flag: u8,
    loop_start: u32,
    loop_end: u32,
}

/// One parsed track header with its resolved payload location.
#[derive(Debug, Clone)]
struct TrackEntry {
    info: TrackInfo,
    /// Absolute start of the on-disk payload (embedded WAV header included).
    data_offset: u32,
    /// Absolute start of the raw PCM samples.
    pcm_offset: u64,
}

/// Reader for `.mybr` files.
///
/// All metadata is parsed and cross-checked up front; payloads are read
/// lazily per track.
///
/// # Example
///
/// ```rust,no_run
/// use mybr_format::reader::MybrReader;
/// use std::path::Path;
///
/// let mut reader = MybrReader::open(Path::new("song.mybr")).unwrap();
/// println!("{} tracks", reader.track_count());
/// let pcm = reader.read_track_pcm(0).unwrap();
/// println!("track 0: {} PCM bytes", pcm.len());
/// ```
#[derive(Debug)]
pub struct MybrReader<R> {
    inner: R,
    header: ContainerHeader,
    entries: Vec<TrackEntry>,
    convention: PayloadConvention,
    loop_metadata: LoopMetadata,
    input_len: u64,
    allocation_limit: u64,
}

impl MybrReader<BufReader<File>> {
    /// Open and validate a MYBR file. Payloads are not read until requested.
    ///
    /// # Errors
    ///
    /// Returns [`MybrError::BadMagic`], [`MybrError::BadName`],
    /// [`MybrError::CorruptOffsets`], or [`MybrError::Io`] when the file is
    /// not a structurally valid container.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "Opening MYBR file");
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> MybrReader<R> {
    /// Parse and validate a container from any seekable byte source.
    pub fn new(mut inner: R) -> Result<Self> {
        let input_len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        let raw = Self::read_global_header(&mut inner)?;
        let headers = Self::read_track_headers(&mut inner, raw.track_count)?;
        let convention = Self::detect_convention(&mut inner, &headers, input_len)?;
        let entries = Self::validate_offsets(headers, convention, input_len)?;
        if convention == PayloadConvention::WavBlock {
            Self::verify_wav_blocks(&mut inner, &entries)?;
        }

        let track_frames = entries[0].info.num_samples;
        let loop_metadata = Self::resolve_loop_metadata(&raw, track_frames);
        let header = ContainerHeader {
            track_count: raw.track_count,
            loop_spec: LoopSpec {
                enabled: raw.loop_flag == 1,
                start_sample: raw.loop_start,
                end_sample: raw.loop_end,
            },
        };

        tracing::debug!(
            tracks = entries.len(),
            convention = ?convention,
            input_len,
            loop_valid = loop_metadata.is_valid(),
            "MYBR container parsed"
        );

        Ok(Self {
            inner,
            header,
            entries,
            convention,
            loop_metadata,
            input_len,
            allocation_limit: DEFAULT_ALLOCATION_LIMIT,
        })
    }

    /// Read and check the 14-byte global header.
    ///
    /// The magic comparison happens before any other field is read, so a
    /// non-MYBR input fails on exactly its first four bytes.
    fn read_global_header(inner: &mut R) -> Result<RawGlobalHeader> {
        let mut magic = [0u8; 4];
        inner.read_exact(&mut magic)?;
        if magic != MYBR_MAGIC {
            return Err(MybrError::BadMagic { found: magic });
        }

        let track_count = inner.read_u8()?;
        if track_count == 0 {
            return Err(MybrError::EmptyContainer);
        }
        let loop_flag = inner.read_u8()?;
        let loop_start = inner.read_u32::<LittleEndian>()?;
        let loop_end = inner.read_u32::<LittleEndian>()?;

        Ok(RawGlobalHeader {
            track_count,
            loop_flag,
            loop_start,
            loop_end,
        })
    }

    /// Read every track header in file order, without touching payloads.
    fn read_track_headers(inner: &mut R, count: u8) -> Result<Vec<(TrackInfo, u32)>> {
        let mut headers = Vec::with_capacity(count as usize);
        for index in 0..count as usize {
            let channels = inner.read_u8()?;
            let sample_rate = inner.read_u32::<LittleEndian>()?;
            let num_samples = inner.read_u32::<LittleEndian>()?;
            let name_len = inner.read_u8()? as usize;
            let mut name_bytes = vec![0u8; name_len];
            inner.read_exact(&mut name_bytes)?;
            let name = String::from_utf8(name_bytes)
                .map_err(|source| MybrError::BadName { track: index, source })?;
            let data_offset = inner.read_u32::<LittleEndian>()?;

            headers.push((
                TrackInfo {
                    name,
                    channels,
                    sample_rate,
                    num_samples,
                },
                data_offset,
            ));
        }
        Ok(headers)
    }

    /// Peek 4 bytes at the first track's payload; a `RIFF` tag means the
    /// file embeds WAV blocks. The convention is uniform per file.
    fn detect_convention(
        inner: &mut R,
        headers: &[(TrackInfo, u32)],
        input_len: u64,
    ) -> Result<PayloadConvention> {
        let first_offset = headers[0].1 as u64;
        if input_len.saturating_sub(first_offset) < 4 {
            // Nothing to sniff; an empty raw payload decodes the same way.
            return Ok(PayloadConvention::RawPcm);
        }
        inner.seek(SeekFrom::Start(first_offset))?;
        let mut tag = [0u8; 4];
        inner.read_exact(&mut tag)?;
        Ok(if &tag == b"RIFF" {
            PayloadConvention::WavBlock
        } else {
            PayloadConvention::RawPcm
        })
    }

    /// Cross-check every stored offset against the layout recomputed from
    /// the headers just read: payloads must start at or after the header
    /// region, stay within the input, and never overlap one another.
    fn validate_offsets(
        headers: Vec<(TrackInfo, u32)>,
        convention: PayloadConvention,
        input_len: u64,
    ) -> Result<Vec<TrackEntry>> {
        let infos: Vec<TrackInfo> = headers.iter().map(|(info, _)| info.clone()).collect();
        let layout = Layout::compute(&infos, convention)?;
        let first = layout.first_data_offset as u64;

        let mut spans: Vec<(usize, u64, u64)> = Vec::with_capacity(headers.len());
        for (index, (info, offset)) in headers.iter().enumerate() {
            let start = *offset as u64;
            let end = start + payload_size(info, convention);
            if start < first {
                return Err(MybrError::CorruptOffsets {
                    track: index,
                    offset: *offset,
                    reason: format!("payload starts inside the header region (first data offset is {first})"),
                });
            }
            if end > input_len {
                return Err(MybrError::CorruptOffsets {
                    track: index,
                    offset: *offset,
                    reason: format!("payload extends to byte {end} but the input is {input_len} bytes"),
                });
            }
            spans.push((index, start, end));
        }

        spans.sort_by_key(|&(_, start, _)| start);
        for pair in spans.windows(2) {
            let (_, _, prev_end) = pair[0];
            let (track, start, _) = pair[1];
            if start < prev_end {
                return Err(MybrError::CorruptOffsets {
                    track,
                    offset: start as u32,
                    reason: format!(
                        "payload overlaps the preceding region ending at byte {prev_end}"
                    ),
                });
            }
        }

        let pcm_skip = match convention {
            PayloadConvention::RawPcm => 0,
            PayloadConvention::WavBlock => WAV_HEADER_SIZE as u64,
        };
        Ok(headers
            .into_iter()
            .map(|(info, data_offset)| TrackEntry {
                info,
                data_offset,
                pcm_offset: data_offset as u64 + pcm_skip,
            })
            .collect())
    }

    /// Check each embedded WAV header against its track header. Runs once at
    /// open so payload reads can skip straight to the samples.
    fn verify_wav_blocks(inner: &mut R, entries: &[TrackEntry]) -> Result<()> {
        for (index, entry) in entries.iter().enumerate() {
            inner.seek(SeekFrom::Start(entry.data_offset as u64))?;
            let block = wav::read_wav_header(inner, index)?;
            let info = &entry.info;
            if block.channels != info.channels as u16
                || block.sample_rate != info.sample_rate
                || block.bits_per_sample != 16
                || block.data_size as u64 != info.pcm_len()
            {
                return Err(MybrError::MalformedWavBlock { track: index });
            }
        }
        Ok(())
    }

    /// Interpret the stored loop fields against track 0.
    fn resolve_loop_metadata(raw: &RawGlobalHeader, track_frames: u32) -> LoopMetadata {
        match raw.loop_flag {
            0 => LoopMetadata::Disabled,
            1 => {
                let spec = LoopSpec::new(raw.loop_start, raw.loop_end);
                match spec.validate(track_frames) {
                    Ok(()) => LoopMetadata::Enabled(spec),
                    Err(violation) => {
                        tracing::warn!(
                            start = raw.loop_start,
                            end = raw.loop_end,
                            track_frames,
                            %violation,
                            "Loop metadata failed validation; tracks remain readable"
                        );
                        LoopMetadata::Invalid {
                            start_sample: raw.loop_start,
                            end_sample: raw.loop_end,
                            violation,
                        }
                    }
                }
            }
            other => {
                tracing::warn!(flag = other, "Unrecognized loop flag byte");
                LoopMetadata::Invalid {
                    start_sample: raw.loop_start,
                    end_sample: raw.loop_end,
                    violation: LoopViolation::BadFlagByte(other),
                }
            }
        }
    }

    /// The parsed global header, with loop fields exactly as stored.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Number of tracks in the container.
    pub fn track_count(&self) -> usize {
        self.entries.len()
    }

    /// Payload convention detected from the first payload.
    pub fn convention(&self) -> PayloadConvention {
        self.convention
    }

    /// Loop metadata after validation against track 0.
    pub fn loop_metadata(&self) -> &LoopMetadata {
        &self.loop_metadata
    }

    /// Total byte length of the input.
    pub fn input_len(&self) -> u64 {
        self.input_len
    }

    /// Metadata for one track.
    pub fn track_info(&self, index: usize) -> Option<&TrackInfo> {
        self.entries.get(index).map(|entry| &entry.info)
    }

    /// Metadata for every track, in container order.
    pub fn tracks(&self) -> Vec<TrackInfo> {
        self.entries.iter().map(|entry| entry.info.clone()).collect()
    }

    /// Absolute payload start offset recorded for one track.
    pub fn track_data_offset(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|entry| entry.data_offset)
    }

    /// Cap eager payload reads at `limit` bytes (default 256 MiB).
    pub fn set_allocation_limit(&mut self, limit: u64) {
        self.allocation_limit = limit;
    }

    /// Read one track's raw PCM into memory, with any embedded WAV header
    /// already stripped.
    ///
    /// # Errors
    ///
    /// Returns [`MybrError::TrackIndexOutOfRange`] for a bad index and
    /// [`MybrError::AllocationTooLarge`] when the payload exceeds the
    /// allocation limit; use [`read_track_into`](MybrReader::read_track_into)
    /// for tracks of any size.
    pub fn read_track_pcm(&mut self, index: usize) -> Result<Vec<u8>> {
        let (pcm_offset, len) = self.entry_span(index)?;
        self.check_allocation(index, len)?;

        let mut data = vec![0u8; len as usize];
        self.inner.seek(SeekFrom::Start(pcm_offset))?;
        self.inner.read_exact(&mut data)?;
        tracing::debug!(track = index, bytes = len, "Read track PCM");
        Ok(data)
    }

    /// Stream one track's raw PCM into a sink in bounded chunks, returning
    /// the byte count.
    pub fn read_track_into<W: Write>(&mut self, index: usize, sink: &mut W) -> Result<u64> {
        let (pcm_offset, len) = self.entry_span(index)?;
        self.inner.seek(SeekFrom::Start(pcm_offset))?;

        let mut buf = vec![0u8; COPY_BUF_SIZE];
        let mut remaining = len;
        while remaining > 0 {
            let want = remaining.min(COPY_BUF_SIZE as u64) as usize;
            self.inner.read_exact(&mut buf[..want])?;
            sink.write_all(&buf[..want])?;
            remaining -= want as u64;
        }
        tracing::debug!(track = index, bytes = len, "Streamed track PCM");
        Ok(len)
    }

    fn entry_span(&self, index: usize) -> Result<(u64, u64)> {
        let entry = self
            .entries
            .get(index)
            .ok_or(MybrError::TrackIndexOutOfRange {
                index,
                count: self.entries.len(),
            })?;
        Ok((entry.pcm_offset, entry.info.pcm_len()))
    }

    fn check_allocation(&self, track: usize, requested: u64) -> Result<()> {
        if requested > self.allocation_limit {
            return Err(MybrError::AllocationTooLarge {
                track,
                requested,
                limit: self.allocation_limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use byteorder::WriteBytesExt;

    /// Hand-build a container so reader tests do not depend on the writer.
    fn build_container(
        tracks: &[(&str, u8, u32, u32)],
        loop_flag: u8,
        loop_start: u32,
        loop_end: u32,
        wav_blocks: bool,
    ) -> Vec<u8> {
        let first: u32 = 14
            + tracks
                .iter()
                .map(|(name, ..)| 14 + name.len() as u32)
                .sum::<u32>();
        let mut offsets = Vec::new();
        let mut cursor = first;
        for &(_, channels, _, num_samples) in tracks {
            offsets.push(cursor);
            cursor += num_samples * channels as u32 * 2 + if wav_blocks { 44 } else { 0 };
        }

        let mut buf = Vec::new();
        buf.write_all(&MYBR_MAGIC).unwrap();
        buf.write_u8(tracks.len() as u8).unwrap();
        buf.write_u8(loop_flag).unwrap();
        buf.write_u32::<LittleEndian>(loop_start).unwrap();
        buf.write_u32::<LittleEndian>(loop_end).unwrap();
        for (i, &(name, channels, sample_rate, num_samples)) in tracks.iter().enumerate() {
            buf.write_u8(channels).unwrap();
            buf.write_u32::<LittleEndian>(sample_rate).unwrap();
            buf.write_u32::<LittleEndian>(num_samples).unwrap();
            buf.write_u8(name.len() as u8).unwrap();
            buf.write_all(name.as_bytes()).unwrap();
            buf.write_u32::<LittleEndian>(offsets[i]).unwrap();
        }
        for &(_, channels, sample_rate, num_samples) in tracks {
            let pcm_len = num_samples * channels as u32 * 2;
            if wav_blocks {
                wav::write_wav_header(&mut buf, channels, sample_rate, pcm_len).unwrap();
            }
            let pcm: Vec<u8> = (0..pcm_len).map(|i| i as u8).collect();
            buf.write_all(&pcm).unwrap();
        }
        buf
    }

    fn three_track_bytes(wav_blocks: bool) -> Vec<u8> {
        build_container(
            &[
                ("A", 2, 44100, 1000),
                ("B", 1, 22050, 500),
                ("C", 2, 44100, 2000),
            ],
            1,
            0,
            1000,
            wav_blocks,
        )
    }

    #[test]
    fn test_open_valid_container() {
        let bytes = three_track_bytes(false);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.track_count(), 3);
        assert_eq!(reader.convention(), PayloadConvention::RawPcm);

        let tracks = reader.tracks();
        assert_eq!(tracks[0], TrackInfo::new("A", 2, 44100, 1000));
        assert_eq!(tracks[1], TrackInfo::new("B", 1, 22050, 500));
        assert_eq!(tracks[2], TrackInfo::new("C", 2, 44100, 2000));

        assert_eq!(
            *reader.loop_metadata(),
            LoopMetadata::Enabled(LoopSpec::new(0, 1000))
        );

        assert_eq!(reader.read_track_pcm(0).unwrap().len(), 4000);
        assert_eq!(reader.read_track_pcm(1).unwrap().len(), 1000);
        assert_eq!(reader.read_track_pcm(2).unwrap().len(), 8000);
    }

    #[test]
    fn test_open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("from_file.mybr");
        std::fs::write(&path, three_track_bytes(false)).unwrap();

        let mut reader = MybrReader::open(&path).unwrap();
        assert_eq!(reader.track_count(), 3);
        assert_eq!(reader.input_len(), std::fs::metadata(&path).unwrap().len());
        assert_eq!(reader.read_track_pcm(1).unwrap().len(), 1000);
    }

    #[test]
    fn test_bad_magic_reads_no_further() {
        // Only four bytes: anything read past the magic would hit EOF and
        // surface as Io instead of BadMagic.
        let err = MybrReader::new(Cursor::new(vec![0x00u8, 0x01, 0x02, 0x03])).unwrap_err();
        assert!(matches!(
            err,
            MybrError::BadMagic {
                found: [0x00, 0x01, 0x02, 0x03]
            }
        ));
    }

    #[test]
    fn test_zero_track_count_rejected() {
        let mut bytes = three_track_bytes(false);
        bytes[4] = 0;
        let err = MybrReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MybrError::EmptyContainer));
    }

    #[test]
    fn test_invalid_utf8_name_rejected() {
        let mut bytes = build_container(&[("AB", 1, 44100, 4)], 0, 0, 0, false);
        // Name bytes of track 0 start at 14 + 10
        bytes[24] = 0xFF;
        bytes[25] = 0xFF;
        let err = MybrReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MybrError::BadName { track: 0, .. }));
    }

    #[test]
    fn test_offset_into_header_region_rejected() {
        let mut bytes = build_container(&[("A", 1, 44100, 4), ("B", 1, 44100, 4)], 0, 0, 0, false);
        // Track 1's data_offset field sits at the end of its 15-byte header
        let field = 14 + 15 + 11;
        bytes[field..field + 4].copy_from_slice(&20u32.to_le_bytes());
        let err = MybrReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MybrError::CorruptOffsets { track: 1, offset: 20, .. }));
    }

    #[test]
    fn test_overlapping_payloads_rejected() {
        let mut bytes = build_container(&[("A", 1, 44100, 4), ("B", 1, 44100, 4)], 0, 0, 0, false);
        // Point track 1 at track 0's payload (offset 44)
        let field = 14 + 15 + 11;
        bytes[field..field + 4].copy_from_slice(&44u32.to_le_bytes());
        let err = MybrReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MybrError::CorruptOffsets { track: 1, .. }));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let bytes = three_track_bytes(false);
        let truncated = bytes[..bytes.len() - 10].to_vec();
        let err = MybrReader::new(Cursor::new(truncated)).unwrap_err();
        assert!(matches!(err, MybrError::CorruptOffsets { track: 2, .. }));
    }

    #[test]
    fn test_invalid_loop_is_recoverable() {
        // start >= end
        let bytes = build_container(&[("A", 2, 44100, 1000)], 1, 900, 100, false);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            reader.loop_metadata(),
            LoopMetadata::Invalid {
                start_sample: 900,
                end_sample: 100,
                violation: LoopViolation::StartNotBeforeEnd { .. },
            }
        ));
        // Tracks are still fully readable
        assert_eq!(reader.read_track_pcm(0).unwrap().len(), 4000);
    }

    #[test]
    fn test_loop_end_past_track0_flagged() {
        let bytes = build_container(&[("A", 2, 44100, 1000)], 1, 0, 1001, false);
        let reader = MybrReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            reader.loop_metadata(),
            LoopMetadata::Invalid {
                violation: LoopViolation::EndPastReferenceTrack { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_loop_flag_byte_flagged() {
        let bytes = build_container(&[("A", 2, 44100, 1000)], 7, 0, 500, false);
        let reader = MybrReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            reader.loop_metadata(),
            LoopMetadata::Invalid {
                violation: LoopViolation::BadFlagByte(7),
                ..
            }
        ));
        // The header keeps the stored fields verbatim
        assert!(!reader.header().loop_spec.enabled);
        assert_eq!(reader.header().loop_spec.end_sample, 500);
    }

    #[test]
    fn test_wav_block_detected_and_stripped() {
        let bytes = three_track_bytes(true);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.convention(), PayloadConvention::WavBlock);

        // Raw PCM comes back without the 44-byte header
        let pcm = reader.read_track_pcm(1).unwrap();
        assert_eq!(pcm.len(), 1000);
        let expected: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        assert_eq!(pcm, expected);
    }

    #[test]
    fn test_wav_block_mismatch_rejected() {
        let mut bytes = build_container(&[("A", 2, 44100, 100)], 0, 0, 0, true);
        // Corrupt the embedded channel count (offset 22 within the block)
        let block_start = 14 + 15;
        bytes[block_start + 22] = 9;
        let err = MybrReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MybrError::MalformedWavBlock { track: 0 }));
    }

    #[test]
    fn test_allocation_limit_enforced() {
        let bytes = three_track_bytes(false);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();
        reader.set_allocation_limit(10);

        let err = reader.read_track_pcm(0).unwrap_err();
        assert!(matches!(
            err,
            MybrError::AllocationTooLarge {
                track: 0,
                requested: 4000,
                limit: 10,
            }
        ));

        // Streamed reads ignore the limit
        let mut sink = Vec::new();
        assert_eq!(reader.read_track_into(0, &mut sink).unwrap(), 4000);
        assert_eq!(sink.len(), 4000);
    }

    #[test]
    fn test_track_index_out_of_range() {
        let bytes = build_container(&[("A", 1, 44100, 4)], 0, 0, 0, false);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();
        let err = reader.read_track_pcm(5).unwrap_err();
        assert!(matches!(
            err,
            MybrError::TrackIndexOutOfRange { index: 5, count: 1 }
        ));
    }

    #[test]
    fn test_streamed_read_matches_eager() {
        let bytes = three_track_bytes(true);
        let mut reader = MybrReader::new(Cursor::new(bytes)).unwrap();

        let eager = reader.read_track_pcm(2).unwrap();
        let mut streamed = Vec::new();
        reader.read_track_into(2, &mut streamed).unwrap();
        assert_eq!(eager, streamed);
    }
}
