//! MYBR file writer — serializes PCM tracks and loop metadata into the
//! `.mybr` container format.
//!
//! The writer uses a builder pattern: create a [`MybrWriter`], add track
//! sources, pick a loop mode, then call [`MybrWriter::finalize`] to write the
//! container to disk or [`MybrWriter::encode_to`] to stream it into any byte
//! sink. Validation runs in full before the first byte is emitted, and
//! `finalize` goes through a temp file and rename, so a failed encode never
//! leaves a partial file behind.
//!
//! # Binary Layout
//!
//! - **Global header** (14 bytes): magic, track count, loop flag, loop points
//! - **Track headers**: one per track, sized by the name's byte length
//! - **Track payloads**: raw PCM or embedded WAV blocks, in header order
//!
//! # Example
//!
//! ```rust,no_run
//! use mybr_format::writer::MybrWriter;
//! use mybr_format::layout::PayloadConvention;
//! use mybr_format::loops::LoopMode;
//! use mybr_format::track::{TrackInfo, TrackSource};
//! use std::path::Path;
//!
//! let info = TrackInfo::new("melody", 2, 44100, 1000);
//! let pcm = vec![0u8; 4000]; // interleaved 16-bit samples
//!
//! let mut writer = MybrWriter::new(PayloadConvention::RawPcm);
//! writer.add_track(TrackSource::from_pcm(info, pcm)).unwrap();
//! writer.set_loop_mode(LoopMode::Manual {
//!     start_sample: 0,
//!     end_sample: 1000,
//! });
//! writer.finalize(Path::new("song.mybr")).unwrap();
//! ```

use std::fmt;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{MybrError, Result};
use crate::header::{ContainerHeader, MAX_TRACKS, MYBR_MAGIC};
use crate::layout::{payload_size, Layout, PayloadConvention, MAX_NAME_LEN, TRACK_HEADER_FIXED_SIZE};
use crate::loops::{LoopMode, LoopSpec};
use crate::track::{TrackInfo, TrackPayload, TrackSource, SAMPLE_WIDTH_BYTES};
use crate::wav;
use crate::wav::WAV_HEADER_SIZE;

/// Buffer size for copying streamed payload sources.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Progress callback: percent complete (0–100) and a stage message.
pub type ProgressFn = Box<dyn FnMut(u8, &str) + Send>;

/// Builder for creating `.mybr` files.
///
/// Collects track sources and loop configuration, then writes the complete
/// container in one [`encode_to`](MybrWriter::encode_to) or
/// [`finalize`](MybrWriter::finalize) call. Both consume the writer, since
/// streamed payload sources can only be read once.
pub struct MybrWriter {
    /// Track sources in container order.
    tracks: Vec<TrackSource>,
    /// How the loop points are obtained; `Disabled` unless configured.
    loop_mode: LoopMode,
    /// Payload layout used for every track in the file.
    convention: PayloadConvention,
    /// Optional progress callback.
    progress: Option<ProgressFn>,
    /// Optional cooperative cancellation flag, checked between payloads.
    cancel: Option<Arc<AtomicBool>>,
}

impl fmt::Debug for MybrWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MybrWriter")
            .field("tracks", &self.tracks)
            .field("loop_mode", &self.loop_mode)
            .field("convention", &self.convention)
            .field("progress", &self.progress.as_ref().map(|_| "FnMut(..)"))
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl MybrWriter {
    /// Create a writer producing containers with the given payload convention.
    pub fn new(convention: PayloadConvention) -> Self {
        Self {
            tracks: Vec::new(),
            loop_mode: LoopMode::Disabled,
            convention,
            progress: None,
            cancel: None,
        }
    }

    /// Queue a track for encoding. Tracks are written in the order added;
    /// the first track added is the loop reference track.
    ///
    /// # Errors
    ///
    /// Returns [`MybrError::TooManyTracks`] if adding this track would exceed
    /// the 255-track limit.
    pub fn add_track(&mut self, source: TrackSource) -> Result<&mut Self> {
        let new_count = self.tracks.len() + 1;
        if new_count > MAX_TRACKS {
            return Err(MybrError::TooManyTracks {
                max: MAX_TRACKS,
                got: new_count,
            });
        }
        tracing::debug!(
            track = self.tracks.len(),
            name = %source.info.name,
            channels = source.info.channels,
            sample_rate = source.info.sample_rate,
            num_samples = source.info.num_samples,
            "Adding track to writer"
        );
        self.tracks.push(source);
        Ok(self)
    }

    /// Choose how the loop points are derived (default: no loop).
    pub fn set_loop_mode(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// Install a progress callback, invoked with `(percent, message)` as the
    /// encode advances. Percentages are non-decreasing and reach 100 on
    /// success.
    pub fn set_progress(&mut self, callback: ProgressFn) -> &mut Self {
        self.progress = Some(callback);
        self
    }

    /// Install a cooperative cancellation flag. The encode checks it between
    /// track payloads and aborts with [`MybrError::Cancelled`] when set.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) -> &mut Self {
        self.cancel = Some(flag);
        self
    }

    /// Run every validation rule and resolve the loop mode against track 0.
    ///
    /// Nothing is written until this passes.
    fn validate(&self) -> Result<LoopSpec> {
        if self.tracks.is_empty() {
            return Err(MybrError::EmptyContainer);
        }
        if self.tracks.len() > MAX_TRACKS {
            return Err(MybrError::TooManyTracks {
                max: MAX_TRACKS,
                got: self.tracks.len(),
            });
        }
        for (index, source) in self.tracks.iter().enumerate() {
            let info = &source.info;
            if info.name.len() > MAX_NAME_LEN {
                return Err(MybrError::NameTooLong {
                    track: index,
                    len: info.name.len(),
                    max: MAX_NAME_LEN,
                });
            }
            if source.sample_width_bytes != SAMPLE_WIDTH_BYTES {
                return Err(MybrError::UnsupportedSampleWidth {
                    track: index,
                    width: source.sample_width_bytes,
                });
            }
            if let TrackPayload::Buffer(bytes) = &source.payload {
                if bytes.len() as u64 != info.pcm_len() {
                    return Err(MybrError::PayloadSizeMismatch {
                        track: index,
                        expected: info.pcm_len(),
                        actual: bytes.len() as u64,
                    });
                }
            }
            // The embedded WAV header stores data_size and 36 + data_size
            // as u32, so WavBlock payloads are capped where RawPcm is not.
            if self.convention == PayloadConvention::WavBlock
                && info.pcm_len() > (u32::MAX - 36) as u64
            {
                return Err(MybrError::ContainerTooLarge {
                    size: WAV_HEADER_SIZE as u64 + info.pcm_len(),
                });
            }
        }

        let track_frames = self.tracks[0].info.num_samples;
        let loop_spec = self.loop_mode.resolve(track_frames)?;
        Ok(loop_spec)
    }

    /// Serialize one track header into a byte vector.
    ///
    /// Layout: channels (u8), sample_rate (u32 LE), num_samples (u32 LE),
    /// name_length (u8), name bytes, data_offset (u32 LE).
    fn serialize_track_header(info: &TrackInfo, data_offset: u32) -> Vec<u8> {
        let name_bytes = info.name.as_bytes();
        let mut buf = Vec::with_capacity(TRACK_HEADER_FIXED_SIZE + name_bytes.len());

        buf.write_u8(info.channels).expect("write to Vec cannot fail");
        buf.write_u32::<LittleEndian>(info.sample_rate)
            .expect("write to Vec cannot fail");
        buf.write_u32::<LittleEndian>(info.num_samples)
            .expect("write to Vec cannot fail");
        buf.write_u8(name_bytes.len() as u8)
            .expect("write to Vec cannot fail");
        buf.write_all(name_bytes).expect("write to Vec cannot fail");
        buf.write_u32::<LittleEndian>(data_offset)
            .expect("write to Vec cannot fail");

        buf
    }

    /// Write the 14-byte global header to the given writer.
    fn write_global_header<W: Write>(writer: &mut W, header: &ContainerHeader) -> Result<()> {
        // [0..4]: Magic bytes
        writer.write_all(&MYBR_MAGIC)?;
        // [4]: Track count (u8)
        writer.write_u8(header.track_count)?;
        // [5]: Loop-enabled flag (u8)
        writer.write_u8(header.loop_spec.enabled as u8)?;
        // [6..10]: Loop start sample (u32 LE)
        writer.write_u32::<LittleEndian>(header.loop_spec.start_sample)?;
        // [10..14]: Loop end sample (u32 LE)
        writer.write_u32::<LittleEndian>(header.loop_spec.end_sample)?;
        Ok(())
    }

    /// Encode the container into any byte sink, returning the total bytes
    /// written.
    ///
    /// The sink receives nothing unless validation of every track and the
    /// loop spec passes first. Payloads are copied through a bounded buffer,
    /// so only one track's stream is in flight at a time.
    ///
    /// # Errors
    ///
    /// Validation errors ([`MybrError::EmptyContainer`],
    /// [`MybrError::NameTooLong`], [`MybrError::InvalidLoop`], ...) are
    /// returned before any byte is written. [`MybrError::Io`] and
    /// [`MybrError::Cancelled`] can occur mid-stream; when writing to a path,
    /// use [`finalize`](MybrWriter::finalize) so those leave no output file.
    pub fn encode_to<W: Write>(mut self, sink: &mut W) -> Result<u64> {
        let loop_spec = self.validate()?;
        let infos: Vec<TrackInfo> = self.tracks.iter().map(|t| t.info.clone()).collect();
        let layout = Layout::compute(&infos, self.convention)?;

        let mut progress = self.progress.take();
        let mut emit = move |percent: u8, message: &str| {
            if let Some(callback) = progress.as_mut() {
                callback(percent, message);
            }
        };
        emit(0, "track list validated");

        let header = ContainerHeader::new(infos.len() as u8, loop_spec);
        Self::write_global_header(sink, &header)?;
        for (index, info) in infos.iter().enumerate() {
            let buf = Self::serialize_track_header(info, layout.data_offsets[index]);
            sink.write_all(&buf)?;
        }
        emit(10, "headers written");
        tracing::debug!(
            tracks = infos.len(),
            first_data_offset = layout.first_data_offset,
            convention = ?self.convention,
            loop_enabled = loop_spec.enabled,
            "Headers written"
        );

        let cancel = self.cancel.take();
        let total = self.tracks.len();
        let tracks = std::mem::take(&mut self.tracks);
        for (index, source) in tracks.into_iter().enumerate() {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(MybrError::Cancelled { track: index });
                }
            }
            let TrackSource { info, payload, .. } = source;
            if self.convention == PayloadConvention::WavBlock {
                wav::write_wav_header(sink, info.channels, info.sample_rate, info.pcm_len() as u32)?;
            }
            match payload {
                TrackPayload::Buffer(bytes) => sink.write_all(&bytes)?,
                TrackPayload::Reader(mut reader) => {
                    copy_payload(&mut reader, sink, info.pcm_len(), index)?
                }
            }
            tracing::debug!(
                track = index,
                offset = layout.data_offsets[index],
                bytes = payload_size(&info, self.convention),
                "Track payload written"
            );
            let percent = 10 + (((index + 1) * 90) / total) as u8;
            emit(percent, &format!("track payload {}/{} written", index + 1, total));
        }

        sink.flush()?;
        emit(100, "container complete");
        Ok(layout.total_size)
    }

    /// Encode the container and write it to `path` atomically.
    ///
    /// The bytes go to a temp file in the destination directory first and are
    /// renamed into place only on success; a failed or cancelled encode
    /// leaves no file at `path`.
    ///
    /// # Errors
    ///
    /// Any validation error from [`encode_to`](MybrWriter::encode_to), plus
    /// [`MybrError::Io`] from file creation, writing, or the final rename.
    pub fn finalize(self, path: &Path) -> Result<()> {
        tracing::info!(
            path = %path.display(),
            tracks = self.tracks.len(),
            "Finalizing MYBR file"
        );

        // Temp file in the destination directory keeps the rename on one
        // filesystem.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        let total_size = {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.encode_to(&mut writer)?
        };
        tmp.persist(path).map_err(|err| MybrError::Io(err.error))?;

        tracing::info!(
            path = %path.display(),
            file_size = total_size,
            "MYBR file written successfully"
        );
        Ok(())
    }
}

/// Copy exactly `expected` bytes from a streamed payload source into the
/// sink through a bounded buffer.
fn copy_payload<R: Read, W: Write>(
    reader: &mut R,
    sink: &mut W,
    expected: u64,
    track: usize,
) -> Result<()> {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut remaining = expected;
    while remaining > 0 {
        let want = remaining.min(COPY_BUF_SIZE as u64) as usize;
        let read = reader.read(&mut buf[..want])?;
        if read == 0 {
            return Err(MybrError::PayloadSizeMismatch {
                track,
                expected,
                actual: expected - remaining,
            });
        }
        sink.write_all(&buf[..read])?;
        remaining -= read as u64;
    }
    Ok(())
}
