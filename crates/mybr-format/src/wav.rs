//! Canonical embedded WAV headers for the WavBlock payload convention.
//!
//! Under WavBlock, each payload is a self-contained 16-bit PCM WAVE file:
//! exactly this 44-byte RIFF/WAVE/fmt/data header followed by the samples.
//! The codec synthesizes the header at encode time and strips it at decode
//! time; it never parses arbitrary WAV files (that is a caller concern).

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{MybrError, Result};
use crate::track::SAMPLE_WIDTH_BYTES;

/// Size of the canonical RIFF/WAVE/fmt/data header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Format tag for uncompressed PCM in the fmt chunk.
pub const WAV_FORMAT_PCM: u16 = 1;

/// Fields recovered from a canonical embedded WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavBlockHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Byte length of the data chunk (the raw PCM that follows).
    pub data_size: u32,
}

/// Write the canonical 44-byte header for a 16-bit PCM stream.
///
/// Layout: `RIFF` + chunk_size (36 + data_size) + `WAVE`, then a 16-byte
/// `fmt ` chunk (PCM tag 1), then the `data` chunk header.
///
/// # Errors
///
/// Returns [`MybrError::ContainerTooLarge`] if `data_size` cannot be framed
/// (chunk_size must also fit in a u32).
pub fn write_wav_header<W: Write>(
    writer: &mut W,
    channels: u8,
    sample_rate: u32,
    data_size: u32,
) -> Result<()> {
    let chunk_size = 36u32
        .checked_add(data_size)
        .ok_or(MybrError::ContainerTooLarge {
            size: 36 + data_size as u64,
        })?;
    let block_align = channels as u16 * SAMPLE_WIDTH_BYTES as u16;
    let byte_rate = (sample_rate as u64 * block_align as u64) as u32;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(chunk_size)?;
    writer.write_all(b"WAVE")?;
    writer.write_all(b"fmt ")?;
    // fmt chunk body is always 16 bytes for plain PCM
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(WAV_FORMAT_PCM)?;
    writer.write_u16::<LittleEndian>(channels as u16)?;
    writer.write_u32::<LittleEndian>(sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate)?;
    writer.write_u16::<LittleEndian>(block_align)?;
    writer.write_u16::<LittleEndian>(SAMPLE_WIDTH_BYTES as u16 * 8)?;
    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_size)?;
    Ok(())
}

/// Parse a canonical embedded WAV header, verifying the RIFF/WAVE/fmt/data
/// framing and the PCM format tag. `track` is used only for error reporting.
///
/// # Errors
///
/// Returns [`MybrError::MalformedWavBlock`] if any tag or the fmt chunk
/// deviates from the canonical form.
pub fn read_wav_header<R: Read>(reader: &mut R, track: usize) -> Result<WavBlockHeader> {
    let mut tag = [0u8; 4];

    reader.read_exact(&mut tag)?;
    if &tag != b"RIFF" {
        return Err(MybrError::MalformedWavBlock { track });
    }
    let _chunk_size = reader.read_u32::<LittleEndian>()?;

    reader.read_exact(&mut tag)?;
    if &tag != b"WAVE" {
        return Err(MybrError::MalformedWavBlock { track });
    }

    reader.read_exact(&mut tag)?;
    if &tag != b"fmt " {
        return Err(MybrError::MalformedWavBlock { track });
    }
    let fmt_size = reader.read_u32::<LittleEndian>()?;
    if fmt_size != 16 {
        return Err(MybrError::MalformedWavBlock { track });
    }
    let format_tag = reader.read_u16::<LittleEndian>()?;
    if format_tag != WAV_FORMAT_PCM {
        return Err(MybrError::MalformedWavBlock { track });
    }
    let channels = reader.read_u16::<LittleEndian>()?;
    let sample_rate = reader.read_u32::<LittleEndian>()?;
    let _byte_rate = reader.read_u32::<LittleEndian>()?;
    let _block_align = reader.read_u16::<LittleEndian>()?;
    let bits_per_sample = reader.read_u16::<LittleEndian>()?;

    reader.read_exact(&mut tag)?;
    if &tag != b"data" {
        return Err(MybrError::MalformedWavBlock { track });
    }
    let data_size = reader.read_u32::<LittleEndian>()?;

    Ok(WavBlockHeader {
        channels,
        sample_rate,
        bits_per_sample,
        data_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_is_exactly_44_bytes() {
        let mut buf = Vec::new();
        write_wav_header(&mut buf, 2, 44100, 4000).unwrap();
        assert_eq!(buf.len(), WAV_HEADER_SIZE);
    }

    #[test]
    fn test_header_field_layout() {
        let mut buf = Vec::new();
        write_wav_header(&mut buf, 2, 44100, 4000).unwrap();

        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(buf[4..8].try_into().unwrap()), 4036); // 36 + data_size
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(&buf[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(buf[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(buf[20..22].try_into().unwrap()), 1); // PCM
        assert_eq!(u16::from_le_bytes(buf[22..24].try_into().unwrap()), 2); // channels
        assert_eq!(u32::from_le_bytes(buf[24..28].try_into().unwrap()), 44100);
        assert_eq!(u32::from_le_bytes(buf[28..32].try_into().unwrap()), 176400); // byte rate
        assert_eq!(u16::from_le_bytes(buf[32..34].try_into().unwrap()), 4); // block align
        assert_eq!(u16::from_le_bytes(buf[34..36].try_into().unwrap()), 16); // bit depth
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(u32::from_le_bytes(buf[40..44].try_into().unwrap()), 4000);
    }

    #[test]
    fn test_write_read_round_trip() {
        let mut buf = Vec::new();
        write_wav_header(&mut buf, 1, 22050, 1000).unwrap();

        let header = read_wav_header(&mut Cursor::new(&buf), 0).unwrap();
        assert_eq!(header.channels, 1);
        assert_eq!(header.sample_rate, 22050);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.data_size, 1000);
    }

    #[test]
    fn test_non_riff_rejected() {
        let buf = vec![0u8; WAV_HEADER_SIZE];
        let err = read_wav_header(&mut Cursor::new(&buf), 3).unwrap_err();
        assert!(matches!(err, MybrError::MalformedWavBlock { track: 3 }));
    }

    #[test]
    fn test_non_pcm_format_tag_rejected() {
        let mut buf = Vec::new();
        write_wav_header(&mut buf, 2, 44100, 64).unwrap();
        // Overwrite the format tag with IEEE float (3)
        buf[20] = 3;
        let err = read_wav_header(&mut Cursor::new(&buf), 0).unwrap_err();
        assert!(matches!(err, MybrError::MalformedWavBlock { track: 0 }));
    }

    #[test]
    fn test_oversized_data_rejected() {
        let mut buf = Vec::new();
        let err = write_wav_header(&mut buf, 2, 44100, u32::MAX).unwrap_err();
        assert!(matches!(err, MybrError::ContainerTooLarge { .. }));
    }
}
