//! Example: Read and inspect a MYBR file.
//!
//! Creates a temporary MYBR file, then reads it back and prints the
//! global header, loop metadata, and every track header.

use std::path::Path;

use mybr_format::{
    LoopMetadata, LoopMode, MybrReader, MybrWriter, PayloadConvention, TrackInfo, TrackSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First, create a test file in a temp directory
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("demo.mybr");

    // Prepare sample data: 1 second of silence per track
    let mono_pcm = vec![0u8; 44100 * 2]; // 1s mono (i16 = 2 bytes/sample)
    let stereo_pcm = vec![0u8; 44100 * 2 * 2]; // 1s stereo

    let mut writer = MybrWriter::new(PayloadConvention::WavBlock);
    writer.add_track(TrackSource::from_pcm(
        TrackInfo::new("drums", 2, 44100, 44100),
        stereo_pcm,
    ))?;
    writer.add_track(TrackSource::from_pcm(
        TrackInfo::new("vocals", 1, 44100, 44100),
        mono_pcm,
    ))?;
    writer.set_loop_mode(LoopMode::Manual {
        start_sample: 11025,
        end_sample: 44100,
    });
    writer.finalize(&path)?;

    // Now read it back
    println!("=== MYBR File Inspector ===\n");

    let mut reader = MybrReader::open(Path::new(&path))?;

    println!("Header:");
    println!("  Tracks:      {}", reader.track_count());
    println!("  Convention:  {}", reader.convention().as_str());
    println!("  File size:   {} bytes", reader.input_len());
    match reader.loop_metadata() {
        LoopMetadata::Disabled => println!("  Loop:        disabled"),
        LoopMetadata::Enabled(spec) => {
            println!("  Loop:        {}..{}", spec.start_sample, spec.end_sample)
        }
        LoopMetadata::Invalid { violation, .. } => println!("  Loop:        INVALID ({})", violation),
    }

    println!("\nTracks:");
    // Collect infos first so we can iterate without borrowing reader
    let tracks = reader.tracks();
    for (i, info) in tracks.iter().enumerate() {
        println!(
            "  [{}] {} — {} ch, {} Hz, {} frames ({:.2}s)",
            i,
            info.name,
            info.channels,
            info.sample_rate,
            info.num_samples,
            info.duration_secs(),
        );

        // Read the actual data
        let data = reader.read_track_pcm(i)?;
        println!(
            "      PCM size: {} bytes at offset {}",
            data.len(),
            reader.track_data_offset(i).unwrap()
        );
    }

    println!("\n✓ File read successfully");
    Ok(())
}
