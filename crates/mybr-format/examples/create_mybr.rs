//! Example: Create a MYBR file with synthetic audio data.
//!
//! Generates sine waves, encodes them as 16-bit PCM, and writes a .mybr
//! file with two tracks and a loop over the first half of track 0.

use std::path::Path;

use mybr_format::{LoopMode, MybrWriter, PayloadConvention, TrackInfo, TrackSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = 48000u32;
    let duration_secs = 2u32;
    let frames = sample_rate * duration_secs;

    // Generate a stereo lead (440 Hz left, 880 Hz right) and a mono bass
    let lead = generate_sine_stereo(440.0, 880.0, sample_rate, duration_secs);
    let bass = generate_sine_mono(110.0, sample_rate, duration_secs);

    let lead_bytes = samples_to_bytes(&lead);
    let bass_bytes = samples_to_bytes(&bass);

    // Build the container using the writer builder
    let mut writer = MybrWriter::new(PayloadConvention::RawPcm);
    writer.add_track(TrackSource::from_pcm(
        TrackInfo::new("lead", 2, sample_rate, frames),
        lead_bytes,
    ))?;
    writer.add_track(TrackSource::from_pcm(
        TrackInfo::new("bass", 1, sample_rate, frames),
        bass_bytes,
    ))?;

    // Loop the first second of the reference track
    writer.set_loop_mode(LoopMode::Manual {
        start_sample: 0,
        end_sample: sample_rate,
    });

    // Write the file to disk
    let output_path = Path::new("example_output.mybr");
    writer.finalize(output_path)?;

    println!("Created: {}", output_path.display());
    println!("  Tracks: lead (440/880 Hz stereo), bass (110 Hz mono)");
    println!(
        "  Duration: {}s, Sample rate: {} Hz, Loop: 0..{}",
        duration_secs, sample_rate, sample_rate
    );

    // Clean up
    std::fs::remove_file(output_path)?;
    println!("  (Cleaned up temp file)");

    Ok(())
}

/// Generate interleaved stereo sine wave samples.
fn generate_sine_stereo(freq_l: f32, freq_r: f32, rate: u32, secs: u32) -> Vec<i16> {
    let total_frames = (rate * secs) as usize;
    let mut samples = Vec::with_capacity(total_frames * 2);
    for i in 0..total_frames {
        let t = i as f32 / rate as f32;
        samples.push(to_i16((2.0 * std::f32::consts::PI * freq_l * t).sin() * 0.5));
        samples.push(to_i16((2.0 * std::f32::consts::PI * freq_r * t).sin() * 0.5));
    }
    samples
}

/// Generate mono sine wave samples.
fn generate_sine_mono(freq: f32, rate: u32, secs: u32) -> Vec<i16> {
    let total_frames = (rate * secs) as usize;
    (0..total_frames)
        .map(|i| {
            let t = i as f32 / rate as f32;
            to_i16((2.0 * std::f32::consts::PI * freq * t).sin() * 0.5)
        })
        .collect()
}

fn to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32) as i16
}

/// Convert i16 samples to little-endian byte buffer.
fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        buf.extend_from_slice(&s.to_le_bytes());
    }
    buf
}
