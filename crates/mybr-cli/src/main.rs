//! MYBR CLI — Command-line interface for the MYBR audio container.
//!
//! Provides commands for encoding WAV files into `.mybr` containers,
//! decoding `.mybr` files back to WAV, and inspecting container metadata.
//!
//! # Usage
//!
//! ```bash
//! mybr encode drums.wav bass.wav -o song.mybr --names drums,bass
//! mybr encode song.wav -o song.mybr --loop 0:44100
//! mybr encode song.wav -o song.mybr --loop-intro intro.wav --loop-segment verse.wav
//! mybr decode song.mybr -o out_dir/
//! mybr decode song.mybr -o out_dir/ --track drums
//! mybr info song.mybr --json
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use mybr_format::{
    LoopMetadata, LoopMode, MybrReader, MybrWriter, PayloadConvention, TrackInfo, TrackSource,
};

// ───────────────────────────── CLI definition ─────────────────────────────

/// Top-level CLI entry point for the `mybr` binary.
#[derive(Parser)]
#[command(
    name = "mybr",
    about = "MYBR -- multi-track looping audio containers",
    version,
    long_about = "Encode, decode, and inspect MYBR files: multi-track 16-bit PCM\n\
                  containers with loop metadata anchored to the first track."
)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available sub-commands.
#[derive(Subcommand)]
enum Commands {
    /// Encode one or more WAV files into a .mybr container.
    Encode {
        /// Input WAV file paths (one per track, 16-bit PCM).
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output .mybr file path.
        #[arg(short, long)]
        output: PathBuf,

        /// Comma-separated track names (e.g., "drums,bass").
        /// If omitted, names are derived from input file names.
        #[arg(short, long)]
        names: Option<String>,

        /// Payload convention (raw-pcm, wav-block).
        #[arg(short, long, default_value = "raw-pcm")]
        payload: String,

        /// Loop points over the first track as "START:END" sample frames.
        #[arg(
            long = "loop",
            value_name = "START:END",
            conflicts_with_all = ["loop_start_ref", "loop_intro"]
        )]
        loop_points: Option<String>,

        /// WAV file whose frame count becomes the loop start.
        #[arg(long, value_name = "WAV", requires = "loop_end_ref", conflicts_with = "loop_intro")]
        loop_start_ref: Option<PathBuf>,

        /// WAV file whose frame count becomes the loop end.
        #[arg(long, value_name = "WAV", requires = "loop_start_ref")]
        loop_end_ref: Option<PathBuf>,

        /// WAV file whose frame count becomes the loop start.
        #[arg(long, value_name = "WAV", requires = "loop_segment")]
        loop_intro: Option<PathBuf>,

        /// WAV file whose frame count, added to the intro, becomes the loop end.
        #[arg(long, value_name = "WAV", requires = "loop_intro")]
        loop_segment: Option<PathBuf>,
    },

    /// Decode a .mybr file back to WAV files.
    Decode {
        /// Input .mybr file path.
        input: PathBuf,

        /// Output directory for extracted WAV files.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Extract a single track by name or index.
        #[arg(long)]
        track: Option<String>,
    },

    /// Display detailed information about a .mybr file.
    Info {
        /// Input .mybr file path.
        input: PathBuf,

        /// Output file information as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ────────────────────────────── main ──────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            names,
            payload,
            loop_points,
            loop_start_ref,
            loop_end_ref,
            loop_intro,
            loop_segment,
        } => cmd_encode(
            &input,
            &output,
            names.as_deref(),
            &payload,
            loop_points.as_deref(),
            loop_start_ref.as_deref(),
            loop_end_ref.as_deref(),
            loop_intro.as_deref(),
            loop_segment.as_deref(),
        ),

        Commands::Decode {
            input,
            output,
            track,
        } => cmd_decode(&input, &output, track.as_deref()),

        Commands::Info { input, json } => cmd_info(&input, json),
    }
}

// ──────────────────────────── encode ──────────────────────────────

/// Encode one or more WAV files into a `.mybr` container.
///
/// Each input WAV becomes a separate track. Track names can be provided
/// explicitly via `--names` (comma-separated) or are derived from the
/// input file names. Loop points validate against the first input.
#[allow(clippy::too_many_arguments)]
fn cmd_encode(
    inputs: &[PathBuf],
    output: &Path,
    names_arg: Option<&str>,
    payload_name: &str,
    loop_points: Option<&str>,
    loop_start_ref: Option<&Path>,
    loop_end_ref: Option<&Path>,
    loop_intro: Option<&Path>,
    loop_segment: Option<&Path>,
) -> Result<()> {
    let names = resolve_track_names(inputs, names_arg)?;
    let convention = parse_convention_name(payload_name)?;

    if inputs.len() > 255 {
        bail!(
            "MYBR supports a maximum of 255 tracks, but {} inputs were provided",
            inputs.len()
        );
    }

    let loop_mode = resolve_loop_mode(
        loop_points,
        loop_start_ref,
        loop_end_ref,
        loop_intro,
        loop_segment,
    )?;

    println!("\n  MYBR Encoder");
    println!("  ============================================");

    let mut writer = MybrWriter::new(convention);
    for (i, wav_path) in inputs.iter().enumerate() {
        let track = read_wav(wav_path)
            .with_context(|| format!("Failed to read WAV file: {}", wav_path.display()))?;
        let info = TrackInfo::new(
            names[i].clone(),
            track.channels,
            track.sample_rate,
            track.num_samples,
        );
        println!(
            "  {} [{}] {}ch {}Hz {:.2}s ({} frames)",
            names[i],
            wav_path.display(),
            info.channels,
            info.sample_rate,
            info.duration_secs(),
            info.num_samples,
        );
        writer
            .add_track(TrackSource::from_pcm(info, track.pcm))
            .with_context(|| format!("Failed to add track '{}'", names[i]))?;
    }

    writer.set_loop_mode(loop_mode);
    writer.set_progress(Box::new(|percent, stage| {
        println!("  [{percent:>3}%] {stage}");
    }));

    writer
        .finalize(output)
        .with_context(|| format!("Failed to write MYBR file: {}", output.display()))?;

    let file_size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);

    println!("  --------------------------------------------");
    println!("  Output:  {} ({} bytes)", output.display(), file_size);
    println!("  Tracks:  {}", inputs.len());
    println!("  Payload: {}", convention.as_str());
    match loop_mode {
        LoopMode::Disabled => println!("  Loop:    disabled"),
        _ => println!("  Loop:    enabled"),
    }
    println!("  Done!\n");

    Ok(())
}

/// Build a [`LoopMode`] from the mutually exclusive loop flag groups.
fn resolve_loop_mode(
    loop_points: Option<&str>,
    loop_start_ref: Option<&Path>,
    loop_end_ref: Option<&Path>,
    loop_intro: Option<&Path>,
    loop_segment: Option<&Path>,
) -> Result<LoopMode> {
    if let Some(points) = loop_points {
        let (start_sample, end_sample) = parse_loop_points(points)?;
        return Ok(LoopMode::Manual {
            start_sample,
            end_sample,
        });
    }
    if let (Some(start_ref), Some(end_ref)) = (loop_start_ref, loop_end_ref) {
        return Ok(LoopMode::ReferenceAbsolute {
            start_ref_frames: frames_in_wav(start_ref)?,
            end_ref_frames: frames_in_wav(end_ref)?,
        });
    }
    if let (Some(intro), Some(segment)) = (loop_intro, loop_segment) {
        return Ok(LoopMode::ReferenceSegment {
            intro_frames: frames_in_wav(intro)?,
            segment_frames: frames_in_wav(segment)?,
        });
    }
    Ok(LoopMode::Disabled)
}

/// Parse a "START:END" loop flag value into sample frame offsets.
fn parse_loop_points(value: &str) -> Result<(u32, u32)> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Loop points must be \"START:END\", got '{}'", value))?;
    let start: u32 = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid loop start '{}'", start))?;
    let end: u32 = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid loop end '{}'", end))?;
    Ok((start, end))
}

// ──────────────────────────── decode ──────────────────────────────

/// Decode a `.mybr` file, extracting tracks back to WAV files.
///
/// If `--track <name-or-index>` is specified only that track is
/// extracted; otherwise every track is. Invalid loop metadata is
/// reported but never blocks extraction.
fn cmd_decode(input: &Path, output_dir: &Path, track_filter: Option<&str>) -> Result<()> {
    let mut reader = MybrReader::open(input)
        .with_context(|| format!("Failed to open MYBR file: {}", input.display()))?;

    let tracks = reader.tracks();

    println!("\n  MYBR Decoder");
    println!("  ============================================");
    println!("  Input:   {}", input.display());
    println!("  Tracks:  {}", tracks.len());
    println!("  Payload: {}", reader.convention().as_str());

    if let LoopMetadata::Invalid { violation, .. } = reader.loop_metadata() {
        println!("  Warning: loop metadata is invalid ({violation}); continuing without it");
    }

    let targets = select_tracks(&tracks, track_filter)?;

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let mut used_names = HashSet::new();
    for &index in &targets {
        let info = &tracks[index];
        let pcm = reader
            .read_track_pcm(index)
            .with_context(|| format!("Failed to read track {} ('{}')", index, info.name))?;

        let wav_path = output_dir.join(track_filename(&info.name, index, &mut used_names));
        write_wav(&wav_path, &pcm, info.channels, info.sample_rate)
            .with_context(|| format!("Failed to write WAV file: {}", wav_path.display()))?;

        let wav_size = std::fs::metadata(&wav_path).map(|m| m.len()).unwrap_or(0);
        println!(
            "  Extracted: {} ({:.2}s, {}ch, {} bytes)",
            wav_path.display(),
            info.duration_secs(),
            info.channels,
            wav_size,
        );
    }

    println!("  --------------------------------------------");
    println!(
        "  Extracted {} track(s) to {}",
        targets.len(),
        output_dir.display()
    );
    println!("  Done!\n");

    Ok(())
}

/// Resolve the `--track` selector to track indices.
///
/// Names are matched case-insensitively first; a selector that matches no
/// name is treated as a numeric index.
fn select_tracks(tracks: &[TrackInfo], filter: Option<&str>) -> Result<Vec<usize>> {
    let Some(selector) = filter else {
        return Ok((0..tracks.len()).collect());
    };

    let matching: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, info)| info.name.eq_ignore_ascii_case(selector))
        .map(|(i, _)| i)
        .collect();
    if !matching.is_empty() {
        return Ok(matching);
    }

    if let Ok(index) = selector.parse::<usize>() {
        if index < tracks.len() {
            return Ok(vec![index]);
        }
        bail!(
            "Track index {} out of range ({} tracks)",
            index,
            tracks.len()
        );
    }

    let available: Vec<&str> = tracks.iter().map(|info| info.name.as_str()).collect();
    bail!(
        "Track '{}' not found. Available tracks: {}",
        selector,
        available.join(", ")
    );
}

/// Pick an output file name for a track, keeping duplicates and empty
/// names from colliding on disk.
fn track_filename(name: &str, index: usize, used: &mut HashSet<String>) -> String {
    // Track names are untrusted input; keep path separators out of them
    let base: String = if name.is_empty() {
        format!("track_{index}")
    } else {
        name.chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect()
    };

    let mut candidate = format!("{base}.wav");
    if !used.insert(candidate.clone()) {
        candidate = format!("{base}_{index}.wav");
        used.insert(candidate.clone());
    }
    candidate
}

// ───────────────────────────── info ───────────────────────────────

/// Display detailed information about a `.mybr` file.
///
/// If `--json` is specified, outputs the full info structure as JSON.
/// Otherwise, prints a human-readable summary.
fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let reader = MybrReader::open(input)
        .with_context(|| format!("Failed to open MYBR file: {}", input.display()))?;

    let tracks = reader.tracks();
    let data_offsets: Vec<u32> = (0..tracks.len())
        .map(|i| reader.track_data_offset(i).unwrap_or(0))
        .collect();

    let info = FileInfo {
        path: input,
        file_size: reader.input_len(),
        track_count: reader.header().track_count,
        convention: reader.convention(),
        loop_metadata: *reader.loop_metadata(),
        tracks: &tracks,
        data_offsets: &data_offsets,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info.to_json())?);
    } else {
        info.print_human();
    }

    Ok(())
}

/// Collected information about a `.mybr` file, used for display.
struct FileInfo<'a> {
    /// Path to the `.mybr` file.
    path: &'a Path,
    /// Total file size in bytes.
    file_size: u64,
    /// Track count from the global header.
    track_count: u8,
    /// Payload convention detected from the first payload.
    convention: PayloadConvention,
    /// Loop metadata after validation against track 0.
    loop_metadata: LoopMetadata,
    /// Per-track headers in container order.
    tracks: &'a [TrackInfo],
    /// Absolute payload offsets in container order.
    data_offsets: &'a [u32],
}

impl FileInfo<'_> {
    /// Build a JSON representation of the file info.
    fn to_json(&self) -> serde_json::Value {
        let track_array: Vec<serde_json::Value> = self
            .tracks
            .iter()
            .zip(self.data_offsets)
            .enumerate()
            .map(|(i, (t, offset))| {
                serde_json::json!({
                    "index": i,
                    "name": t.name,
                    "channels": t.channels,
                    "sample_rate": t.sample_rate,
                    "num_samples": t.num_samples,
                    "duration_secs": t.duration_secs(),
                    "data_offset": offset,
                    "pcm_bytes": t.pcm_len(),
                })
            })
            .collect();

        let loop_value = match &self.loop_metadata {
            LoopMetadata::Disabled => serde_json::json!({ "enabled": false }),
            LoopMetadata::Enabled(spec) => serde_json::json!({
                "enabled": true,
                "valid": true,
                "start_sample": spec.start_sample,
                "end_sample": spec.end_sample,
            }),
            LoopMetadata::Invalid {
                start_sample,
                end_sample,
                violation,
            } => serde_json::json!({
                "enabled": true,
                "valid": false,
                "start_sample": start_sample,
                "end_sample": end_sample,
                "violation": violation.to_string(),
            }),
        };

        serde_json::json!({
            "file": self.path.display().to_string(),
            "file_size": self.file_size,
            "header": {
                "magic": "MYBR",
                "track_count": self.track_count,
            },
            "payload_convention": self.convention.as_str(),
            "loop": loop_value,
            "tracks": track_array,
        })
    }

    /// Print a human-readable summary of the `.mybr` file.
    fn print_human(&self) {
        println!();
        println!("  MYBR File Information");
        println!("  ============================================");
        println!("  File:     {}", self.path.display());
        println!(
            "  Size:     {} bytes ({})",
            self.file_size,
            human_size(self.file_size)
        );
        println!("  Magic:    MYBR (0x5242594D)");
        println!("  Tracks:   {}", self.track_count);
        println!("  Payload:  {}", self.convention.as_str());

        match &self.loop_metadata {
            LoopMetadata::Disabled => println!("  Loop:     disabled"),
            LoopMetadata::Enabled(spec) => println!(
                "  Loop:     {}..{} (frames of track 0)",
                spec.start_sample, spec.end_sample
            ),
            LoopMetadata::Invalid {
                start_sample,
                end_sample,
                violation,
            } => println!(
                "  Loop:     INVALID {}..{} ({})",
                start_sample, end_sample, violation
            ),
        }

        println!();
        println!("  Tracks");
        println!("  --------------------------------------------");
        for (i, (t, offset)) in self.tracks.iter().zip(self.data_offsets).enumerate() {
            let name = if t.name.is_empty() { "(unnamed)" } else { &t.name };
            println!(
                "  [{}] {} | {}ch | {} Hz | {:.2}s | {} frames | {} PCM bytes @ {}",
                i,
                name,
                t.channels,
                t.sample_rate,
                t.duration_secs(),
                t.num_samples,
                t.pcm_len(),
                offset,
            );
        }

        println!();
    }
}

// ──────────────────────── helper functions ─────────────────────────

/// Audio data read from a WAV file.
struct WavTrack {
    /// Interleaved 16-bit PCM as little-endian bytes.
    pcm: Vec<u8>,
    /// Number of audio channels.
    channels: u8,
    /// Sample rate in Hz.
    sample_rate: u32,
    /// Total number of audio frames (samples per channel).
    num_samples: u32,
}

/// Read a 16-bit PCM WAV file into the byte layout the container stores.
fn read_wav(path: &Path) -> Result<WavTrack> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Cannot open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!(
            "{} is {}-bit {}; MYBR tracks are 16-bit integer PCM",
            path.display(),
            spec.bits_per_sample,
            match spec.sample_format {
                hound::SampleFormat::Int => "integer",
                hound::SampleFormat::Float => "float",
            }
        );
    }
    if spec.channels == 0 || spec.channels > u8::MAX as u16 {
        bail!(
            "{} has {} channels; expected 1-255",
            path.display(),
            spec.channels
        );
    }

    let channels = spec.channels as u8;
    let sample_rate = spec.sample_rate;
    let num_samples = reader.duration();

    let mut pcm = Vec::with_capacity(num_samples as usize * channels as usize * 2);
    for sample in reader.into_samples::<i16>() {
        let sample = sample.context("Failed to read WAV sample")?;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(WavTrack {
        pcm,
        channels,
        sample_rate,
        num_samples,
    })
}

/// Write raw 16-bit PCM bytes to a WAV file.
fn write_wav(path: &Path, pcm: &[u8], channels: u8, sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Cannot create WAV file: {}", path.display()))?;

    for chunk in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
    }

    writer.finalize()?;
    Ok(())
}

/// Count the audio frames in a WAV file, for reference-derived loop points.
fn frames_in_wav(path: &Path) -> Result<u32> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Cannot open reference WAV file: {}", path.display()))?;
    Ok(reader.duration())
}

/// Resolve track names from the `--names` argument or from input filenames.
fn resolve_track_names(inputs: &[PathBuf], names_arg: Option<&str>) -> Result<Vec<String>> {
    if let Some(names_str) = names_arg {
        let names: Vec<String> = names_str.split(',').map(|s| s.trim().to_string()).collect();
        if names.len() != inputs.len() {
            bail!(
                "Number of track names ({}) does not match number of input files ({})",
                names.len(),
                inputs.len()
            );
        }
        Ok(names)
    } else {
        Ok(inputs
            .iter()
            .map(|p| {
                p.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("track")
                    .to_string()
            })
            .collect())
    }
}

/// Parse a payload convention name into a [`PayloadConvention`].
fn parse_convention_name(name: &str) -> Result<PayloadConvention> {
    match name.to_lowercase().as_str() {
        "raw-pcm" | "raw" | "pcm" => Ok(PayloadConvention::RawPcm),
        "wav-block" | "wav" => Ok(PayloadConvention::WavBlock),
        _ => bail!(
            "Unknown payload convention '{}'. Supported: raw-pcm, wav-block",
            name
        ),
    }
}

/// Format a byte count as a human-readable size string.
fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GiB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
