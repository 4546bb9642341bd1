//! Benchmarks for the MYBR container format: write, read, and the two
//! payload conventions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mybr_format::{MybrReader, MybrWriter, PayloadConvention, TrackInfo, TrackSource};

/// Track names to cycle through when building multi-track containers.
const NAMES: [&str; 8] = [
    "drums", "bass", "vocals", "melody", "pads", "lead", "fx1", "fx2",
];

/// One second of stereo audio per track.
const FRAMES: u32 = 48000;

/// Create track headers for the given count.
fn test_infos(count: usize) -> Vec<TrackInfo> {
    (0..count)
        .map(|i| TrackInfo::new(NAMES[i], 2, 48000, FRAMES))
        .collect()
}

/// Generate fake PCM audio data (i16 samples, interleaved stereo).
fn generate_pcm_data(frames: u32, channels: u32) -> Vec<u8> {
    let total = (frames * channels) as usize;
    let mut buf = Vec::with_capacity(total * 2);
    for i in 0..total {
        let sample = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin();
        buf.extend_from_slice(&((sample * 20000.0) as i16).to_le_bytes());
    }
    buf
}

/// Write a complete MYBR file and return the temp dir + path.
fn write_test_file(track_count: usize) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.mybr");

    let pcm = generate_pcm_data(FRAMES, 2);
    let mut writer = MybrWriter::new(PayloadConvention::RawPcm);
    for info in test_infos(track_count) {
        writer
            .add_track(TrackSource::from_pcm(info, pcm.clone()))
            .unwrap();
    }
    writer.finalize(&path).unwrap();

    (dir, path)
}

fn bench_write(c: &mut Criterion) {
    let pcm = generate_pcm_data(FRAMES, 2);

    let mut group = c.benchmark_group("mybr_write");
    for track_count in [1usize, 2, 4, 8] {
        let infos = test_infos(track_count);
        group.bench_with_input(
            BenchmarkId::new("tracks", track_count),
            &track_count,
            |b, _| {
                b.iter(|| {
                    let dir = tempfile::tempdir().unwrap();
                    let path = dir.path().join("bench.mybr");
                    let mut writer = MybrWriter::new(PayloadConvention::RawPcm);
                    for info in &infos {
                        writer
                            .add_track(TrackSource::from_pcm(
                                info.clone(),
                                black_box(pcm.clone()),
                            ))
                            .unwrap();
                    }
                    writer.finalize(black_box(&path)).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("mybr_read");
    for track_count in [1usize, 2, 4, 8] {
        let (_dir, path) = write_test_file(track_count);
        group.bench_with_input(
            BenchmarkId::new("tracks", track_count),
            &track_count,
            |b, &count| {
                b.iter(|| {
                    let mut reader = MybrReader::open(black_box(&path)).unwrap();
                    for i in 0..count {
                        let _ = black_box(reader.read_track_pcm(i).unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_conventions(c: &mut Criterion) {
    let pcm = generate_pcm_data(FRAMES, 2);
    let infos = test_infos(4);

    let mut group = c.benchmark_group("mybr_encode_convention");
    for convention in [PayloadConvention::RawPcm, PayloadConvention::WavBlock] {
        group.bench_with_input(
            BenchmarkId::new("convention", convention.as_str()),
            &convention,
            |b, &convention| {
                b.iter(|| {
                    let mut writer = MybrWriter::new(convention);
                    for info in &infos {
                        writer
                            .add_track(TrackSource::from_pcm(
                                info.clone(),
                                black_box(pcm.clone()),
                            ))
                            .unwrap();
                    }
                    let mut out = Vec::new();
                    writer.encode_to(&mut out).unwrap();
                    black_box(out);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_conventions);
criterion_main!(benches);
