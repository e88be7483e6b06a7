//! Click player benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mc_engine::{ClickPlayer, PlayerConfig};
use mc_ir::{BeatIndex, DecodedSample};

const BLOCK_SIZES: &[usize] = &[64, 256, 512, 1024, 4096];

fn click(frames: usize) -> DecodedSample {
    let data = (0..frames)
        .map(|i| (1.0 - i as f32 / frames as f32) * if i % 40 < 20 { 0.8 } else { -0.8 })
        .collect();
    DecodedSample::new("bench", 44100, 16, data)
}

/// A click streaming through every block, retriggered on each new beat.
fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("click_process");

    for &size in BLOCK_SIZES {
        group.throughput(Throughput::Elements(size as u64));

        let mut player = ClickPlayer::new(PlayerConfig::default()).unwrap();
        player.set_primary(click(44100));
        player.set_secondary(click(22050));
        player.play();
        let mut buffer = vec![0.0f32; size * 2];
        let mut beat = 1u32;

        group.bench_with_input(BenchmarkId::new("streaming", size), &size, |b, &size| {
            b.iter(|| {
                beat = beat % 4 + 1;
                let index = BeatIndex::new(beat as f32);
                black_box(player.process(&mut buffer, true, size, 1.0, index))
            })
        });
    }

    group.finish();
}

/// Playing with nothing sounding: the per-callback floor.
fn bench_idle(c: &mut Criterion) {
    let mut player = ClickPlayer::new(PlayerConfig::default()).unwrap();
    player.play();
    let mut buffer = vec![0.0f32; 512 * 2];

    c.bench_function("click_process_idle_512", |b| {
        b.iter(|| black_box(player.process(&mut buffer, true, 512, 1.0, BeatIndex::UNKNOWN)))
    });
}

criterion_group!(benches, bench_process, bench_idle);
criterion_main!(benches);
