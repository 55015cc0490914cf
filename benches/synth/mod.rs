//! Benchmarks for complete synth rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use justsynth::{synth, SampleSettings, SampleSound, SoundKind, SynthConfig};

use crate::BLOCK_SIZES;

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/render");
    let config = SynthConfig::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Four-note sine chord, all voices sounding.
        let (mut handle, mut sine) = synth::channel(48_000.0, &config, ());
        for note in [48, 60, 64, 67] {
            handle.note_on(note, 100);
        }
        group.bench_with_input(BenchmarkId::new("sine_chord", size), &size, |b, _| {
            b.iter(|| sine.render_block(black_box(&mut buffer)))
        });

        // Every voice busy.
        let (mut handle, mut full) = synth::channel(48_000.0, &config, ());
        for note in 0..config.voices as u8 {
            handle.note_on(48 + note, 100);
        }
        group.bench_with_input(BenchmarkId::new("sine_full", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut buffer)))
        });

        // Sampled chord. Voices stop once the 10 s sample runs out.
        let sampled_config = SynthConfig {
            sound: SoundKind::Sampled,
            ..config.clone()
        };
        let tone: Vec<f32> = (0..480_000)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        let (mut handle, mut sampled) = synth::channel(48_000.0, &sampled_config, ());
        if let Ok(sound) = SampleSound::from_samples("bench", tone, 48_000, &SampleSettings::default()) {
            handle.install_sample(sound);
        }
        for note in [48, 60, 64, 67] {
            handle.note_on(note, 100);
        }
        group.bench_with_input(BenchmarkId::new("sampled_chord", size), &size, |b, _| {
            b.iter(|| sampled.render_block(black_box(&mut buffer)))
        });

        // Interleaved stereo output as the audio callback sees it.
        let (mut handle, mut stereo) = synth::channel(48_000.0, &config, ());
        for note in [48, 60, 64, 67] {
            handle.note_on(note, 100);
        }
        let mut interleaved = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("stereo_chord", size), &size, |b, _| {
            b.iter(|| stereo.render_interleaved(black_box(&mut interleaved), 2))
        });
    }

    group.finish();
}
