//! Benchmarks for note → frequency resolution.

use std::hint::black_box;

use criterion::Criterion;
use justsynth::tuning::{
    resolve, AnchorSeed, ReferenceAnchor, TuningContext, TuningSystem, TuningTable,
};

pub fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning/resolve");
    let anchor = ReferenceAnchor::equal_tempered(60);

    for system in TuningSystem::ALL {
        let table = TuningTable::for_system(system);
        group.bench_function(system.name(), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for note in 0..128u8 {
                    sum += resolve(black_box(note), black_box(&anchor), &table);
                }
                sum
            })
        });
    }

    group.finish();
}

/// I-vi-ii-V loop, re-anchoring on each chord change.
pub fn bench_note_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning/note_events");
    let progression: [[u8; 3]; 4] = [[60, 64, 67], [57, 60, 64], [62, 65, 69], [55, 59, 62]];

    group.bench_function("comma_pump", |b| {
        let mut ctx = TuningContext::new(TuningSystem::FiveLimit);
        b.iter(|| {
            for chord in &progression {
                for &note in chord {
                    black_box(ctx.note_on(note, AnchorSeed::EqualTemperament));
                }
                for &note in chord {
                    ctx.note_off(note);
                }
            }
            ctx.reset();
        })
    });

    group.finish();
}
