use justsynth::{
    synth::{self, SynthVoice, Voice},
    ReferenceAnchor, SampleSettings, SampleSound, SoundKind, SynthConfig, TuningSystem,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

#[test]
fn renders_silence_with_no_notes() {
    let (_handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    let mut buffer = vec![1.0f32; 512];
    synth.render_block(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 0.0));
}

#[test]
fn sine_note_is_audible_and_bounded() {
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    handle.note_on(69, 127);

    let mut buffer = vec![0.0f32; 1024];
    synth.render_block(&mut buffer);

    let level = peak(&buffer);
    assert!(level > 0.14 && level <= 0.15 + 1e-6, "peak {level}");
    assert_eq!(synth.snapshot().active_voices, 1);
}

#[test]
fn released_note_tails_off_to_silence() {
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    let mut buffer = vec![0.0f32; 256];

    handle.note_on(60, 100);
    synth.render_block(&mut buffer);
    handle.note_off(60);
    synth.render_block(&mut buffer);
    assert_eq!(synth.snapshot().active_voices, 1);

    synth.render_block(&mut buffer);
    synth.render_block(&mut buffer);
    assert_eq!(synth.snapshot().active_voices, 0);

    synth.render_block(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 0.0));
}

#[test]
fn all_sound_off_cuts_immediately() {
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    let mut buffer = vec![0.0f32; 256];

    for note in [60, 64, 67] {
        handle.note_on(note, 100);
    }
    synth.render_block(&mut buffer);
    assert!(peak(&buffer) > 0.0);

    handle.all_sound_off();
    synth.render_block(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 0.0));
    assert_eq!(synth.snapshot().held_count, 0);
}

#[test]
fn interleaved_output_duplicates_every_channel() {
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    handle.note_on(60, 100);
    handle.note_on(67, 100);

    let channels = 2;
    let mut buffer = vec![0.0f32; 4096 * channels];
    synth.render_interleaved(&mut buffer, channels);

    assert!(peak(&buffer) > 0.0);
    for frame in buffer.chunks_exact(channels) {
        assert_eq!(frame[0], frame[1]);
    }
    assert_eq!(synth.frame_counter(), 4096);
}

#[test]
fn interleaved_matches_mono_render() {
    let config = SynthConfig::default();
    let (mut mono_handle, mut mono) = synth::channel(SAMPLE_RATE, &config, ());
    let (mut stereo_handle, mut stereo) = synth::channel(SAMPLE_RATE, &config, ());
    mono_handle.note_on(64, 90);
    stereo_handle.note_on(64, 90);

    let mut left = vec![0.0f32; 300];
    let mut interleaved = vec![0.0f32; 600];
    mono.render_block(&mut left);
    stereo.render_interleaved(&mut interleaved, 2);

    for (i, &sample) in left.iter().enumerate() {
        assert_eq!(interleaved[i * 2], sample);
    }
}

#[test]
fn sampled_mode_without_a_sample_is_silent() {
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), ());
    handle.set_sound_source(SoundKind::Sampled);
    handle.note_on(60, 100);

    let mut buffer = vec![0.0f32; 512];
    synth.render_block(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 0.0));
    // The key is held, but a note that cannot sound does not seed the anchor.
    assert_eq!(synth.snapshot().held_count, 1);
    assert!(synth.snapshot().anchor.is_none());
}

#[test]
fn first_audible_sampled_note_seeds_the_anchor() {
    let config = SynthConfig {
        tuning: TuningSystem::FiveLimit,
        sound: SoundKind::Sampled,
        ..Default::default()
    };
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &config, ());
    let mut buffer = vec![0.0f32; 64];

    handle.note_on(67, 100);
    synth.render_block(&mut buffer);
    assert_eq!(synth.tuning().anchor(), None);

    let sound =
        SampleSound::from_samples("dc", vec![0.5; 4800], 48_000, &SampleSettings::default())
            .unwrap();
    handle.install_sample(sound);
    handle.note_on(64, 100);
    synth.render_block(&mut buffer);

    // Seeded by E against the sample root C, not by the silent G.
    assert_eq!(
        synth.tuning().anchor(),
        Some(ReferenceAnchor::new(64, 1.25))
    );
    let increment = synth.pool().voices().iter().find_map(|v| match v {
        Voice::Sampled(s) if s.is_active() => Some(s.increment()),
        _ => None,
    });
    assert_eq!(increment, Some(1.25));
}

#[test]
fn sampled_voices_play_at_just_ratios() {
    let config = SynthConfig {
        tuning: TuningSystem::FiveLimit,
        sound: SoundKind::Sampled,
        ..Default::default()
    };
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &config, ());
    let sound = SampleSound::from_samples("dc", vec![0.5; 48_000], 48_000, &SampleSettings::default())
        .unwrap();
    handle.install_sample(sound);

    // Root note plays unshifted; a fifth above it plays at 3/2.
    handle.note_on(60, 127);
    handle.note_on(67, 127);
    let mut buffer = vec![0.0f32; 128];
    synth.render_block(&mut buffer);
    assert!(peak(&buffer) > 0.9);

    let increments: Vec<(u8, f64)> = synth
        .pool()
        .voices()
        .iter()
        .filter_map(|v| match v {
            Voice::Sampled(s) if s.is_active() => Some((s.note(), s.increment())),
            _ => None,
        })
        .collect();
    assert_eq!(increments.len(), 2);
    for (note, increment) in increments {
        let expected = if note == 60 { 1.0 } else { 1.5 };
        assert!((increment - expected).abs() < 1e-12, "note {note}: {increment}");
    }
}

#[test]
fn replacing_a_sample_stops_sampled_voices() {
    let config = SynthConfig {
        sound: SoundKind::Sampled,
        ..Default::default()
    };
    let settings = SampleSettings::default();
    let (mut handle, mut synth) = synth::channel(SAMPLE_RATE, &config, ());
    let mut buffer = vec![0.0f32; 64];

    handle.install_sample(SampleSound::from_samples("a", vec![0.25; 4800], 48_000, &settings).unwrap());
    handle.note_on(60, 100);
    synth.render_block(&mut buffer);
    assert_eq!(synth.snapshot().active_voices, 1);

    handle.install_sample(SampleSound::from_samples("b", vec![0.25; 4800], 48_000, &settings).unwrap());
    synth.render_block(&mut buffer);
    assert_eq!(synth.snapshot().active_voices, 0);
    assert!(buffer.iter().all(|&s| s == 0.0));
    assert_eq!(handle.collect_retired(), 1);
}

#[test]
fn midi_queue_is_drained_after_the_control_queue() {
    let (mut midi_tx, midi_rx) = rtrb::RingBuffer::new(8);
    let (_handle, mut synth) = synth::channel(SAMPLE_RATE, &SynthConfig::default(), midi_rx);

    let bytes = [0x90, 60, 100];
    let event = justsynth::io::midi::MidiEvent::parse(&bytes).unwrap();
    let msg = justsynth::io::converter::midi_to_synth(event, None).unwrap();
    midi_tx.push(msg).unwrap();

    let mut buffer = vec![0.0f32; 64];
    synth.render_block(&mut buffer);
    assert!(synth.snapshot().is_held(60));
    assert!(peak(&buffer) > 0.0);
}
