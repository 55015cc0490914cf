use crate::{
    config::SynthConfig,
    sample::{SampleSound, SoundKind},
    synth::voice::{OscillatorVoice, SampledVoice, SynthVoice, Voice, VoiceState},
};

/// Fixed set of voices, `voices` of each sound kind.
///
/// Allocation for a kind prefers, in order:
/// 1. the first idle voice,
/// 2. the oldest releasing voice,
/// 3. the oldest sounding voice.
///
/// A note-on therefore never fails while the pool has a voice of that kind.
pub struct VoicePool {
    voices: Vec<Voice>,
}

impl VoicePool {
    pub fn new(sample_rate: f32, config: &SynthConfig) -> Self {
        let mut voices = Vec::with_capacity(config.voices * 2);
        for _ in 0..config.voices {
            voices.push(Voice::Oscillator(OscillatorVoice::new(sample_rate, config)));
            voices.push(Voice::Sampled(SampledVoice::new(sample_rate, config)));
        }
        Self { voices }
    }

    /// Pick a voice of `kind` for a new note.
    pub fn allocate(&mut self, kind: SoundKind) -> Option<&mut Voice> {
        let idx = self
            .position(kind, VoiceState::Idle)
            .or_else(|| self.oldest(kind, VoiceState::Releasing))
            .or_else(|| self.oldest(kind, VoiceState::Sounding))?;
        Some(&mut self.voices[idx])
    }

    /// Every active voice currently playing `note`, of any kind.
    pub fn playing(&mut self, note: u8) -> impl Iterator<Item = &mut Voice> {
        self.voices
            .iter_mut()
            .filter(move |v| v.is_active() && v.note() == note)
    }

    /// Voices still held down (not yet released) playing `note`.
    pub fn sounding(&mut self, note: u8) -> impl Iterator<Item = &mut Voice> {
        self.voices
            .iter_mut()
            .filter(move |v| v.state() == VoiceState::Sounding && v.note() == note)
    }

    pub fn stop_all(&mut self, allow_tailoff: bool) {
        for voice in &mut self.voices {
            voice.stop(allow_tailoff);
        }
    }

    pub fn stop_kind(&mut self, kind: SoundKind, allow_tailoff: bool) {
        for voice in self.voices.iter_mut().filter(|v| v.kind() == kind) {
            voice.stop(allow_tailoff);
        }
    }

    /// Add every active voice into `out`.
    pub fn render(&mut self, out: &mut [f32], sound: Option<&SampleSound>) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render(out, sound);
        }
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn position(&self, kind: SoundKind, state: VoiceState) -> Option<usize> {
        self.voices
            .iter()
            .position(|v| v.kind() == kind && v.state() == state)
    }

    fn oldest(&self, kind: SoundKind, state: VoiceState) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind() == kind && v.state() == state)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(pool: &mut VoicePool, note: u8, age: u64) {
        match pool.allocate(SoundKind::Sine) {
            Some(Voice::Oscillator(v)) => v.start(note, 440.0, 1.0, age),
            other => panic!("expected an oscillator voice, got {other:?}"),
        }
    }

    fn pool(voices: usize) -> VoicePool {
        let config = SynthConfig {
            voices,
            ..Default::default()
        };
        VoicePool::new(48_000.0, &config)
    }

    #[test]
    fn holds_voices_of_both_kinds() {
        let pool = pool(3);
        let kinds: Vec<_> = pool.voices().iter().map(|v| v.kind()).collect();
        assert_eq!(kinds.iter().filter(|k| **k == SoundKind::Sine).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == SoundKind::Sampled).count(), 3);
    }

    #[test]
    fn prefers_idle_voices() {
        let mut pool = pool(2);
        start(&mut pool, 60, 0);
        start(&mut pool, 64, 1);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.playing(60).count(), 1);
        assert_eq!(pool.playing(64).count(), 1);
    }

    #[test]
    fn steals_oldest_releasing_before_sounding() {
        let mut pool = pool(2);
        start(&mut pool, 60, 0);
        start(&mut pool, 64, 1);
        pool.sounding(64).for_each(|v| v.stop(true));

        start(&mut pool, 67, 2);
        assert_eq!(pool.playing(64).count(), 0);
        assert_eq!(pool.playing(60).count(), 1);
        assert_eq!(pool.playing(67).count(), 1);
    }

    #[test]
    fn steals_oldest_sounding_when_exhausted() {
        let mut pool = pool(2);
        start(&mut pool, 60, 0);
        start(&mut pool, 64, 1);
        start(&mut pool, 67, 2);

        assert_eq!(pool.playing(60).count(), 0);
        assert_eq!(pool.playing(64).count(), 1);
        assert_eq!(pool.playing(67).count(), 1);
        assert_eq!(pool.active_count(), 2);
    }
}
