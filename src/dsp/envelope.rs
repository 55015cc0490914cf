use crate::MIN_TIME;

/*
Linear ADSR
===========

    level
    1.0 ┐  ╱╲
        │ ╱  ╲________
    S   │╱            ╲
    0.0 └──────────────╲──→ time
         A  D    S      R

Attack and decay move `level` by a fixed per-sample step:

    step = distance / (stage_seconds * sample_rate)

Steps only depend on the stage times and the sample rate, so they are worked
out once in `set_sample_rate` rather than on every sample.

Sampled voices use A = 0, D = 0, S = 1, R = 0.1 s, so the envelope jumps to
full level on the first sample, holds while the key is down and ramps to zero
over a tenth of a second after release.

note_off starts the release from the CURRENT level, whatever stage the
envelope is in. The ramp is interpolated over a whole number of samples, so
it always lands on exactly 0.0.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    // Seconds, except sustain which is a level.
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    attack_step: f32,
    decay_step: f32,
    release_len: u32,

    stage: EnvelopeState,
    level: f32,
    release_from: f32,
    release_pos: u32,
}

impl Envelope {
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack: attack.max(MIN_TIME),
            decay: decay.max(MIN_TIME),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(MIN_TIME),
            attack_step: 0.0,
            decay_step: 0.0,
            release_len: 1,
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_from: 0.0,
            release_pos: 0,
        };
        env.set_sample_rate(sample_rate);
        env
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.attack_step = 1.0 / (self.attack * sample_rate);
        self.decay_step = (1.0 - self.sustain) / (self.decay * sample_rate);
        self.release_len = (self.release * sample_rate).round().max(1.0) as u32;
    }

    /// Gate high. Restarts from zero so a retriggered note gets a clean attack.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.release_pos = 0;
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }
        self.release_from = self.level;
        self.release_pos = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.level = match self.stage {
            EnvelopeState::Idle => 0.0,
            EnvelopeState::Attack => {
                let level = self.level + self.attack_step;
                if level < 1.0 {
                    level
                } else {
                    self.stage = EnvelopeState::Decay;
                    1.0
                }
            }
            EnvelopeState::Decay => {
                let level = self.level - self.decay_step;
                if level > self.sustain {
                    level
                } else {
                    self.stage = EnvelopeState::Sustain;
                    self.sustain
                }
            }
            EnvelopeState::Sustain => self.sustain,
            EnvelopeState::Release => {
                let remaining = 1.0 - self.release_pos as f32 / self.release_len as f32;
                self.release_pos += 1;
                if self.release_pos < self.release_len {
                    (self.release_from * remaining).max(0.0)
                } else {
                    self.stage = EnvelopeState::Idle;
                    0.0
                }
            }
        };

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_from = 0.0;
        self.release_pos = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn run(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn zero_attack_is_full_level_on_first_sample() {
        let mut env = Envelope::adsr(48_000.0, 0.0, 0.0, 1.0, 0.1);
        env.note_on();
        assert_eq!(env.next_sample(), 1.0);
        env.next_sample();
        assert_eq!(env.state(), EnvelopeState::Sustain);
    }

    #[test]
    fn sustain_holds_target_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.6, 0.2);
        env.note_on();
        run(&mut env, 70);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn release_falls_back_to_idle() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.0, 0.0, 1.0, 0.1);
        env.note_on();
        run(&mut env, 10);

        env.note_off();
        let mut previous = env.level();
        for _ in 0..100 {
            let level = env.next_sample();
            assert!(level <= previous);
            previous = level;
        }

        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn release_length_follows_sample_rate() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.0, 0.0, 1.0, 0.1);
        env.set_sample_rate(2.0 * SAMPLE_RATE);
        env.note_on();
        run(&mut env, 2);
        env.note_off();

        run(&mut env, 199);
        assert!(env.is_active());
        run(&mut env, 1);
        assert!(!env.is_active());
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.0, 0.0, 1.0, 0.1);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);
    }
}
