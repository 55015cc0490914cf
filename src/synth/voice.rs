use std::f64::consts::TAU;

use crate::{
    config::SynthConfig,
    dsp::envelope::Envelope,
    sample::{SampleSound, SoundKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Available for allocation
    Sounding,  // Key held
    Releasing, // Key released, tail still audible
}

/// Behaviour shared by every kind of voice.
pub trait SynthVoice {
    fn state(&self) -> VoiceState;

    fn note(&self) -> u8;

    /// Frame counter value at the last note-on. Lower is older.
    fn age(&self) -> u64;

    /// Release the note. Without tail-off the voice goes idle immediately.
    fn stop(&mut self, allow_tailoff: bool);

    /// Add this voice's output to `out`.
    ///
    /// `sound` is the installed sample, only read by sampled voices.
    fn render(&mut self, out: &mut [f32], sound: Option<&SampleSound>);

    fn is_idle(&self) -> bool {
        self.state() == VoiceState::Idle
    }

    fn is_active(&self) -> bool {
        !self.is_idle()
    }
}

/// Sine oscillator voice with an exponential tail-off on release.
#[derive(Debug, Clone)]
pub struct OscillatorVoice {
    sample_rate: f64,
    gain: f64,
    tailoff_decay: f64,
    tailoff_floor: f64,

    angle: f64,
    angle_delta: f64,
    level: f64,
    tailoff: f64,

    state: VoiceState,
    note: u8,
    age: u64,
}

impl OscillatorVoice {
    pub fn new(sample_rate: f32, config: &SynthConfig) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            gain: config.gain,
            tailoff_decay: config.tailoff_decay,
            tailoff_floor: config.tailoff_floor,
            angle: 0.0,
            angle_delta: 0.0,
            level: 0.0,
            tailoff: 0.0,
            state: VoiceState::Idle,
            note: 0,
            age: 0,
        }
    }

    /// Start `note` at `frequency` Hz. `velocity` is 0.0..=1.0.
    pub fn start(&mut self, note: u8, frequency: f64, velocity: f32, age: u64) {
        self.note = note;
        self.age = age;
        self.angle = 0.0;
        self.angle_delta = TAU * frequency / self.sample_rate;
        self.level = velocity as f64 * self.gain;
        self.tailoff = 0.0;
        self.state = VoiceState::Sounding;
    }

    /// Current output amplitude, including any tail-off.
    pub fn amplitude(&self) -> f64 {
        match self.state {
            VoiceState::Idle => 0.0,
            VoiceState::Sounding => self.level,
            VoiceState::Releasing => self.level * self.tailoff,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.angle_delta * self.sample_rate / TAU
    }

    fn clear(&mut self) {
        self.state = VoiceState::Idle;
        self.angle_delta = 0.0;
        self.tailoff = 0.0;
    }

    #[inline]
    fn advance(&mut self) {
        self.angle += self.angle_delta;
        if self.angle >= TAU {
            self.angle -= TAU;
        }
    }
}

impl SynthVoice for OscillatorVoice {
    fn state(&self) -> VoiceState {
        self.state
    }

    fn note(&self) -> u8 {
        self.note
    }

    fn age(&self) -> u64 {
        self.age
    }

    fn stop(&mut self, allow_tailoff: bool) {
        match (self.state, allow_tailoff) {
            (VoiceState::Idle, _) => {}
            (_, false) => self.clear(),
            (VoiceState::Sounding, true) => {
                self.tailoff = 1.0;
                self.state = VoiceState::Releasing;
            }
            (VoiceState::Releasing, true) => {}
        }
    }

    fn render(&mut self, out: &mut [f32], _sound: Option<&SampleSound>) {
        match self.state {
            VoiceState::Idle => {}
            VoiceState::Sounding => {
                for sample in out.iter_mut() {
                    *sample += (self.angle.sin() * self.level) as f32;
                    self.advance();
                }
            }
            VoiceState::Releasing => {
                for sample in out.iter_mut() {
                    *sample += (self.angle.sin() * self.level * self.tailoff) as f32;
                    self.advance();

                    self.tailoff *= self.tailoff_decay;
                    if self.tailoff <= self.tailoff_floor {
                        self.clear();
                        break;
                    }
                }
            }
        }
    }
}

/// Sample playback voice, pitched by a playback ratio and shaped by an ADSR.
#[derive(Debug, Clone)]
pub struct SampledVoice {
    sample_rate: f32,
    position: f64,
    increment: f64,
    gain: f32,
    envelope: Envelope,

    state: VoiceState,
    note: u8,
    age: u64,
}

impl SampledVoice {
    pub fn new(sample_rate: f32, config: &SynthConfig) -> Self {
        let settings = &config.sample;
        Self {
            sample_rate,
            position: 0.0,
            increment: 0.0,
            gain: 0.0,
            envelope: Envelope::adsr(sample_rate, settings.attack, 0.0, 1.0, settings.release),
            state: VoiceState::Idle,
            note: 0,
            age: 0,
        }
    }

    /// Start `note` playing `sound` at `pitch_ratio` times its recorded pitch.
    pub fn start(
        &mut self,
        note: u8,
        pitch_ratio: f64,
        velocity: f32,
        age: u64,
        sound: &SampleSound,
    ) {
        self.note = note;
        self.age = age;
        self.position = 0.0;
        self.increment = pitch_ratio * sound.sample_rate() as f64 / self.sample_rate as f64;
        self.gain = velocity;
        self.envelope = Envelope::adsr(self.sample_rate, sound.attack(), 0.0, 1.0, sound.release());
        self.envelope.note_on();
        self.state = VoiceState::Sounding;
    }

    /// Source frames advanced per output frame.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    fn clear(&mut self) {
        self.state = VoiceState::Idle;
        self.envelope.reset();
        self.increment = 0.0;
    }
}

impl SynthVoice for SampledVoice {
    fn state(&self) -> VoiceState {
        self.state
    }

    fn note(&self) -> u8 {
        self.note
    }

    fn age(&self) -> u64 {
        self.age
    }

    fn stop(&mut self, allow_tailoff: bool) {
        match (self.state, allow_tailoff) {
            (VoiceState::Idle, _) => {}
            (_, false) => self.clear(),
            (VoiceState::Sounding, true) => {
                self.envelope.note_off();
                self.state = VoiceState::Releasing;
            }
            (VoiceState::Releasing, true) => {}
        }
    }

    fn render(&mut self, out: &mut [f32], sound: Option<&SampleSound>) {
        if self.state == VoiceState::Idle {
            return;
        }
        let Some(sound) = sound else {
            // Nothing to play back.
            self.clear();
            return;
        };

        for sample in out.iter_mut() {
            if self.position >= sound.len() as f64 {
                self.clear();
                break;
            }

            let level = self.envelope.next_sample();
            *sample += sound.read_interpolated(self.position) * self.gain * level;
            self.position += self.increment;

            if self.state == VoiceState::Releasing && !self.envelope.is_active() {
                self.clear();
                break;
            }
        }
    }
}

/// One slot of the voice pool.
#[derive(Debug, Clone)]
pub enum Voice {
    Oscillator(OscillatorVoice),
    Sampled(SampledVoice),
}

impl Voice {
    pub fn kind(&self) -> SoundKind {
        match self {
            Voice::Oscillator(_) => SoundKind::Sine,
            Voice::Sampled(_) => SoundKind::Sampled,
        }
    }

    fn inner(&self) -> &dyn SynthVoice {
        match self {
            Voice::Oscillator(v) => v,
            Voice::Sampled(v) => v,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SynthVoice {
        match self {
            Voice::Oscillator(v) => v,
            Voice::Sampled(v) => v,
        }
    }
}

impl SynthVoice for Voice {
    fn state(&self) -> VoiceState {
        self.inner().state()
    }

    fn note(&self) -> u8 {
        self.inner().note()
    }

    fn age(&self) -> u64 {
        self.inner().age()
    }

    fn stop(&mut self, allow_tailoff: bool) {
        self.inner_mut().stop(allow_tailoff)
    }

    fn render(&mut self, out: &mut [f32], sound: Option<&SampleSound>) {
        self.inner_mut().render(out, sound)
    }
}
