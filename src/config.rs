//! Synth configuration.
//!
//! Defaults reproduce the classic behaviour: 12 voices of each kind, sine level
//! `velocity * 0.15`, a 0.99 per-sample tail-off that stops below 0.005, and a
//! sample rooted at middle C with no attack and a 0.1 s release.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sample::SoundKind,
    tuning::TuningSystem,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSettings {
    /// MIDI note at which the sample plays back unshifted.
    pub root_note: u8,
    /// Seconds.
    pub attack: f32,
    /// Seconds.
    pub release: f32,
    /// Longest sample kept after decoding, in seconds.
    pub max_length: f64,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            root_note: 60,
            attack: 0.0,
            release: 0.1,
            max_length: 1000.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Voices per sound kind.
    pub voices: usize,
    /// Oscillator output level at full velocity.
    pub gain: f64,
    /// Per-sample multiplier applied while an oscillator voice tails off.
    pub tailoff_decay: f64,
    /// Tail-off ends once the multiplier falls to this value.
    pub tailoff_floor: f64,
    pub tuning: TuningSystem,
    pub sound: SoundKind,
    /// Only accept notes on this MIDI channel (0-15). `None` is omni.
    pub midi_channel: Option<u8>,
    /// Length of each control/MIDI message queue.
    pub queue_capacity: usize,
    pub sample: SampleSettings,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            voices: 12,
            gain: 0.15,
            tailoff_decay: 0.99,
            tailoff_floor: 0.005,
            tuning: TuningSystem::default(),
            sound: SoundKind::default(),
            midi_channel: None,
            queue_capacity: 256,
            sample: SampleSettings::default(),
        }
    }
}

impl SynthConfig {
    /// Check ranges that would otherwise misbehave at render time.
    pub fn validate(&self) -> Result<()> {
        if self.voices == 0 {
            return Err(Error::Config("voices must be at least 1".into()));
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(Error::Config(format!("gain {} out of range", self.gain)));
        }
        if !(self.tailoff_decay > 0.0 && self.tailoff_decay < 1.0) {
            return Err(Error::Config(format!(
                "tailoff_decay {} must be in (0, 1)",
                self.tailoff_decay
            )));
        }
        if !(self.tailoff_floor > 0.0 && self.tailoff_floor < 1.0) {
            return Err(Error::Config(format!(
                "tailoff_floor {} must be in (0, 1)",
                self.tailoff_floor
            )));
        }
        if let Some(channel) = self.midi_channel {
            if channel > 15 {
                return Err(Error::Config(format!("midi_channel {channel} > 15")));
            }
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config("queue_capacity must be at least 1".into()));
        }
        if self.sample.root_note > 127 {
            return Err(Error::Config(format!(
                "sample root_note {} > 127",
                self.sample.root_note
            )));
        }
        if self.sample.max_length <= 0.0 {
            return Err(Error::Config("sample max_length must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        log::debug!("loaded synth config: {config:?}");
        Ok(config)
    }
}
