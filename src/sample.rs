//! Sound assets and WAV decoding.
//!
//! Decoding allocates and may hit the filesystem, so it happens on a control
//! thread. The decoded `SampleSound` is then handed to the synth through its
//! message queue.

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::SampleSettings,
    error::{Error, Result},
};

/// Which family of voices a sound is played by.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundKind {
    #[default]
    Sine,
    Sampled,
}

impl SoundKind {
    pub fn name(self) -> &'static str {
        match self {
            SoundKind::Sine => "Sine wave",
            SoundKind::Sampled => "Sampled sound",
        }
    }
}

/// A decoded mono sample with the settings it should be played with.
#[derive(Debug, Clone)]
pub struct SampleSound {
    name: String,
    data: Vec<f32>,
    sample_rate: u32,
    root_note: u8,
    attack: f32,
    release: f32,
}

impl SampleSound {
    /// Build from mono samples, truncated to `settings.max_length` seconds.
    pub fn from_samples(
        name: impl Into<String>,
        mut data: Vec<f32>,
        sample_rate: u32,
        settings: &SampleSettings,
    ) -> Result<Self> {
        let max_frames = (settings.max_length * sample_rate as f64) as usize;
        data.truncate(max_frames);

        if data.is_empty() || sample_rate == 0 {
            return Err(Error::EmptySample);
        }

        Ok(Self {
            name: name.into(),
            data,
            sample_rate,
            root_note: settings.root_note,
            attack: settings.attack,
            release: settings.release,
        })
    }

    /// Decode a WAV file from disk.
    pub fn from_wav(path: impl AsRef<Path>, settings: &SampleSettings) -> Result<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::new(BufReader::new(File::open(path)?))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());

        let sound = Self::decode(name, reader, settings)?;
        log::info!(
            "loaded sample {:?}: {} frames at {} Hz, root note {}",
            path,
            sound.len(),
            sound.sample_rate,
            sound.root_note
        );
        Ok(sound)
    }

    /// Decode WAV data from any seekable reader.
    pub fn from_wav_reader<R: Read + Seek>(
        name: impl Into<String>,
        reader: R,
        settings: &SampleSettings,
    ) -> Result<Self> {
        Self::decode(name.into(), hound::WavReader::new(reader)?, settings)
    }

    fn decode<R: Read>(
        name: String,
        reader: hound::WavReader<R>,
        settings: &SampleSettings,
    ) -> Result<Self> {
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
                    return Err(Error::UnsupportedFormat {
                        bits: spec.bits_per_sample,
                        format: "integer",
                    });
                }
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
            hound::SampleFormat::Float => {
                if spec.bits_per_sample != 32 {
                    return Err(Error::UnsupportedFormat {
                        bits: spec.bits_per_sample,
                        format: "float",
                    });
                }
                reader
                    .into_samples::<f32>()
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        // Downmix to mono; every output channel gets the same signal anyway.
        let mono = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Self::from_samples(name, mono, spec.sample_rate, settings)
    }

    /// Read with linear interpolation at a fractional frame position.
    ///
    /// Positions outside the sample read as silence.
    #[inline]
    pub fn read_interpolated(&self, position: f64) -> f32 {
        if position < 0.0 {
            return 0.0;
        }

        let idx = position as usize;
        match (self.data.get(idx), self.data.get(idx + 1)) {
            (Some(&a), Some(&b)) => {
                let frac = (position - idx as f64) as f32;
                a + (b - a) * frac
            }
            (Some(&a), None) => a,
            _ => 0.0,
        }
    }

    pub fn kind(&self) -> SoundKind {
        SoundKind::Sampled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn root_note(&self) -> u8 {
        self.root_note
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn release(&self) -> f32 {
        self.release
    }
}
