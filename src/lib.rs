pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod sample;
pub mod synth; // Voice management and polyphony
pub mod tuning; // Adaptive just intonation

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

pub use config::{SampleSettings, SynthConfig};
pub use error::{Error, Result};
pub use sample::{SampleSound, SoundKind};
pub use synth::{PolySynth, SynthMessage, SynthSnapshot};
pub use tuning::{ReferenceAnchor, TuningContext, TuningSystem, TuningTable};
