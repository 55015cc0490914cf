//! Adaptive just-intonation tuning.
//!
//! Everything in here is plain arithmetic over fixed-size state, so it can run
//! inside the audio callback. The synth layer owns one `TuningContext` and
//! feeds it every note event before voices are started.

/// Reference anchor and the note → frequency resolution math.
pub mod resolver;
/// Interval ratio tables for each supported tuning system.
pub mod table;
/// Held notes and the bass-driven re-anchoring policy.
pub mod tracker;

pub use resolver::{resolve, ReferenceAnchor};
pub use table::{TuningSystem, TuningTable};
pub use tracker::{AnchorSeed, HeldNotes, TuningContext};

/// Convert a MIDI note number to its equal-temperament frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_hz(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}
