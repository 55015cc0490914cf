//! Low-level DSP primitives used by the voices.
//!
//! Allocation-free and realtime-safe, so they can live directly inside voice
//! structs.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;

pub use envelope::{Envelope, EnvelopeState};
