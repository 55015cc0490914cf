use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{
    sample::{SampleSound, SoundKind},
    tuning::TuningSystem,
};

/// Everything the render thread can be told to do.
///
/// Messages are drained at the start of each render call, before any voice
/// produces samples, so tuning state never changes in the middle of a block.
#[derive(Debug, Clone)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    /// Release every voice with tail-off and forget the held notes.
    AllNotesOff,
    /// Cut every voice immediately.
    AllSoundOff,
    SetTuning(TuningSystem),
    /// Drop the reference anchor; the next note re-seeds it.
    ResetDrift,
    SetSoundSource(SoundKind),
    InstallSample(Arc<SampleSound>),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Two queues drained in order, e.g. UI commands then MIDI input.
impl<A: MessageReceiver, B: MessageReceiver> MessageReceiver for (A, B) {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.0.pop().or_else(|| self.1.pop())
    }
}

/// Receiver that never yields anything.
impl MessageReceiver for () {
    fn pop(&mut self) -> Option<SynthMessage> {
        None
    }
}
