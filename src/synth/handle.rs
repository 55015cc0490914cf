use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::SynthConfig,
    sample::{SampleSound, SoundKind},
    synth::{
        message::{MessageReceiver, SynthMessage},
        poly::PolySynth,
    },
    tuning::TuningSystem,
};

/// Retired samples waiting to be freed on the control side.
const RETIRE_QUEUE_SIZE: usize = 4;

/// Control-thread end of a synth.
///
/// Every method only pushes onto a wait-free queue. If the queue is full the
/// message is dropped and `false` is returned.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
    retired: Consumer<Arc<SampleSound>>,
}

/// Create a synth and the handle that controls it.
///
/// `extra` is drained after the handle's queue on every render call; pass `()`
/// when there is no second producer, or a MIDI queue's `Consumer`.
pub fn channel<R: MessageReceiver>(
    sample_rate: f32,
    config: &SynthConfig,
    extra: R,
) -> (SynthHandle, PolySynth<(Consumer<SynthMessage>, R)>) {
    let (tx, rx) = RingBuffer::<SynthMessage>::new(config.queue_capacity);
    let (retired_tx, retired_rx) = RingBuffer::new(RETIRE_QUEUE_SIZE);

    let synth = PolySynth::new(sample_rate, config, (rx, extra)).with_retire_queue(retired_tx);
    let handle = SynthHandle {
        tx,
        retired: retired_rx,
    };

    (handle, synth)
}

impl SynthHandle {
    pub fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(msg)) => {
                log::warn!("synth queue full, dropping {msg:?}");
                false
            }
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> bool {
        self.send(SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        self.send(SynthMessage::NoteOff { note, velocity: 0 })
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn all_sound_off(&mut self) -> bool {
        self.send(SynthMessage::AllSoundOff)
    }

    pub fn set_tuning(&mut self, system: TuningSystem) -> bool {
        log::debug!("tuning system -> {system}");
        self.send(SynthMessage::SetTuning(system))
    }

    pub fn reset_drift(&mut self) -> bool {
        log::debug!("reset pitch drift");
        self.send(SynthMessage::ResetDrift)
    }

    pub fn set_sound_source(&mut self, kind: SoundKind) -> bool {
        log::debug!("sound source -> {}", kind.name());
        self.send(SynthMessage::SetSoundSource(kind))
    }

    pub fn install_sample(&mut self, sound: SampleSound) -> bool {
        log::debug!("installing sample {:?}", sound.name());
        self.send(SynthMessage::InstallSample(Arc::new(sound)))
    }

    /// Free samples the synth has replaced. Returns how many were dropped.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while let Ok(sound) = self.retired.pop() {
            log::debug!("freeing retired sample {:?}", sound.name());
            drop(sound);
            count += 1;
        }
        count
    }
}
