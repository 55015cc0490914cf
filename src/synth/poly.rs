use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{
    config::SynthConfig,
    sample::{SampleSound, SoundKind},
    synth::{
        message::{MessageReceiver, SynthMessage},
        pool::VoicePool,
        voice::{SynthVoice, Voice},
    },
    tuning::{AnchorSeed, ReferenceAnchor, TuningContext, TuningSystem},
    MAX_BLOCK_SIZE,
};

/// Copyable view of the synth state for display threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSnapshot {
    pub anchor: Option<ReferenceAnchor>,
    /// Bit `n` set while MIDI note `n` is held.
    pub held_mask: u128,
    pub held_count: usize,
    pub tuning: TuningSystem,
    pub sound: SoundKind,
    pub active_voices: usize,
    pub has_sample: bool,
}

impl SynthSnapshot {
    pub fn is_held(&self, note: u8) -> bool {
        note < 128 && self.held_mask & (1u128 << note) != 0
    }

    pub fn lowest_held(&self) -> Option<u8> {
        (self.held_mask != 0).then(|| self.held_mask.trailing_zeros() as u8)
    }
}

/// Polyphonic synth: tuning state, voice pool and message dispatch.
///
/// Lives on the audio thread. All control arrives through `rx`.
pub struct PolySynth<R> {
    pool: VoicePool,
    tuning: TuningContext,
    sound_kind: SoundKind,
    sample: Option<Arc<SampleSound>>,
    rx: R,
    #[cfg(feature = "rtrb")]
    retired: Option<Producer<Arc<SampleSound>>>,
    /// A replaced sample that did not fit in the retire queue yet.
    #[cfg(feature = "rtrb")]
    pending_retire: Option<Arc<SampleSound>>,
    temp_buffer: Vec<f32>,
    next_age: u64,
    frame_counter: u64,
}

impl<R: MessageReceiver> PolySynth<R> {
    pub fn new(sample_rate: f32, config: &SynthConfig, rx: R) -> Self {
        Self {
            pool: VoicePool::new(sample_rate, config),
            tuning: TuningContext::new(config.tuning),
            sound_kind: config.sound,
            sample: None,
            rx,
            #[cfg(feature = "rtrb")]
            retired: None,
            #[cfg(feature = "rtrb")]
            pending_retire: None,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            next_age: 0,
            frame_counter: 0,
        }
    }

    /// Send replaced samples back over `tx` instead of freeing them here.
    #[cfg(feature = "rtrb")]
    pub fn with_retire_queue(mut self, tx: Producer<Arc<SampleSound>>) -> Self {
        self.retired = Some(tx);
        self
    }

    /// Apply queued messages, then render mono audio into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.process_messages();

        out.fill(0.0);
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.pool.render(block, self.sample.as_deref());
        }

        self.frame_counter += out.len() as u64;
    }

    /// Apply queued messages, then render into an interleaved buffer,
    /// writing the same signal to each of `channels`.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        self.process_messages();

        if channels == 0 {
            return;
        }

        for frames in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let len = frames.len() / channels;
            let block = &mut self.temp_buffer[..len];
            block.fill(0.0);
            self.pool.render(block, self.sample.as_deref());

            for (frame, &sample) in frames.chunks_exact_mut(channels).zip(block.iter()) {
                frame.fill(sample);
            }
            self.frame_counter += len as u64;
        }
    }

    /// Drain the receiver.
    pub fn process_messages(&mut self) {
        self.flush_retired();
        while let Some(msg) = self.rx.pop() {
            self.handle_message(msg);
        }
    }

    pub fn handle_message(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity: 0 } => self.note_off(note),
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note, .. } => self.note_off(note),
            SynthMessage::AllNotesOff => {
                self.pool.stop_all(true);
                self.tuning.release_all();
            }
            SynthMessage::AllSoundOff => {
                self.pool.stop_all(false);
                self.tuning.release_all();
            }
            SynthMessage::SetTuning(system) => self.tuning.set_system(system),
            SynthMessage::ResetDrift => self.tuning.reset(),
            SynthMessage::SetSoundSource(kind) => {
                self.sound_kind = kind;
                self.tuning.reset();
            }
            SynthMessage::InstallSample(sound) => self.install_sample(sound),
        }
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        let note = note & 0x7f;
        let velocity = velocity.min(127) as f32 / 127.0;
        let age = self.next_age;
        self.next_age += 1;

        let seed = match (self.sound_kind, self.sample.as_deref()) {
            (SoundKind::Sine, _) => AnchorSeed::EqualTemperament,
            (SoundKind::Sampled, Some(sound)) => AnchorSeed::RootRatio {
                root_note: sound.root_note(),
            },
            // Nothing can sound before a sample is installed, so the key is
            // tracked but the anchor is neither seeded nor moved.
            (SoundKind::Sampled, None) => {
                self.tuning.hold(note);
                return;
            }
        };
        let pitch = self.tuning.note_on(note, seed);

        match (self.pool.allocate(self.sound_kind), self.sample.as_deref()) {
            (Some(Voice::Oscillator(voice)), _) => voice.start(note, pitch, velocity, age),
            (Some(Voice::Sampled(voice)), Some(sound)) => {
                voice.start(note, pitch, velocity, age, sound)
            }
            _ => {}
        }
    }

    fn note_off(&mut self, note: u8) {
        let note = note & 0x7f;
        self.tuning.note_off(note);
        for voice in self.pool.sounding(note) {
            voice.stop(true);
        }
    }

    fn install_sample(&mut self, sound: Arc<SampleSound>) {
        self.pool.stop_kind(SoundKind::Sampled, false);
        if let Some(old) = self.sample.replace(sound) {
            self.retire(old);
        }
    }

    /// Hand `old` to the control side. Without a retire queue it is dropped
    /// here.
    #[cfg(feature = "rtrb")]
    fn retire(&mut self, old: Arc<SampleSound>) {
        self.flush_retired();
        let Some(tx) = self.retired.as_mut() else {
            return;
        };
        if let Err(rtrb::PushError::Full(old)) = tx.push(old) {
            // One slot only; a second overflow before the queue drains frees
            // the older sample on this thread.
            debug_assert!(
                self.pending_retire.is_none(),
                "retire queue overflowed twice"
            );
            self.pending_retire = Some(old);
        }
    }

    /// Retry handing over a sample that did not fit last time.
    #[cfg(feature = "rtrb")]
    fn flush_retired(&mut self) {
        let Some(tx) = self.retired.as_mut() else {
            return;
        };
        let Some(old) = self.pending_retire.take() else {
            return;
        };
        if let Err(rtrb::PushError::Full(old)) = tx.push(old) {
            self.pending_retire = Some(old);
        }
    }

    #[cfg(not(feature = "rtrb"))]
    fn retire(&mut self, _old: Arc<SampleSound>) {}

    #[cfg(not(feature = "rtrb"))]
    fn flush_retired(&mut self) {}

    pub fn snapshot(&self) -> SynthSnapshot {
        let held = self.tuning.held();
        let held_mask = held.iter().fold(0u128, |mask, note| mask | (1u128 << note));

        SynthSnapshot {
            anchor: self.tuning.anchor(),
            held_mask,
            held_count: held.len(),
            tuning: self.tuning.system(),
            sound: self.sound_kind,
            active_voices: self.pool.active_count(),
            has_sample: self.sample.is_some(),
        }
    }

    pub fn tuning(&self) -> &TuningContext {
        &self.tuning
    }

    pub fn sound_kind(&self) -> SoundKind {
        self.sound_kind
    }

    pub fn sample(&self) -> Option<&SampleSound> {
        self.sample.as_deref()
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    /// Frames rendered so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}
