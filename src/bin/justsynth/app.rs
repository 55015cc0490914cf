//! Audio device setup and the top-level run loop

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use justsynth::{synth, SynthConfig, SynthMessage, SynthSnapshot};

use super::midi::MidiInputPort;
use super::ui::{UiApp, UiContext};

/// Snapshots queued between the audio callback and the UI.
const STATE_QUEUE_SIZE: usize = 16;
/// Scope samples queued between the audio callback and the UI.
const SCOPE_QUEUE_SIZE: usize = 8192;

/// Application builder
pub struct App {
    config: SynthConfig,
    sample_path: Option<PathBuf>,
    midi_port: Option<usize>,
    log_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            sample_path: None,
            midi_port: None,
            log_path: None,
        }
    }

    /// WAV file loaded the first time the sampled source is selected.
    pub fn sample_path(mut self, path: Option<PathBuf>) -> Self {
        self.sample_path = path;
        self
    }

    pub fn midi_port(mut self, index: Option<usize>) -> Self {
        self.midi_port = index;
        self
    }

    pub fn log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    /// Open the audio device, wire up the queues and hand the terminal to the UI.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        log::info!(
            "audio output: {} @ {sample_rate} Hz, {channels} channels",
            device.name().unwrap_or_else(|_| "unknown device".into())
        );

        // MIDI input gets its own queue so the UI thread is never involved.
        let (midi_tx, midi_rx) = RingBuffer::<SynthMessage>::new(self.config.queue_capacity);
        let (handle, mut synth) = synth::channel(sample_rate, &self.config, midi_rx);

        let midi = match self.midi_port {
            Some(index) => Some(MidiInputPort::connect(index, midi_tx, self.config.midi_channel)?),
            None => None,
        };

        let (mut state_tx, state_rx) = RingBuffer::<SynthSnapshot>::new(STATE_QUEUE_SIZE);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE_SIZE);
        let initial = synth.snapshot();

        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                synth.render_interleaved(data, channels);

                // The UI keeps up or misses frames; the callback never waits.
                let _ = state_tx.push(synth.snapshot());
                for frame in data.chunks_exact(channels.max(1)) {
                    if scope_tx.push(frame[0]).is_err() {
                        break;
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play().wrap_err("failed to start audio stream")?;

        let context = UiContext {
            sample_rate,
            sample_path: self.sample_path,
            sample_settings: self.config.sample,
            midi_port: midi.as_ref().map(|m| m.name().to_string()),
            log_path: self.log_path,
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, state_rx, scope_rx, initial, context).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        drop(midi);
        log::info!("justsynth stopped");
        result
    }
}
