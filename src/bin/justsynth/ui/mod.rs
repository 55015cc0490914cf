//! Terminal UI: keyboard input, tuning display and output scope.

mod keyboard;
mod scope;
mod status;

use std::{path::PathBuf, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use justsynth::{
    synth::SynthHandle, SampleSettings, SampleSound, SoundKind, SynthSnapshot, TuningSystem,
};

use keyboard::{render_keyboard, Keyboard};
use scope::render_scope;
use status::{render_status, render_tuning};

/// Samples shown in the scope.
const SCOPE_SIZE: usize = 1024;
/// Velocity used for computer-keyboard notes.
const KEY_VELOCITY: u8 = 100;

/// Things the UI needs that never change after startup.
pub struct UiContext {
    pub sample_rate: f32,
    pub sample_path: Option<PathBuf>,
    pub sample_settings: SampleSettings,
    pub midi_port: Option<String>,
    pub log_path: Option<PathBuf>,
}

pub struct UiApp {
    handle: SynthHandle,
    state_rx: Consumer<SynthSnapshot>,
    scope_rx: Consumer<f32>,
    snapshot: SynthSnapshot,
    scope: Vec<f32>,
    keyboard: Keyboard,
    context: UiContext,
    sample_loaded: bool,
    message: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: SynthHandle,
        state_rx: Consumer<SynthSnapshot>,
        scope_rx: Consumer<f32>,
        initial: SynthSnapshot,
        context: UiContext,
    ) -> Self {
        Self {
            handle,
            state_rx,
            scope_rx,
            snapshot: initial,
            scope: vec![0.0; SCOPE_SIZE],
            keyboard: Keyboard::new(),
            context,
            sample_loaded: false,
            message: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_state();
            self.handle.collect_retired();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.handle.all_sound_off();
        Ok(())
    }

    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(..excess);
        }
    }

    /// Keep only the latest snapshot
    fn poll_state(&mut self) {
        while let Ok(snapshot) = self.state_rx.pop() {
            self.snapshot = snapshot;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('z') => self.keyboard.shift_octave(-1),
            KeyCode::Char('x') => self.keyboard.shift_octave(1),
            KeyCode::Char('1') => self.set_tuning(TuningSystem::ThreeLimit),
            KeyCode::Char('2') => self.set_tuning(TuningSystem::FiveLimit),
            KeyCode::Char('3') => self.set_tuning(TuningSystem::SevenLimit),
            KeyCode::Tab => {
                let next = match self.snapshot.sound {
                    SoundKind::Sine => SoundKind::Sampled,
                    SoundKind::Sampled => SoundKind::Sine,
                };
                self.select_sound(next);
            }
            KeyCode::Char('r') => {
                self.handle.reset_drift();
                self.message = Some("pitch drift reset".into());
            }
            KeyCode::Char(' ') => {
                self.handle.all_notes_off();
                self.keyboard.clear();
            }
            KeyCode::Enter => {
                self.handle.all_sound_off();
                self.keyboard.clear();
            }
            KeyCode::Char(c) => {
                if let Some(note) = self.keyboard.note_for(c) {
                    if self.keyboard.toggle(note) {
                        self.handle.note_on(note, KEY_VELOCITY);
                    } else {
                        self.handle.note_off(note);
                    }
                }
            }
            _ => {}
        }
    }

    fn set_tuning(&mut self, system: TuningSystem) {
        self.handle.set_tuning(system);
        self.message = Some(format!("tuning: {system}"));
    }

    /// Switch sound source. Latched notes are released since the new source
    /// starts from a fresh anchor.
    fn select_sound(&mut self, kind: SoundKind) {
        if kind == SoundKind::Sampled && !self.sample_loaded {
            self.load_sample();
        }
        self.handle.all_notes_off();
        self.keyboard.clear();
        self.handle.set_sound_source(kind);
    }

    fn load_sample(&mut self) {
        let Some(path) = self.context.sample_path.clone() else {
            self.message = Some("no --sample given, sampled voices are silent".into());
            return;
        };

        match SampleSound::from_wav(&path, &self.context.sample_settings) {
            Ok(sound) => {
                self.message = Some(format!("loaded {} ({} frames)", sound.name(), sound.len()));
                self.sample_loaded = self.handle.install_sample(sound);
            }
            Err(err) => {
                log::error!("failed to load sample {}: {err}", path.display());
                self.message = Some(format!("could not load {}: {err}", path.display()));
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(5), // Tuning
                Constraint::Length(4), // Keyboard
                Constraint::Min(6),    // Scope
                Constraint::Length(1), // Message
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        render_status(frame, chunks[0], &self.snapshot, &self.context);
        render_tuning(frame, chunks[1], &self.snapshot, &self.context);
        render_keyboard(frame, chunks[2], &self.keyboard, &self.snapshot);
        render_scope(frame, chunks[3], &self.scope);

        let message = match (&self.message, &self.context.log_path) {
            (Some(msg), _) => format!(" {msg}"),
            (None, Some(path)) => format!(" log: {}", path.display()),
            (None, None) => String::new(),
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::Yellow)),
            chunks[4],
        );

        let help = Paragraph::new(
            " [a-;] Notes  [Z/X] Octave  [1/2/3] Tuning  [Tab] Sine/Sample  [R] Reset drift  [Space] Release  [Enter] Silence  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[5]);
    }
}
