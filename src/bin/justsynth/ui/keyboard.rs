//! Computer-keyboard piano: key mapping, latching and the keyboard widget

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use justsynth::SynthSnapshot;

/// Keys in semitone order from the base C, laid out like a piano across
/// the home row (white keys) and the row above it (black keys).
const KEY_LAYOUT: [char; 17] = [
    'a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k', 'o', 'l', 'p', ';',
];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const MAX_OCTAVE: u8 = 8;

/// Scientific pitch name, MIDI 60 = C4.
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

fn is_black(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

/// Latching keyboard state. A key press toggles its note, so chords can be
/// built one key at a time in a terminal that has no key-up events.
pub struct Keyboard {
    octave: u8,
    latched: [bool; 128],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 4,
            latched: [false; 128],
        }
    }

    /// MIDI note of the C under the `a` key.
    pub fn base_note(&self) -> u8 {
        (self.octave + 1) * 12
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = self.octave.saturating_add_signed(delta).min(MAX_OCTAVE);
    }

    pub fn note_for(&self, key: char) -> Option<u8> {
        let key = key.to_ascii_lowercase();
        let offset = KEY_LAYOUT.iter().position(|&k| k == key)? as u8;
        let note = self.base_note() + offset;
        (note < 128).then_some(note)
    }

    /// Flip the latch on `note`. Returns `true` if it is now held.
    pub fn toggle(&mut self, note: u8) -> bool {
        let slot = &mut self.latched[note as usize & 0x7f];
        *slot = !*slot;
        *slot
    }

    pub fn is_latched(&self, note: u8) -> bool {
        self.latched[note as usize & 0x7f]
    }

    pub fn clear(&mut self) {
        self.latched = [false; 128];
    }
}

/// Render the playable range with held notes and the anchor highlighted.
pub fn render_keyboard(frame: &mut Frame, area: Rect, keyboard: &Keyboard, snapshot: &SynthSnapshot) {
    let block = Block::default()
        .title(format!(" Keyboard (octave {}) ", keyboard.octave()))
        .borders(Borders::ALL);

    let base = keyboard.base_note();
    let anchor = snapshot.anchor.map(|a| a.note);

    let mut names = Vec::with_capacity(KEY_LAYOUT.len());
    let mut keys = Vec::with_capacity(KEY_LAYOUT.len());

    for (offset, key) in KEY_LAYOUT.iter().enumerate() {
        let note = base + offset as u8;
        if note >= 128 {
            break;
        }

        let mut style = if is_black(note) {
            Style::default().fg(Color::Gray).bg(Color::Black)
        } else {
            Style::default().fg(Color::Black).bg(Color::White)
        };
        if snapshot.is_held(note) {
            style = style.bg(Color::Green).fg(Color::Black);
        } else if keyboard.is_latched(note) {
            style = style.bg(Color::Yellow).fg(Color::Black);
        }
        if anchor == Some(note) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }

        names.push(Span::styled(format!("{:^5}", note_name(note)), style));
        keys.push(Span::styled(
            format!("{key:^5}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(names), Line::from(keys)]).block(block);
    frame.render_widget(paragraph, area);
}
