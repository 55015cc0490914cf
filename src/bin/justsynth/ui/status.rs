//! Status bar and tuning panel

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use justsynth::{SoundKind, SynthSnapshot};

use super::{keyboard::note_name, UiContext};

/// Render the top bar: tuning system, sound source and engine stats
pub fn render_status(frame: &mut Frame, area: Rect, snapshot: &SynthSnapshot, context: &UiContext) {
    let block = Block::default().title(" justsynth ").borders(Borders::ALL);

    let sound = match (snapshot.sound, snapshot.has_sample) {
        (SoundKind::Sampled, false) => "sampled (no sample)".to_string(),
        (kind, _) => kind.name().to_string(),
    };
    let midi = context.midi_port.as_deref().unwrap_or("none");

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", snapshot.tuning),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{sound}  "), Style::default().fg(Color::Green)),
        Span::styled(
            format!("voices: {}  ", snapshot.active_voices),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", context.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("MIDI: {midi}"), Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Drift of the anchor from equal temperament in cents.
///
/// In sampled mode the anchor holds a playback ratio against the sample root,
/// so it is compared with the tempered ratio instead of a frequency.
fn anchor_drift(snapshot: &SynthSnapshot, root_note: u8) -> Option<f64> {
    let anchor = snapshot.anchor?;
    match snapshot.sound {
        SoundKind::Sine => Some(anchor.drift_cents()),
        SoundKind::Sampled => {
            let tempered = 2f64.powf((anchor.note as f64 - root_note as f64) / 12.0);
            (anchor.frequency > 0.0).then(|| 1200.0 * (anchor.frequency / tempered).log2())
        }
    }
}

/// Render the anchor, bass note and held notes
pub fn render_tuning(frame: &mut Frame, area: Rect, snapshot: &SynthSnapshot, context: &UiContext) {
    let block = Block::default().title(" Tuning ").borders(Borders::ALL);
    let label = Style::default().fg(Color::DarkGray);

    let anchor_line = match snapshot.anchor {
        Some(anchor) => {
            let value = match snapshot.sound {
                SoundKind::Sine => format!("{:.4} Hz", anchor.frequency),
                SoundKind::Sampled => format!("ratio {:.6}", anchor.frequency),
            };
            let drift = anchor_drift(snapshot, context.sample_settings.root_note).unwrap_or(0.0);
            Line::from(vec![
                Span::styled(" Anchor: ", label),
                Span::styled(
                    format!("{}  {value}  ", note_name(anchor.note)),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    format!("drift {drift:+.2} cents"),
                    Style::default().fg(if drift.abs() < 0.005 {
                        Color::Green
                    } else {
                        Color::Yellow
                    }),
                ),
            ])
        }
        None => Line::from(vec![
            Span::styled(" Anchor: ", label),
            Span::raw("none, the next note seeds it"),
        ]),
    };

    let bass = snapshot
        .lowest_held()
        .map_or_else(|| "-".to_string(), note_name);
    let held: Vec<String> = (0..128u8)
        .filter(|&n| snapshot.is_held(n))
        .map(note_name)
        .collect();

    let lines = vec![
        anchor_line,
        Line::from(vec![Span::styled(" Bass:   ", label), Span::raw(bass)]),
        Line::from(vec![
            Span::styled(" Held:   ", label),
            Span::raw(if held.is_empty() {
                "-".to_string()
            } else {
                held.join(" ")
            }),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
