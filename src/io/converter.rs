use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Controller number of the "All Notes Off" channel-mode message.
const ALL_NOTES_OFF: u8 = 123;

/// Map a MIDI event to a synth message.
///
/// `channel_filter` restricts input to one channel; `None` accepts all.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|channel| channel != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn {
            key, velocity: 0, ..
        } => Some(SynthMessage::NoteOff {
            note: key,
            velocity: 0,
        }),
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, velocity, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity,
        }),
        MidiEvent::ControlChange {
            controller: ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on(channel: u8, key: u8, velocity: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        }
    }

    #[test]
    fn omni_accepts_every_channel() {
        for channel in 0..16 {
            assert!(matches!(
                midi_to_synth(note_on(channel, 60, 90), None),
                Some(SynthMessage::NoteOn {
                    note: 60,
                    velocity: 90
                })
            ));
        }
    }

    #[test]
    fn filter_drops_other_channels() {
        assert!(midi_to_synth(note_on(3, 60, 90), Some(2)).is_none());
        assert!(midi_to_synth(note_on(2, 60, 90), Some(2)).is_some());
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        assert!(matches!(
            midi_to_synth(note_on(0, 64, 0), None),
            Some(SynthMessage::NoteOff { note: 64, .. })
        ));
    }

    #[test]
    fn all_notes_off_controller() {
        let cc = MidiEvent::ControlChange {
            channel: 0,
            controller: 123,
            value: 0,
        };
        assert!(matches!(
            midi_to_synth(cc, None),
            Some(SynthMessage::AllNotesOff)
        ));

        let sustain = MidiEvent::ControlChange {
            channel: 0,
            controller: 64,
            value: 127,
        };
        assert!(midi_to_synth(sustain, None).is_none());
    }
}
