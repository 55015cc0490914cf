/// A decoded channel-voice MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// -8192 (full down) to +8191 (full up), 0 = centre
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one message from raw bytes as delivered by a MIDI driver.
    ///
    /// System messages, truncated messages and unsupported status bytes give
    /// `None`.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (&status, rest) = data.split_first()?;
        if status < 0x80 || status >= 0xf0 {
            return None;
        }

        let channel = status & 0x0f;
        let data1 = || rest.first().map(|b| b & 0x7f);
        let data2 = || rest.get(1).map(|b| b & 0x7f);

        match status & 0xf0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1()?,
                velocity: data2()?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data1()?,
                velocity: data2()?,
            }),
            0xb0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1()?,
                value: data2()?,
            }),
            0xc0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data1()?,
            }),
            0xe0 => {
                let raw = (data2()? as i16) << 7 | data1()? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_messages() {
        assert_eq!(
            MidiEvent::parse(&[0x91, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 1,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0x80, 60, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn parses_pitch_bend_around_centre() {
        assert_eq!(
            MidiEvent::parse(&[0xe0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xe0, 0x7f, 0x7f]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 8191
            })
        );
    }

    #[test]
    fn rejects_truncated_and_system_messages() {
        assert_eq!(MidiEvent::parse(&[]), None);
        assert_eq!(MidiEvent::parse(&[0x90, 60]), None);
        assert_eq!(MidiEvent::parse(&[0xf8]), None);
        assert_eq!(MidiEvent::parse(&[0x3c, 0x40]), None);
        // channel pressure is not handled
        assert_eq!(MidiEvent::parse(&[0xd0, 0x40]), None);
    }
}
