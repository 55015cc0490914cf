//! MIDI input: decode driver bytes and forward them to the synth queue

use color_eyre::eyre::{eyre, Result as EyreResult};
use midir::{MidiInput, MidiInputConnection};
use rtrb::Producer;

use justsynth::{
    io::{converter::midi_to_synth, midi::MidiEvent},
    SynthMessage,
};

const CLIENT_NAME: &str = "justsynth";

/// Names of the available input ports, in index order.
pub fn list_ports() -> EyreResult<Vec<String>> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;
    let names = midi_in
        .ports()
        .iter()
        .map(|port| {
            midi_in
                .port_name(port)
                .unwrap_or_else(|_| "<unnamed>".to_string())
        })
        .collect();
    Ok(names)
}

/// An open input connection. Dropping it closes the port.
pub struct MidiInputPort {
    _connection: MidiInputConnection<()>,
    name: String,
}

impl MidiInputPort {
    /// Connect to port `index` and push converted messages onto `tx`.
    ///
    /// The callback runs on the driver's thread and only touches the queue.
    pub fn connect(
        index: usize,
        mut tx: Producer<SynthMessage>,
        channel: Option<u8>,
    ) -> EyreResult<Self> {
        let midi_in = MidiInput::new(CLIENT_NAME)?;
        let ports = midi_in.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| eyre!("MIDI port {index} not found ({} available)", ports.len()))?;
        let name = midi_in.port_name(port)?;

        let connection = midi_in
            .connect(
                port,
                "justsynth-input",
                move |_stamp, bytes, _| {
                    let Some(msg) = MidiEvent::parse(bytes).and_then(|e| midi_to_synth(e, channel))
                    else {
                        return;
                    };
                    if tx.push(msg).is_err() {
                        log::warn!("MIDI queue full, dropping input");
                    }
                },
                (),
            )
            .map_err(|e| eyre!("failed to connect to MIDI port {index}: {e}"))?;

        log::info!("MIDI input connected: {name}");
        Ok(Self {
            _connection: connection,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
