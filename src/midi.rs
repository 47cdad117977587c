// MIDI input: raw bytes from the first available port, decoded to
// `MidiMessage` and queued for the main loop.

use crossbeam_channel::{Receiver, bounded};
use midir::{Ignore, MidiInput, MidiInputConnection};
use tracing::{debug, info};

/// The messages the drum card reacts to. Everything else is dropped at parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// 14-bit, 8192 is centre.
    PitchBend { channel: u8, value: u16 },
    ChannelPressure { channel: u8, pressure: u8 },
    SystemReset,
}

impl MidiMessage {
    pub fn parse(bytes: &[u8]) -> Option<MidiMessage> {
        let (&status, data) = bytes.split_first()?;
        if status == 0xFF {
            return Some(MidiMessage::SystemReset);
        }
        let channel = status & 0x0F;
        let msg = match (status & 0xF0, data) {
            (0x90, &[note, velocity, ..]) => MidiMessage::NoteOn { channel, note, velocity },
            (0x80, &[note, velocity, ..]) => MidiMessage::NoteOff { channel, note, velocity },
            (0xB0, &[controller, value, ..]) => {
                MidiMessage::ControlChange { channel, controller, value }
            }
            (0xE0, &[lsb, msb, ..]) => MidiMessage::PitchBend {
                channel,
                value: ((msb as u16 & 0x7F) << 7) | (lsb as u16 & 0x7F),
            },
            (0xD0, &[pressure, ..]) => MidiMessage::ChannelPressure { channel, pressure },
            _ => return None,
        };
        Some(msg)
    }
}

/// Open input connection. Dropping it closes the port.
pub struct MidiIn {
    port_name: String,
    rx: Receiver<MidiMessage>,
    _connection: MidiInputConnection<()>,
}

impl MidiIn {
    /// Connect to the first input port. `Ok(None)` when there is none.
    pub fn connect_first() -> anyhow::Result<Option<MidiIn>> {
        let mut input = MidiInput::new("drumcard")
            .map_err(|e| anyhow::anyhow!("creating midi input: {e}"))?;
        input.ignore(Ignore::All);

        let ports = input.ports();
        let Some(port) = ports.first() else {
            info!("no midi input ports");
            return Ok(None);
        };
        let port_name = input.port_name(port).unwrap_or_else(|_| "unknown".into());

        let (tx, rx) = bounded(256);
        let connection = input
            .connect(
                port,
                "drumcard-in",
                move |_stamp, bytes, _| match MidiMessage::parse(bytes) {
                    Some(msg) => {
                        if tx.try_send(msg).is_err() {
                            debug!("midi queue full, dropping {msg:?}");
                        }
                    }
                    None => debug!("ignoring midi bytes {bytes:02x?}"),
                },
                (),
            )
            .map_err(|e| anyhow::anyhow!("connecting to {port_name}: {e}"))?;

        info!(port = %port_name, "midi input connected");
        Ok(Some(MidiIn { port_name, rx, _connection: connection }))
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Everything received since the last call.
    pub fn drain(&self) -> impl Iterator<Item = MidiMessage> + '_ {
        self.rx.try_iter()
    }
}
