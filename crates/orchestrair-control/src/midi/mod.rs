//! MIDI messages and note routing

#[cfg(feature = "midi")]
mod output;
mod router;

#[cfg(feature = "midi")]
pub use output::*;
pub use router::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Controller number of the "All Notes Off" channel mode message
pub const ALL_NOTES_OFF: u8 = 123;

/// MIDI message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MidiMessage {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        note: u8,
    },
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    ProgramChange {
        channel: u8,
        program: u8,
    },
}

impl MidiMessage {
    /// Parse a channel message from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0F;

        match (status & 0xF0, data) {
            (0x90, [note, 0, ..]) => Some(MidiMessage::NoteOff {
                channel,
                note: *note,
            }),
            (0x90, [note, velocity, ..]) => Some(MidiMessage::NoteOn {
                channel,
                note: *note,
                velocity: *velocity,
            }),
            (0x80, [note, ..]) => Some(MidiMessage::NoteOff {
                channel,
                note: *note,
            }),
            (0xB0, [controller, value, ..]) => Some(MidiMessage::ControlChange {
                channel,
                controller: *controller,
                value: *value,
            }),
            (0xC0, [program, ..]) => Some(MidiMessage::ProgramChange {
                channel,
                program: *program,
            }),
            _ => None,
        }
    }

    /// Convert to raw MIDI bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff { channel, note } => vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F],
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
        }
    }

    /// "All Notes Off" for a channel
    pub fn all_notes_off(channel: u8) -> Self {
        MidiMessage::ControlChange {
            channel,
            controller: ALL_NOTES_OFF,
            value: 0,
        }
    }
}

/// Destination for MIDI messages
pub trait MidiSink: Send {
    /// Send one message
    fn send(&mut self, message: &MidiMessage) -> Result<()>;

    /// Send several messages in order, stopping at the first failure
    fn send_all(&mut self, messages: &[MidiMessage]) -> Result<()> {
        for message in messages {
            self.send(message)?;
        }
        Ok(())
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Collects messages in memory
impl MidiSink for Vec<MidiMessage> {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        self.push(*message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_message_parsing() {
        let msg = MidiMessage::from_bytes(&[0x90, 60, 100]);
        assert_eq!(
            msg,
            Some(MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            })
        );

        // Note On with velocity 0 is a Note Off
        let msg = MidiMessage::from_bytes(&[0x93, 60, 0]);
        assert_eq!(
            msg,
            Some(MidiMessage::NoteOff {
                channel: 3,
                note: 60
            })
        );

        let msg = MidiMessage::from_bytes(&[0xC0, 10]);
        assert_eq!(
            msg,
            Some(MidiMessage::ProgramChange {
                channel: 0,
                program: 10
            })
        );
    }

    #[test]
    fn test_midi_message_rejects_short_input() {
        assert_eq!(MidiMessage::from_bytes(&[]), None);
        assert_eq!(MidiMessage::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiMessage::from_bytes(&[0xF8]), None);
    }

    #[test]
    fn test_midi_message_to_bytes() {
        let msg = MidiMessage::NoteOn {
            channel: 9,
            note: 36,
            velocity: 100,
        };
        assert_eq!(msg.to_bytes(), vec![0x99, 36, 100]);

        let msg = MidiMessage::NoteOff {
            channel: 0,
            note: 61,
        };
        assert_eq!(msg.to_bytes(), vec![0x80, 61, 0]);

        assert_eq!(MidiMessage::all_notes_off(2).to_bytes(), vec![0xB2, 123, 0]);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<MidiMessage> = Vec::new();
        sink.send_all(&[MidiMessage::all_notes_off(0), MidiMessage::all_notes_off(1)])
            .unwrap();
        assert_eq!(sink.len(), 2);
    }
}
