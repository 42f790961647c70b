use super::{MidiMessage, MidiSink};
use crate::error::Result;
use orchestrair_core::{midi_note_number, DrumHit, DrumPad, KeyTransition, MidiConfig};
use tracing::trace;

/// General MIDI percussion channel (channel 10, zero-based)
pub const DRUM_CHANNEL: u8 = 9;
/// General MIDI bass drum
pub const KICK_NOTE: u8 = 36;
/// General MIDI acoustic snare
pub const SNARE_NOTE: u8 = 38;

/// Turns key transitions and drum hits into MIDI messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRouter {
    channel: u8,
    velocity: u8,
}

impl Default for NoteRouter {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

impl NoteRouter {
    /// Create a router. The channel is masked to 0-15 and the velocity clamped to 1-127.
    pub fn new(channel: u8, velocity: u8) -> Self {
        Self {
            channel: channel & 0x0F,
            velocity: velocity.clamp(1, 127),
        }
    }

    /// Router for the configured channel and velocity
    pub fn from_config(config: &MidiConfig) -> Self {
        Self::new(config.channel, config.velocity)
    }

    /// Channel notes are sent on
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Note-offs for exited keys followed by note-ons for entered keys.
    ///
    /// Labels without a MIDI number are skipped.
    pub fn transition_messages(&self, transition: &KeyTransition) -> Vec<MidiMessage> {
        let offs = transition
            .exited
            .iter()
            .filter_map(|label| self.note_for(label))
            .map(|note| MidiMessage::NoteOff {
                channel: self.channel,
                note,
            });
        let ons = transition
            .entered
            .iter()
            .filter_map(|label| self.note_for(label))
            .map(|note| MidiMessage::NoteOn {
                channel: self.channel,
                note,
                velocity: self.velocity,
            });
        offs.chain(ons).collect()
    }

    /// A short note on the percussion channel, louder for faster strikes
    pub fn drum_messages(&self, hit: &DrumHit) -> [MidiMessage; 2] {
        let note = match hit.pad {
            DrumPad::Kick => KICK_NOTE,
            DrumPad::Snare => SNARE_NOTE,
        };
        let velocity = hit.velocity.round().clamp(1.0, 127.0) as u8;
        [
            MidiMessage::NoteOn {
                channel: DRUM_CHANNEL,
                note,
                velocity,
            },
            MidiMessage::NoteOff {
                channel: DRUM_CHANNEL,
                note,
            },
        ]
    }

    /// Send the messages for a transition
    pub fn route<S: MidiSink + ?Sized>(&self, sink: &mut S, transition: &KeyTransition) -> Result<()> {
        if transition.is_empty() {
            return Ok(());
        }
        sink.send_all(&self.transition_messages(transition))
    }

    fn note_for(&self, label: &str) -> Option<u8> {
        let note = midi_note_number(label);
        if note.is_none() {
            trace!("No MIDI note for key '{}'", label);
        }
        note
    }
}
