//! Note labels, MIDI numbers and the recently played notes

use crate::transition::KeyTransition;
use std::collections::VecDeque;

/// How many entered notes are remembered
pub const MAX_RECENT_NOTES: usize = 10;

/// MIDI note number for a key label (middle-C octave, `C_High` = 72).
///
/// Returns `None` for labels that are not notes of this octave.
pub fn midi_note_number(label: &str) -> Option<u8> {
    let number = match label {
        "C" => 60,
        "C#" | "C♯" => 61,
        "D" => 62,
        "D#" | "D♯" => 63,
        "E" => 64,
        "F" => 65,
        "F#" | "F♯" => 66,
        "G" => 67,
        "G#" | "G♯" => 68,
        "A" => 69,
        "A#" | "A♯" => 70,
        "B" => 71,
        other if other.eq_ignore_ascii_case("c_high") => 72,
        _ => return None,
    };
    Some(number)
}

/// Ring of the most recently entered notes, oldest first
#[derive(Debug, Clone, Default)]
pub struct NoteHistory {
    notes: VecDeque<String>,
}

impl NoteHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single note, dropping the oldest beyond the limit
    pub fn push(&mut self, note: impl Into<String>) {
        self.notes.push_back(note.into());
        while self.notes.len() > MAX_RECENT_NOTES {
            self.notes.pop_front();
        }
    }

    /// Record every key that was entered in a frame
    pub fn record(&mut self, transition: &KeyTransition) {
        for note in &transition.entered {
            self.push(note.clone());
        }
    }

    /// Remembered notes, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(String::as_str)
    }

    /// Most recently entered note
    pub fn latest(&self) -> Option<&str> {
        self.notes.back().map(String::as_str)
    }

    /// Number of remembered notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True if nothing has been played
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Take all remembered notes, leaving the history empty
    pub fn drain(&mut self) -> Vec<String> {
        self.notes.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_numbers() {
        assert_eq!(midi_note_number("C"), Some(60));
        assert_eq!(midi_note_number("C#"), Some(61));
        assert_eq!(midi_note_number("B"), Some(71));
        assert_eq!(midi_note_number("C_High"), Some(72));
        assert_eq!(midi_note_number("C_high"), Some(72));
        assert_eq!(midi_note_number("kick"), None);
    }

    #[test]
    fn test_history_capped() {
        let mut history = NoteHistory::new();
        for i in 0..15 {
            history.push(format!("n{}", i));
        }
        assert_eq!(history.len(), MAX_RECENT_NOTES);
        assert_eq!(history.recent().next(), Some("n5"));
        assert_eq!(history.latest(), Some("n14"));
    }

    #[test]
    fn test_record_transition() {
        let mut history = NoteHistory::new();
        history.record(&KeyTransition {
            entered: vec!["C".to_string(), "E".to_string()],
            exited: vec!["D".to_string()],
        });
        assert_eq!(history.recent().collect::<Vec<_>>(), vec!["C", "E"]);
    }

    #[test]
    fn test_drain() {
        let mut history = NoteHistory::new();
        history.push("G");
        assert_eq!(history.drain(), vec!["G".to_string()]);
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
    }
}
