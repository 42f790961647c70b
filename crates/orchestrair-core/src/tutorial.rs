//! Guided key-by-key tutorial
//!
//! The learner has to play the required notes in order. A step can only be
//! left after the required note was observed.

use serde::{Deserialize, Serialize};

/// Outcome of observing a played note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// The required note was played
    Correct,
    /// Some other note was played
    Incorrect,
}

/// Result of trying to move to the next step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialProgress {
    /// Moved on; the next required note is attached
    Next(String),
    /// The final step was passed
    Completed,
    /// The current step has not been played correctly yet
    NotReady,
}

/// State of one tutorial run
#[derive(Debug, Clone)]
pub struct TutorialSession {
    steps: Vec<String>,
    current: usize,
    satisfied: bool,
    completed: bool,
}

impl TutorialSession {
    /// Create a session over the notes to play, in order
    pub fn new<S: Into<String>>(steps: impl IntoIterator<Item = S>) -> Self {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        let completed = steps.is_empty();
        Self {
            steps,
            current: 0,
            satisfied: false,
            completed,
        }
    }

    /// The naturals and sharps of one octave, C to B
    pub fn chromatic_octave() -> Self {
        Self::new([
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ])
    }

    /// Note the learner has to play now
    pub fn required(&self) -> Option<&str> {
        if self.completed {
            return None;
        }
        self.steps.get(self.current).map(String::as_str)
    }

    /// Zero-based index of the current step
    pub fn step(&self) -> usize {
        self.current
    }

    /// Total number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for a session without steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True once the last step was passed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Observe a played note.
    ///
    /// A wrong note after a correct one clears the step again, the learner
    /// has to play the required note once more before advancing.
    pub fn observe(&mut self, note: &str) -> Feedback {
        if self.required() == Some(note) {
            self.satisfied = true;
            Feedback::Correct
        } else {
            self.satisfied = false;
            Feedback::Incorrect
        }
    }

    /// Move to the next step if the current one was played correctly
    pub fn advance(&mut self) -> TutorialProgress {
        if self.completed {
            return TutorialProgress::Completed;
        }
        if !self.satisfied {
            return TutorialProgress::NotReady;
        }

        self.satisfied = false;
        if self.current + 1 >= self.steps.len() {
            self.completed = true;
            return TutorialProgress::Completed;
        }
        self.current += 1;
        TutorialProgress::Next(self.steps[self.current].clone())
    }
}
