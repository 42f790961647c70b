//! Frame processing - landmarks in, active keys and transitions out
//!
//! Every tracking frame runs the same stateless pipeline:
//! fingertip extraction -> calibration -> hit-test. The only state carried
//! between frames is the previous [`ActiveKeySet`], used to derive
//! enter/exit transitions for edge-triggered consumers (MIDI, tutorials).

use crate::calibration::{Calibration, Point2D};
use crate::hit_test::{active_keys, ActiveKeySet};
use crate::keys::KeyRegistry;
use crate::landmark::{HandFrame, HandLandmark};
use crate::transition::KeyTransition;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which landmarks count as "fingertips" for hit-testing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingertipSelection {
    landmarks: Vec<HandLandmark>,
}

impl Default for FingertipSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FingertipSelection {
    /// Select an arbitrary set of landmarks
    pub fn new(landmarks: Vec<HandLandmark>) -> Self {
        Self { landmarks }
    }

    /// All five fingertips
    pub fn all() -> Self {
        Self::new(HandLandmark::FINGERTIPS.to_vec())
    }

    /// Only the index fingertip
    pub fn index_only() -> Self {
        Self::new(vec![HandLandmark::IndexTip])
    }

    /// Selected landmarks
    pub fn landmarks(&self) -> &[HandLandmark] {
        &self.landmarks
    }
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutput {
    /// Keys touched in this frame
    pub active: ActiveKeySet,
    /// Difference to the previous frame
    pub transition: KeyTransition,
    /// Mapped fingertip positions, in key space
    pub points: Vec<Point2D>,
    /// Hands that contributed fingertips
    pub hands_used: usize,
    /// Malformed hands that were ignored
    pub hands_skipped: usize,
}

/// Turns tracking frames into active key sets
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    calibration: Calibration,
    registry: KeyRegistry,
    fingertips: FingertipSelection,
    previous: ActiveKeySet,
}

impl FrameProcessor {
    /// Create a processor for a calibration/key table pair
    pub fn new(
        calibration: Calibration,
        registry: KeyRegistry,
        fingertips: FingertipSelection,
    ) -> Self {
        Self {
            calibration,
            registry,
            fingertips,
            previous: ActiveKeySet::new(),
        }
    }

    /// The key table in use
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// The calibration in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Active keys from the most recent frame
    pub fn current(&self) -> &ActiveKeySet {
        &self.previous
    }

    /// Process a frame. The result fully supersedes the previous frame.
    pub fn process(&mut self, frame: &HandFrame) -> FrameOutput {
        let mut points = Vec::with_capacity(frame.hands.len() * self.fingertips.landmarks().len());
        let mut hands_used = 0;
        let mut hands_skipped = 0;

        for (hand_index, hand) in frame.hands.iter().enumerate() {
            if !hand.is_complete() {
                trace!(
                    "Skipping hand {} with {} landmarks",
                    hand_index,
                    hand.landmarks.len()
                );
                hands_skipped += 1;
                continue;
            }

            hands_used += 1;
            points.extend(
                self.fingertips
                    .landmarks()
                    .iter()
                    .filter_map(|tip| hand.get(*tip))
                    .map(|lm| self.calibration.map_landmark(lm)),
            );
        }

        let active = active_keys(&points, self.registry.regions());
        let transition = KeyTransition::between(&self.previous, &active);
        self.previous = active.clone();

        FrameOutput {
            active,
            transition,
            points,
            hands_used,
            hands_skipped,
        }
    }

    /// Drop all active keys, e.g. after the tracking feed was lost.
    ///
    /// Returns a transition exiting every previously active key.
    pub fn reset(&mut self) -> KeyTransition {
        let transition = KeyTransition::between(&self.previous, &ActiveKeySet::new());
        self.previous = ActiveKeySet::new();
        transition
    }
}
