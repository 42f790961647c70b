//! Drum strikes from vertical fingertip motion
//!
//! A strike fires when the index fingertip moves down faster than a
//! threshold. The pad then stays disarmed until the finger moves back up
//! faster than the same threshold.

use crate::landmark::{HandFrame, HandLandmark};
use serde::{Deserialize, Serialize};

/// Default strike threshold in pixels per frame
pub const DEFAULT_STRIKE_THRESHOLD: f32 = 15.0;

/// Which drum a hand plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrumPad {
    /// Played by the hand on the right half of the frame
    Kick,
    /// Played by the hand on the left half of the frame
    Snare,
}

/// A strike detected in a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrumHit {
    /// Pad that was struck
    pub pad: DrumPad,
    /// Downward speed in pixels per frame
    pub velocity: f32,
}

/// Edge detector for one pad
#[derive(Debug, Clone)]
pub struct StrikeDetector {
    threshold: f32,
    prev_y: Option<f32>,
    armed: bool,
}

impl Default for StrikeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STRIKE_THRESHOLD)
    }
}

impl StrikeDetector {
    /// Create a detector with a velocity threshold (pixels per frame)
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            prev_y: None,
            armed: true,
        }
    }

    /// Feed the fingertip's y position. Returns the velocity if this is a strike.
    pub fn update(&mut self, y: f32) -> Option<f32> {
        let mut strike = None;
        if let Some(prev) = self.prev_y {
            let velocity = y - prev;
            if velocity > self.threshold && self.armed {
                strike = Some(velocity);
                self.armed = false;
            }
            if velocity < -self.threshold {
                self.armed = true;
            }
        }
        self.prev_y = Some(y);
        strike
    }

    /// Forget the last position, e.g. when the hand left the frame
    pub fn forget(&mut self) {
        self.prev_y = None;
    }

    /// Whether the next fast downward motion will strike
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Two-pad kit driven by tracking frames
#[derive(Debug, Clone)]
pub struct DrumKit {
    frame_height: f32,
    kick: StrikeDetector,
    snare: StrikeDetector,
}

impl DrumKit {
    /// Create a kit. `frame_height` converts normalized y into pixels.
    pub fn new(frame_height: f32, threshold: f32) -> Self {
        Self {
            frame_height,
            kick: StrikeDetector::new(threshold),
            snare: StrikeDetector::new(threshold),
        }
    }

    /// Process a frame; the first complete hand on each side drives that pad.
    pub fn process(&mut self, frame: &HandFrame) -> Vec<DrumHit> {
        let mut hits = Vec::new();
        let mut seen_kick = false;
        let mut seen_snare = false;

        for hand in frame.hands.iter().filter(|h| h.is_complete()) {
            let (Some(wrist), Some(tip)) =
                (hand.get(HandLandmark::Wrist), hand.get(HandLandmark::IndexTip))
            else {
                continue;
            };

            let pad = if wrist.x < 0.5 {
                DrumPad::Snare
            } else {
                DrumPad::Kick
            };
            let (detector, seen) = match pad {
                DrumPad::Kick => (&mut self.kick, &mut seen_kick),
                DrumPad::Snare => (&mut self.snare, &mut seen_snare),
            };
            if *seen {
                continue;
            }
            *seen = true;

            if let Some(velocity) = detector.update(tip.y * self.frame_height) {
                hits.push(DrumHit { pad, velocity });
            }
        }

        if !seen_kick {
            self.kick.forget();
        }
        if !seen_snare {
            self.snare.forget();
        }
        hits
    }

    /// Drop the last position of both pads, e.g. after the feed was lost
    pub fn reset(&mut self) {
        self.kick.forget();
        self.snare.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Hand, Landmark, LANDMARKS_PER_HAND};

    fn hand(wrist_x: f32, tip_y: f32) -> Hand {
        let mut landmarks = vec![Landmark::new(wrist_x, 0.5, 0.0); LANDMARKS_PER_HAND];
        landmarks[HandLandmark::IndexTip.index()] = Landmark::new(wrist_x, tip_y, 0.0);
        Hand::new(landmarks)
    }

    #[test]
    fn test_strike_and_rearm() {
        let mut detector = StrikeDetector::new(15.0);
        assert_eq!(detector.update(100.0), None);
        assert_eq!(detector.update(130.0), Some(30.0));
        assert!(!detector.is_armed());
        // Still moving down: no second strike
        assert_eq!(detector.update(160.0), None);
        // Pull up re-arms
        assert_eq!(detector.update(120.0), None);
        assert!(detector.is_armed());
        assert_eq!(detector.update(140.0), Some(20.0));
    }

    #[test]
    fn test_slow_motion_ignored() {
        let mut detector = StrikeDetector::default();
        for y in [100.0, 110.0, 120.0, 130.0] {
            assert_eq!(detector.update(y), None);
        }
    }

    #[test]
    fn test_kit_assigns_pads_by_side() {
        let mut kit = DrumKit::new(480.0, DEFAULT_STRIKE_THRESHOLD);
        kit.process(&HandFrame::new(vec![hand(0.2, 0.2), hand(0.8, 0.2)]));
        let hits = kit.process(&HandFrame::new(vec![hand(0.2, 0.4), hand(0.8, 0.2)]));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pad, DrumPad::Snare);
        assert!((hits[0].velocity - 96.0).abs() < 1e-3);
    }

    #[test]
    fn test_kit_forgets_missing_hand() {
        let mut kit = DrumKit::new(480.0, DEFAULT_STRIKE_THRESHOLD);
        kit.process(&HandFrame::new(vec![hand(0.8, 0.1)]));
        kit.process(&HandFrame::default());
        // Reappearing lower must not count as a strike
        let hits = kit.process(&HandFrame::new(vec![hand(0.8, 0.9)]));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_kit_reset_forgets_both_pads() {
        let mut kit = DrumKit::new(480.0, DEFAULT_STRIKE_THRESHOLD);
        kit.process(&HandFrame::new(vec![hand(0.2, 0.1), hand(0.8, 0.1)]));
        kit.reset();
        let hits = kit.process(&HandFrame::new(vec![hand(0.2, 0.9), hand(0.8, 0.9)]));
        assert!(hits.is_empty());
    }
}
