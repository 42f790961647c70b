//! Hand landmark frames
//!
//! The tracking service emits one [`HandFrame`] per camera frame. Each hand is
//! an ordered list of 21 normalized landmarks whose indices have a fixed
//! anatomical meaning (see [`HandLandmark`]).

use serde::{Deserialize, Serialize};

/// Number of landmarks in a well-formed hand
pub const LANDMARKS_PER_HAND: usize = 21;

/// A single tracked point on a hand.
///
/// `x` and `y` are normalized to the camera frame and nominally lie in
/// `[0, 1]`, although values slightly outside that range occur near the
/// frame edges. `z` is an unnormalized depth estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (normalized)
    pub x: f32,
    /// Vertical position (normalized, grows downwards)
    pub y: f32,
    /// Depth estimate
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Create a new landmark
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Anatomical landmark indices
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    /// All five fingertips, thumb first
    pub const FINGERTIPS: [HandLandmark; 5] = [
        HandLandmark::ThumbTip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleTip,
        HandLandmark::RingTip,
        HandLandmark::PinkyTip,
    ];

    /// Index into a hand's landmark list
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One tracked hand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    /// Landmarks in anatomical order
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    /// Create a hand from its landmarks
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Whether the hand carries exactly the expected number of landmarks
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARKS_PER_HAND
    }

    /// Landmark at an anatomical position, if present
    pub fn get(&self, landmark: HandLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }
}

/// All hands seen in one camera frame.
///
/// Serialized as `{"hands": [[{x, y, z}, ...], ...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandFrame {
    /// Tracked hands, in tracker order
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl HandFrame {
    /// Create a frame from its hands
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// True if no hand was tracked
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
