//! Hand skeleton scene data
//!
//! Data contract for the 3D hand view: joint positions in scene units and
//! one segment per finger bone.

use crate::landmark::{Hand, Landmark};
use glam::Vec3;
use serde::Serialize;

/// Scene units per normalized unit
const SCENE_SCALE: f32 = 4.0;

/// Finger bones as `(start, end)` landmark indices
pub const HAND_CONNECTIONS: [(usize, usize); 16] = [
    // Thumb
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    // Index
    (5, 6),
    (6, 7),
    (7, 8),
    // Middle
    (9, 10),
    (10, 11),
    (11, 12),
    // Ring
    (13, 14),
    (14, 15),
    (15, 16),
    // Pinky
    (17, 18),
    (18, 19),
    (19, 20),
];

/// A bone positioned in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoneSegment {
    /// Start landmark index
    pub start: usize,
    /// End landmark index
    pub end: usize,
    /// Scene-space midpoint
    pub midpoint: Vec3,
    /// Scene-space length
    pub length: f32,
    /// Rotation around the x and y axes, radians
    pub rotation: (f32, f32),
}

/// Place a landmark in the scene: centered on the origin, y flipped up.
pub fn scene_position(landmark: &Landmark) -> Vec3 {
    Vec3::new(
        landmark.x * SCENE_SCALE - SCENE_SCALE / 2.0,
        -landmark.y * SCENE_SCALE + SCENE_SCALE / 2.0,
        -landmark.z * SCENE_SCALE,
    )
}

/// Build all bones of a hand. Bones whose endpoints are missing are skipped.
pub fn bone_segments(hand: &Hand) -> Vec<BoneSegment> {
    HAND_CONNECTIONS
        .iter()
        .filter_map(|&(start, end)| {
            let a = hand.landmarks.get(start)?;
            let b = hand.landmarks.get(end)?;

            let delta = Vec3::new(b.x - a.x, b.y - a.y, b.z - a.z);
            let mid = Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0);

            Some(BoneSegment {
                start,
                end,
                midpoint: scene_position(&mid),
                length: delta.length() * SCENE_SCALE,
                rotation: (delta.y.atan2(delta.z), delta.x.atan2(delta.z)),
            })
        })
        .collect()
}
