//! Calibration - Landmark to Key Space Mapping
//!
//! Normalized landmark coordinates are converted into the fixed coordinate
//! space the key regions are expressed in by a per-axis affine transform:
//!
//! ```text
//! x = a_x * landmark.x + b_x
//! y = a_y * landmark.y + b_y
//! ```
//!
//! The constants are tuned against the tracking camera's field of view and
//! must stay consistent with the key table. A negative `a_x` mirrors the
//! camera image horizontally.

use crate::landmark::Landmark;
use crate::{CoreError, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in key space
pub type Point2D = Vec2;

/// Fixed-resolution coordinate space shared by the calibration and the key table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSpace {
    /// Width in key-space units
    pub width: f32,
    /// Height in key-space units
    pub height: f32,
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

impl CoordinateSpace {
    /// Create a new coordinate space
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if a point lies within the space (edges included)
    pub fn contains(&self, point: Point2D) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Affine calibration constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Horizontal scale
    pub a_x: f32,
    /// Horizontal offset
    pub b_x: f32,
    /// Vertical scale
    pub a_y: f32,
    /// Vertical offset
    pub b_y: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            a_x: -246.71,
            b_x: 481.23,
            a_y: 290.32,
            b_y: 138.06,
        }
    }
}

impl Calibration {
    /// Create a calibration from its four constants
    pub fn new(a_x: f32, b_x: f32, a_y: f32, b_y: f32) -> Self {
        Self { a_x, b_x, a_y, b_y }
    }

    /// Identity-like calibration that scales the unit square onto `space`
    pub fn stretch_to(space: CoordinateSpace) -> Self {
        Self::new(space.width, 0.0, space.height, 0.0)
    }

    /// Map a normalized landmark into key space.
    ///
    /// Out-of-range landmarks are not clamped; they simply land outside every
    /// key. Depth is ignored.
    pub fn map_landmark(&self, landmark: &Landmark) -> Point2D {
        self.map_point(landmark.x, landmark.y)
    }

    /// Map a raw normalized `(x, y)` pair into key space
    pub fn map_point(&self, x: f32, y: f32) -> Point2D {
        Vec2::new(self.a_x * x + self.b_x, self.a_y * y + self.b_y)
    }

    /// Reject constants that can never produce a usable mapping
    pub fn validate(&self) -> Result<()> {
        let constants = [self.a_x, self.b_x, self.a_y, self.b_y];
        if constants.iter().any(|c| !c.is_finite()) {
            return Err(CoreError::InvalidCalibration(
                "constants must be finite".to_string(),
            ));
        }
        if self.a_x == 0.0 || self.a_y == 0.0 {
            return Err(CoreError::InvalidCalibration(
                "scale factors must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the mapped unit square overlaps `space` at all.
    ///
    /// A mismatch between calibration and key table cannot be detected per
    /// frame (keys just never activate), so this is checked once at startup.
    pub fn covers(&self, space: CoordinateSpace) -> bool {
        let a = self.map_point(0.0, 0.0);
        let b = self.map_point(1.0, 1.0);
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        max_x >= 0.0 && min_x <= space.width && max_y >= 0.0 && min_y <= space.height
    }
}
