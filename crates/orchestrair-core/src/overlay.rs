//! Overlay layout for the on-screen keyboard
//!
//! Converts key rectangles from the calibrated key space into viewport
//! pixels by linear scaling. This is downstream of, and independent from,
//! hit-testing.

use crate::calibration::CoordinateSpace;
use crate::hit_test::ActiveKeySet;
use crate::keys::KeyRegion;
use serde::Serialize;

/// Z layer for natural keys
pub const NATURAL_Z: u8 = 1;
/// Z layer for sharp keys, drawn above naturals
pub const SHARP_Z: u8 = 2;

/// A key placed in viewport pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRect {
    /// Note label
    pub note: String,
    /// Left edge in pixels
    pub left: f32,
    /// Top edge in pixels
    pub top: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Sharp key
    pub is_sharp: bool,
    /// Touched in the current frame
    pub is_active: bool,
    /// Stacking layer
    pub z_index: u8,
    /// Whether the label is drawn on the key
    pub show_label: bool,
}

/// Maps key space onto a viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayLayout {
    space: CoordinateSpace,
}

impl OverlayLayout {
    /// Create a layout for the given key space
    pub fn new(space: CoordinateSpace) -> Self {
        Self { space }
    }

    /// Scale a horizontal key-space coordinate into the viewport
    pub fn scale_x(&self, x: f32, viewport_width: f32) -> f32 {
        x / self.space.width * viewport_width
    }

    /// Scale a vertical key-space coordinate into the viewport
    pub fn scale_y(&self, y: f32, viewport_height: f32) -> f32 {
        y / self.space.height * viewport_height
    }

    /// Lay out every region, naturals first and sharps on top.
    ///
    /// Within a layer the registry order is preserved.
    pub fn layout(
        &self,
        active: &ActiveKeySet,
        regions: &[KeyRegion],
        viewport_width: f32,
        viewport_height: f32,
    ) -> Vec<KeyRect> {
        let mut rects: Vec<KeyRect> = regions
            .iter()
            .map(|region| {
                let (x_min, _, y_min, _) = region.bounds();
                let is_sharp = region.is_sharp();
                KeyRect {
                    note: region.note().to_string(),
                    left: self.scale_x(x_min, viewport_width),
                    top: self.scale_y(y_min, viewport_height),
                    width: self.scale_x(region.width(), viewport_width),
                    height: self.scale_y(region.height(), viewport_height),
                    is_sharp,
                    is_active: active.contains(region.note()),
                    z_index: if is_sharp { SHARP_Z } else { NATURAL_Z },
                    show_label: !is_sharp,
                }
            })
            .collect();

        // Stable sort keeps registry order inside each layer
        rects.sort_by_key(|r| r.z_index);
        rects
    }
}
