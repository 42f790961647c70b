//! Key Registry - Static Table of Playable Regions
//!
//! Each key is an axis-aligned rectangle in the calibrated coordinate space
//! tagged with its note label. The table is built once and never mutated.
//! Sharp keys are allowed to overlap their natural neighbours.

use crate::calibration::Point2D;
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Characters that mark a label as a sharp
const SHARP_MARKERS: [char; 2] = ['#', '♯'];

/// One row of a key table as it appears in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Note label (e.g. "C", "C#", "C_High")
    pub note: String,
    /// Left edge
    pub x_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Top edge
    pub y_min: f32,
    /// Bottom edge
    pub y_max: f32,
}

impl KeySpec {
    /// Create a key table row
    pub fn new(note: impl Into<String>, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            note: note.into(),
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

/// A validated key with its derived sharp flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRegion {
    note: String,
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
    is_sharp: bool,
}

impl KeyRegion {
    /// Validate a table row and derive its sharp flag
    pub fn from_spec(spec: KeySpec) -> Result<Self> {
        let KeySpec {
            note,
            x_min,
            x_max,
            y_min,
            y_max,
        } = spec;

        if [x_min, x_max, y_min, y_max].iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidKeyRegion {
                note,
                reason: "bounds must be finite".to_string(),
            });
        }
        if x_min > x_max {
            return Err(CoreError::InvalidKeyRegion {
                note,
                reason: format!("x_min {} > x_max {}", x_min, x_max),
            });
        }
        if y_min > y_max {
            return Err(CoreError::InvalidKeyRegion {
                note,
                reason: format!("y_min {} > y_max {}", y_min, y_max),
            });
        }

        let is_sharp = note.contains(SHARP_MARKERS);
        Ok(Self {
            note,
            x_min,
            x_max,
            y_min,
            y_max,
            is_sharp,
        })
    }

    /// Note label
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Whether the label denotes a sharp
    pub fn is_sharp(&self) -> bool {
        self.is_sharp
    }

    /// Bounds as `(x_min, x_max, y_min, y_max)`
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.x_min, self.x_max, self.y_min, self.y_max)
    }

    /// Width of the rectangle
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the rectangle
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Closed-interval containment on both axes
    pub fn contains(&self, point: Point2D) -> bool {
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }

    /// Back to a plain table row
    pub fn to_spec(&self) -> KeySpec {
        KeySpec::new(
            self.note.clone(),
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
        )
    }
}

/// Ordered, immutable set of key regions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyRegistry {
    regions: Vec<KeyRegion>,
}

impl KeyRegistry {
    /// Build a registry from table rows, validating every row
    pub fn new(specs: impl IntoIterator<Item = KeySpec>) -> Result<Self> {
        let regions = specs
            .into_iter()
            .map(KeyRegion::from_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { regions })
    }

    /// Registry without any keys
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON key table (`[{"note": .., "x_min": .., ...}]`)
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<KeySpec> = serde_json::from_str(json)?;
        Self::new(specs)
    }

    /// One octave with C_High: eight naturals at y 260-350 and five sharps at
    /// y 260-320 straddling their neighbours.
    pub fn piano_octave() -> Self {
        Self::from_valid(piano_octave_specs())
    }

    /// The eight natural keys C..C_High in a single strip at y 330-350
    pub fn white_keys() -> Self {
        let notes = ["C", "D", "E", "F", "G", "A", "B", "C_High"];
        let specs = notes.iter().enumerate().map(|(i, note)| {
            let x_min = 255.0 + i as f32 * NATURAL_WIDTH;
            KeySpec::new(*note, x_min, x_min + NATURAL_WIDTH, 330.0, 350.0)
        });
        Self::from_valid(specs.collect())
    }

    fn from_valid(specs: Vec<KeySpec>) -> Self {
        let regions = specs
            .into_iter()
            .filter_map(|spec| KeyRegion::from_spec(spec).ok())
            .collect();
        Self { regions }
    }

    /// Regions in insertion order
    pub fn regions(&self) -> &[KeyRegion] {
        &self.regions
    }

    /// Look up a region by its label
    pub fn get(&self, note: &str) -> Option<&KeyRegion> {
        self.regions.iter().find(|r| r.note == note)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if the registry has no keys
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Plain table rows, e.g. for writing a config file
    pub fn to_specs(&self) -> Vec<KeySpec> {
        self.regions.iter().map(KeyRegion::to_spec).collect()
    }
}

const NATURAL_WIDTH: f32 = 18.75;
const SHARP_WIDTH: f32 = 11.25;

fn piano_octave_specs() -> Vec<KeySpec> {
    let naturals = ["C", "D", "E", "F", "G", "A", "B", "C_High"];
    let mut specs = Vec::with_capacity(13);

    for (i, note) in naturals.iter().enumerate() {
        let x_min = 255.0 + i as f32 * NATURAL_WIDTH;
        specs.push(KeySpec::new(
            *note,
            x_min,
            x_min + NATURAL_WIDTH,
            260.0,
            350.0,
        ));

        // Sharps sit on the boundary to the next natural
        let sharp = match *note {
            "C" | "D" | "F" | "G" | "A" => format!("{}#", note),
            _ => continue,
        };
        let boundary = x_min + NATURAL_WIDTH;
        specs.push(KeySpec::new(
            sharp,
            boundary - SHARP_WIDTH / 2.0,
            boundary + SHARP_WIDTH / 2.0,
            260.0,
            320.0,
        ));
    }

    specs
}
