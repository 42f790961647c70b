//! Fingertip hit-testing against the key registry

use crate::calibration::Point2D;
use crate::keys::KeyRegion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Labels of all keys touched by at least one fingertip in the current frame.
///
/// Backed by an ordered set so logs and comparisons are stable; callers must
/// not rely on any particular order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveKeySet {
    labels: BTreeSet<String>,
}

impl ActiveKeySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is active
    pub fn contains(&self, note: &str) -> bool {
        self.labels.contains(note)
    }

    /// Mark a key as active
    pub fn insert(&mut self, note: impl Into<String>) -> bool {
        self.labels.insert(note.into())
    }

    /// Number of active keys
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no key is active
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over active labels
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Labels present here but not in `other`
    pub fn difference<'a>(&'a self, other: &'a ActiveKeySet) -> impl Iterator<Item = &'a str> {
        self.labels.difference(&other.labels).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Compute the set of keys containing at least one of `points`.
///
/// Containment is boundary-inclusive and overlapping regions all activate;
/// there is no priority between a sharp and the naturals beneath it.
pub fn active_keys(points: &[Point2D], regions: &[KeyRegion]) -> ActiveKeySet {
    let mut active = ActiveKeySet::new();
    if points.is_empty() {
        return active;
    }

    for region in regions {
        if points.iter().any(|p| region.contains(*p)) {
            active.insert(region.note());
        }
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyRegistry, KeySpec};
    use glam::Vec2;

    fn c_and_c_sharp() -> KeyRegistry {
        KeyRegistry::new(vec![
            KeySpec::new("C", 255.0, 273.75, 260.0, 350.0),
            KeySpec::new("C#", 268.125, 279.375, 260.0, 320.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_overlap_activates_both() {
        let registry = c_and_c_sharp();
        let active = active_keys(&[Vec2::new(270.0, 300.0)], registry.regions());
        let expected: ActiveKeySet = ["C", "C#"].into_iter().collect();
        assert_eq!(active, expected);
    }

    #[test]
    fn test_point_outside_all_regions() {
        let registry = c_and_c_sharp();
        let active = active_keys(&[Vec2::new(250.0, 300.0)], registry.regions());
        assert!(active.is_empty());
    }

    #[test]
    fn test_no_points() {
        let registry = c_and_c_sharp();
        assert!(active_keys(&[], registry.regions()).is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let active = active_keys(&[Vec2::new(270.0, 300.0)], KeyRegistry::empty().regions());
        assert!(active.is_empty());
    }

    #[test]
    fn test_boundary_inclusive() {
        let registry = c_and_c_sharp();
        let min_corner = active_keys(&[Vec2::new(255.0, 260.0)], registry.regions());
        assert!(min_corner.contains("C"));

        let max_corner = active_keys(&[Vec2::new(279.375, 320.0)], registry.regions());
        assert!(max_corner.contains("C#"));
        assert!(!max_corner.contains("C"));
    }

    #[test]
    fn test_union_over_points() {
        let registry = KeyRegistry::piano_octave();
        let points = [Vec2::new(260.0, 340.0), Vec2::new(300.0, 340.0)];
        let active = active_keys(&points, registry.regions());
        let expected: ActiveKeySet = ["C", "E"].into_iter().collect();
        assert_eq!(active, expected);
    }

    #[test]
    fn test_nan_point_never_hits() {
        let registry = c_and_c_sharp();
        let active = active_keys(&[Vec2::new(f32::NAN, 300.0)], registry.regions());
        assert!(active.is_empty());
    }

    #[test]
    fn test_difference() {
        let a: ActiveKeySet = ["C", "D"].into_iter().collect();
        let b: ActiveKeySet = ["D", "E"].into_iter().collect();
        assert_eq!(a.difference(&b).collect::<Vec<_>>(), vec!["C"]);
        assert_eq!(b.difference(&a).collect::<Vec<_>>(), vec!["E"]);
    }
}
