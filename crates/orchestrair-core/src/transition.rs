//! Enter/exit transitions between consecutive active key sets

use crate::hit_test::ActiveKeySet;
use serde::{Deserialize, Serialize};

/// Keys that became active or inactive between two frames
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyTransition {
    /// Keys active now but not in the previous frame
    pub entered: Vec<String>,
    /// Keys active in the previous frame but not now
    pub exited: Vec<String>,
}

impl KeyTransition {
    /// Pure diff between the previous and the current set
    pub fn between(previous: &ActiveKeySet, current: &ActiveKeySet) -> Self {
        Self {
            entered: current.difference(previous).map(str::to_string).collect(),
            exited: previous.difference(current).map(str::to_string).collect(),
        }
    }

    /// True if nothing changed
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}
