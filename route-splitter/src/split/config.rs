//! Splitter configuration.

use crate::domain::Direction;

/// Configuration parameters for classification and splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Whether the boundary stop ends the first derived trip *and* starts the
    /// second. When false it belongs to the first trip only, and the two
    /// derived trips partition the raw trip exactly.
    pub share_boundary_stop: bool,

    /// Whether a trip running direction 1 then direction 0 may be split.
    /// Direction 0 then direction 1 is always tried first.
    pub allow_reverse_split: bool,

    /// Direction given to passthrough trips whose feed declares none.
    pub default_direction: Direction,
}

impl SplitterConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        share_boundary_stop: bool,
        allow_reverse_split: bool,
        default_direction: Direction,
    ) -> Self {
        Self {
            share_boundary_stop,
            allow_reverse_split,
            default_direction,
        }
    }

    /// Set whether the boundary stop is shared by both derived trips.
    pub fn with_shared_boundary(mut self, share: bool) -> Self {
        self.share_boundary_stop = share;
        self
    }

    /// Set whether reverse (1 then 0) splits are allowed.
    pub fn with_reverse_split(mut self, allow: bool) -> Self {
        self.allow_reverse_split = allow;
        self
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            share_boundary_stop: true,
            allow_reverse_split: true,
            default_direction: Direction::Zero,
        }
    }
}
