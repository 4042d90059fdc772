//! Edge detection for digital inputs
//!
//! A physical press holds the input active for many poll cycles, so callers
//! react to transitions between consecutive samples instead of levels.

/// Transition observed between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Inactive -> active
    Rising,
    /// Active -> inactive
    Falling,
    None,
}

/// One-sample memory edge detector
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn new(initial: bool) -> Self {
        Self { previous: initial }
    }

    /// Feed the current sample and return the transition since the last one
    pub fn update(&mut self, current: bool) -> Edge {
        let edge = match (self.previous, current) {
            (false, true) => Edge::Rising,
            (true, false) => Edge::Falling,
            _ => Edge::None,
        };
        self.previous = current;
        edge
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(false)
    }
}
