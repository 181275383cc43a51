use serde::{Deserialize, Serialize};

/// Minimum primary-skill proficiency for a non-learning assignment.
pub const THETA_MIN: f64 = 0.3;

/// Utility reported for candidates excluded by the skill gate.
pub const EXCLUDED_UTILITY: f64 = -10.0;

/// Relative weights of the utility components. They need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub capacity: f64,
    pub skill: f64,
    pub reliability: f64,
    pub learning: f64,
}

impl Weights {
    pub const fn new(capacity: f64, skill: f64, reliability: f64, learning: f64) -> Self {
        Self {
            capacity,
            skill,
            reliability,
            learning,
        }
    }

    pub const fn balanced() -> Self {
        Self::new(0.4, 0.3, 0.2, 0.1)
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::balanced()
    }
}
