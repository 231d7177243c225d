//! Pointer input model and the press-gesture disambiguator.
//!
//! # Responsibility
//! - Define the pointer-space types consumed by the gesture machine.
//! - Classify press/move/release sequences on a document button as either
//!   an activate intent or a manipulate intent left to the host canvas.
//!
//! # Invariants
//! - The disambiguator never suppresses host-native select/drag/resize; it
//!   only observes the event stream.
//! - At most one activation is emitted per press-release cycle.

pub mod disambiguator;

pub use disambiguator::{
    Activation, GestureConfig, GestureDisambiguator, ThresholdPolicy,
};

/// Pointer position in host screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn distance_is_euclidean() {
        let origin = Point::new(100.0, 100.0);
        assert!((origin.distance_to(Point::new(103.0, 104.0)) - 5.0).abs() < 1e-9);
        assert_eq!(origin.distance_to(origin), 0.0);
    }
}
