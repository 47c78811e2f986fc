use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the readout plane, in centimeters.
///
/// Used both for simulated event positions and for PMT coordinates
/// projected onto the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` when `other` sits `dz` above the plane.
    ///
    /// Never smaller than `dz.abs()`; equal to it only when the in-plane
    /// offset is zero.
    pub fn separation(&self, other: &Self, dz: f64) -> f64 {
        (dz.powi(2) + (other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(f, "Point({:.prec$}, {:.prec$})", self.x, self.y, prec = prec)
    }
}
