use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default GEM plane width [cm].
pub const DEFAULT_PLANE_WIDTH: f64 = 50.0;
/// Default GEM plane height [cm].
pub const DEFAULT_PLANE_HEIGHT: f64 = 80.0;
/// Default distance between the GEM plane and the PMT array [cm].
pub const DEFAULT_PLANE_TO_ARRAY_Z: f64 = 59.0;

/// Fixed detector geometry: the readout plane and its distance to the PMT array.
///
/// All lengths are in centimeters and strictly positive. The value is
/// immutable once built; several geometries may coexist in one process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlaneGeometry")]
pub struct PlaneGeometry {
    width: f64,
    height: f64,
    plane_to_array_z: f64,
}

impl PlaneGeometry {
    pub fn new(width: f64, height: f64, plane_to_array_z: f64) -> SimResult<Self> {
        check_length("plane width", width)?;
        check_length("plane height", height)?;
        check_length("plane-to-array separation", plane_to_array_z)?;
        Ok(Self {
            width,
            height,
            plane_to_array_z,
        })
    }

    /// Returns plane (width, height).
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Returns the plane-to-PMT-array separation.
    pub fn separation(&self) -> f64 {
        self.plane_to_array_z
    }

    /// Returns a copy with a different plane-to-array separation.
    pub fn with_separation(&self, plane_to_array_z: f64) -> SimResult<Self> {
        Self::new(self.width, self.height, plane_to_array_z)
    }
}

impl Default for PlaneGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLANE_WIDTH,
            height: DEFAULT_PLANE_HEIGHT,
            plane_to_array_z: DEFAULT_PLANE_TO_ARRAY_Z,
        }
    }
}

/// Unvalidated mirror used for deserialization.
#[derive(Deserialize)]
struct RawPlaneGeometry {
    width: f64,
    height: f64,
    plane_to_array_z: f64,
}

impl TryFrom<RawPlaneGeometry> for PlaneGeometry {
    type Error = SimError;

    fn try_from(raw: RawPlaneGeometry) -> SimResult<Self> {
        Self::new(raw.width, raw.height, raw.plane_to_array_z)
    }
}

pub(crate) fn check_length(what: &str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::InvalidGeometry(format!(
            "{what} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let geom = PlaneGeometry::new(50.0, 80.0, 59.0).unwrap();
        assert_eq!(geom.dimensions(), (50.0, 80.0));
        assert_eq!(geom.separation(), 59.0);
    }

    #[test]
    fn test_default_matches_gem_plane() {
        let geom = PlaneGeometry::default();
        assert_eq!(geom.dimensions(), (50.0, 80.0));
        assert_eq!(geom.separation(), 59.0);
    }

    #[test]
    fn test_rejects_non_positive() {
        for (w, h, z) in [
            (0.0, 80.0, 59.0),
            (50.0, -1.0, 59.0),
            (50.0, 80.0, 0.0),
            (f64::NAN, 80.0, 59.0),
            (50.0, f64::INFINITY, 59.0),
        ] {
            let res = PlaneGeometry::new(w, h, z);
            assert!(
                matches!(res, Err(SimError::InvalidGeometry(_))),
                "({w}, {h}, {z}) should be rejected"
            );
        }
    }

    #[test]
    fn test_with_separation() {
        let geom = PlaneGeometry::default();
        let moved = geom.with_separation(45.7).unwrap();
        assert_eq!(moved.dimensions(), geom.dimensions());
        assert_eq!(moved.separation(), 45.7);
        assert!(geom.with_separation(-3.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: PlaneGeometry =
            serde_json::from_str(r#"{"width": 33.0, "height": 33.0, "plane_to_array_z": 62.5}"#)
                .unwrap();
        assert_eq!(ok.dimensions(), (33.0, 33.0));
        assert_eq!(ok.separation(), 62.5);

        let bad = serde_json::from_str::<PlaneGeometry>(
            r#"{"width": 33.0, "height": 33.0, "plane_to_array_z": -1.0}"#,
        );
        assert!(bad.is_err());
    }
}
