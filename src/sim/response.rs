use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::sim::calibration::Calibration;
use crate::{PlaneGeometry, Point};

/// Event-to-PMT distances [cm]. Rows are events, columns are PMTs.
pub type DistanceMatrix = Array2<f64>;

/// Expected integrated PMT signal. Same layout as [`DistanceMatrix`].
pub type IntegralMatrix = Array2<f64>;

/// Deposited energy: one value for all events, or one value per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Energy {
    Scalar(f64),
    PerEvent(Vec<f64>),
}

impl Energy {
    /// Fails unless the energy applies to exactly `num_events` events and
    /// every value is finite and non-negative.
    pub fn check(&self, num_events: usize) -> SimResult<()> {
        let values = match self {
            Self::Scalar(e) => std::slice::from_ref(e),
            Self::PerEvent(values) if values.len() == num_events => values.as_slice(),
            Self::PerEvent(values) => {
                return Err(SimError::EnergySizeMismatch {
                    expected: num_events,
                    actual: values.len(),
                });
            }
        };
        match values.iter().position(|e| !e.is_finite() || *e < 0.0) {
            Some(i) => Err(SimError::InvalidSampling(format!(
                "energy must be finite and non-negative, got {} (event {i})",
                values[i]
            ))),
            None => Ok(()),
        }
    }

    /// Energy of event `i`. Call `check` first.
    fn at(&self, i: usize) -> f64 {
        match self {
            Self::Scalar(e) => *e,
            Self::PerEvent(values) => values[i],
        }
    }
}

impl From<f64> for Energy {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Energy {
    fn from(values: Vec<f64>) -> Self {
        Self::PerEvent(values)
    }
}

/// Inverse-fourth-power PMT response for one geometry and calibration epoch.
///
/// The calibration constant is transferred to the geometry separation once,
/// at construction.
#[derive(Debug, Clone, Copy)]
pub struct ResponseModel {
    geometry: PlaneGeometry,
    constant: f64,
}

impl ResponseModel {
    pub fn new(geometry: PlaneGeometry, calibration: Calibration) -> SimResult<Self> {
        let constant = calibration.corrected_constant(geometry.separation())?;
        Ok(Self { geometry, constant })
    }

    /// Returns `A_corr`, the response constant at the geometry separation.
    pub fn calibration_constant(&self) -> f64 {
        self.constant
    }

    /// Distances from a single PMT to each event, in event order.
    pub fn distance_to(&self, pmt: &Point, events: &[Point]) -> Vec<f64> {
        let z = self.geometry.separation();
        events.iter().map(|ev| ev.separation(pmt, z)).collect()
    }

    /// Distance matrix with one row per event and one column per PMT.
    ///
    /// Column `j` equals `distance_to(&pmts[j], events)`. Duplicate PMTs give
    /// duplicate columns.
    pub fn distance_matrix(&self, pmts: &[Point], events: &[Point]) -> SimResult<DistanceMatrix> {
        if pmts.is_empty() {
            return Err(SimError::InvalidGeometry(
                "PMT layout must contain at least one PMT".to_string(),
            ));
        }
        if events.is_empty() {
            return Err(SimError::InvalidSampling(
                "no event positions to compute distances for".to_string(),
            ));
        }
        tracing::debug!(
            events = events.len(),
            pmts = pmts.len(),
            "Building distance matrix"
        );

        let z = self.geometry.separation();
        let mut distances = DistanceMatrix::zeros((events.len(), pmts.len()));
        distances
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(events.par_iter())
            .for_each(|(mut row, ev)| {
                for (d, pmt) in row.iter_mut().zip(pmts) {
                    *d = ev.separation(pmt, z);
                }
            });
        Ok(distances)
    }

    /// Expected integral for a single (distance, energy) pair.
    pub fn integral(&self, distance: f64, energy: f64) -> f64 {
        self.constant * energy / distance.powi(4)
    }

    /// Integral matrix `A_corr * E[i] / d[i][j]^4`, same shape as `distances`.
    pub fn integrals(
        &self,
        distances: &DistanceMatrix,
        energy: &Energy,
    ) -> SimResult<IntegralMatrix> {
        let num_events = distances.nrows();
        energy.check(num_events)?;
        tracing::debug!(
            events = num_events,
            pmts = distances.ncols(),
            "Building integral matrix"
        );

        let mut integrals = distances.clone();
        integrals
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut row)| {
                let e = energy.at(i);
                row.mapv_inplace(|d| self.integral(d, e));
            });
        Ok(integrals)
    }
}
