//! Response calibration and its transfer between plane-to-array separations.
//!
//! The response law is `I = A * E / d^4`. The constant `A` was fitted once on
//! calibration data taken at a reference separation; this module converts it
//! to energy units and carries it to the separation of the simulated geometry.
//!
//! Two historical transfer rules exist and both are kept:
//! - `rescale = true`: quadratic rule, evaluated through the intermediate
//!   light quantities `L0 = A E_ref / z_ref^4`, `L1 = L0 z_ref^2 / z^2`,
//!   `A_corr = L1 z^4 / E_ref`.
//! - `rescale = false`: quartic rule, `A_corr = A z^4 / z_ref^4`.
//!
//! They agree only at `z == z_ref`.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::geom::plane::check_length;

/// Fitted response constant at the reference geometry [integral * cm^4 / light-yield unit].
pub const REFERENCE_RESPONSE: f64 = 2.27e10;
/// Light yield of the reference deposit [light-yield units].
pub const REFERENCE_LIGHT_YIELD: f64 = 7.4;
/// Reference deposited energy [keV] (55Fe line).
pub const REFERENCE_ENERGY: f64 = 5.9;
/// Plane-to-array separation of the calibration run [cm].
pub const REFERENCE_SEPARATION: f64 = 53.0;

/// Calibration epoch of the PMT response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub reference_response: f64,
    pub reference_light_yield: f64,
    pub reference_energy: f64,
    pub reference_separation: f64,
    /// Selects the quadratic (true) or quartic (false) transfer rule.
    pub rescale: bool,
}

impl Calibration {
    pub fn new() -> Self {
        Self {
            reference_response: REFERENCE_RESPONSE,
            reference_light_yield: REFERENCE_LIGHT_YIELD,
            reference_energy: REFERENCE_ENERGY,
            reference_separation: REFERENCE_SEPARATION,
            rescale: true,
        }
    }

    pub fn with_rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    /// Checks that every reference value is positive and finite.
    pub fn validate(&self) -> SimResult<()> {
        check_length("reference response", self.reference_response)?;
        check_length("reference light yield", self.reference_light_yield)?;
        check_length("reference energy", self.reference_energy)?;
        check_length("reference separation", self.reference_separation)?;
        Ok(())
    }

    /// Reference constant converted to charge per unit deposited energy.
    pub fn energy_normalized(&self) -> f64 {
        self.reference_response * (self.reference_energy / self.reference_light_yield)
    }

    /// Response constant `A_corr` valid at plane-to-array separation `z`.
    pub fn corrected_constant(&self, z: f64) -> SimResult<f64> {
        self.validate()?;
        check_length("plane-to-array separation", z)?;

        let a = self.energy_normalized();
        let e_ref = self.reference_energy;
        let z_ref = self.reference_separation;

        let a_corr = if self.rescale {
            let l0 = a * e_ref / z_ref.powi(4);
            let l1 = l0 * z_ref.powi(2) / z.powi(2);
            l1 * z.powi(4) / e_ref
        } else {
            a * z.powi(4) / z_ref.powi(4)
        };
        tracing::debug!(z, z_ref, rescale = self.rescale, a_corr, "Calibration transferred");
        Ok(a_corr)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}
