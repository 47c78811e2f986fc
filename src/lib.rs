//! Toy Monte-Carlo forward model of a PMT array looking at a GEM readout plane.
//!
//! Events are placed on the plane ([`PositionSampler`]), their distances to
//! every PMT computed, and each distance turned into the expected integrated
//! signal with a calibrated inverse-fourth-power law ([`ResponseModel`]).
//! The truth positions and integrals are written as flat tab-separated files
//! for an external position fitter ([`io`]).

pub mod error;
pub mod geom;
pub mod io;
pub mod logging;
pub mod sim;
pub mod vecutils;

// Prelude
pub use error::{SimError, SimResult};
pub use geom::plane::PlaneGeometry;
pub use geom::point::Point;
pub use sim::calibration::Calibration;
pub use sim::config::RunConfig;
pub use sim::forward::{ForwardResult, ForwardSimulation};
pub use sim::response::{DistanceMatrix, Energy, IntegralMatrix, ResponseModel};
pub use sim::sampling::{Distribution, PositionSampler};
