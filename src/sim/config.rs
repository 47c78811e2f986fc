use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::sim::calibration::Calibration;
use crate::sim::response::Energy;
use crate::sim::sampling::Distribution;
use crate::{PlaneGeometry, Point};

/// Distribution given by name and flat parameters, as in the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub kind: String,
    #[serde(default)]
    pub params: Vec<f64>,
}

impl DistributionConfig {
    pub fn new(kind: &str, params: Vec<f64>) -> Self {
        Self {
            kind: kind.to_string(),
            params,
        }
    }

    pub fn build(&self) -> SimResult<Distribution> {
        Distribution::from_name(&self.kind, &self.params)
    }
}

/// What goes into the truth and integral files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub run: u32,
    pub trigger: u32,
    /// PMT indices written to the integral file, in column order.
    pub channels: Vec<usize>,
    pub truth_path: Option<PathBuf>,
    pub integrals_path: Option<PathBuf>,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self {
            run: 0,
            trigger: 0,
            channels: vec![0, 1, 2, 3],
            truth_path: None,
            integrals_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of one forward-model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub geometry: PlaneGeometry,
    pub calibration: Calibration,
    /// PMT coordinates projected on the plane; column order of every matrix.
    pub pmts: Vec<Point>,
    pub num_events: usize,
    pub distribution: DistributionConfig,
    pub energy: Energy,
    /// Seed for the `uniform` distribution. Unseeded runs use the thread RNG.
    pub seed: Option<u64>,
    pub output: OutputConfig,
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            geometry: PlaneGeometry::default(),
            calibration: Calibration::default(),
            pmts: default_pmt_layout(),
            num_events: 1000,
            distribution: DistributionConfig::new("uniform", Vec::new()),
            energy: Energy::Scalar(crate::sim::calibration::REFERENCE_ENERGY),
            seed: None,
            output: OutputConfig::default(),
        }
    }

    /// Reads a run configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid run configuration")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run configuration")
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight PMTs in a 2 x 4 lattice under the 50 x 80 cm plane.
pub fn default_pmt_layout() -> Vec<Point> {
    let mut pmts = Vec::with_capacity(8);
    for y in [10.0, 30.0, 50.0, 70.0] {
        for x in [12.5, 37.5] {
            pmts.push(Point::new(x, y));
        }
    }
    pmts
}
