use crate::Point;
use crate::error::{SimError, SimResult};
use crate::sim::config::RunConfig;
use crate::sim::response::{DistanceMatrix, IntegralMatrix, ResponseModel};
use crate::sim::sampling::{Distribution, PositionSampler};

/// Output of one forward-model run.
///
/// Row `i` of both matrices belongs to `positions[i]`; column `j` to PMT `j`.
#[derive(Debug, Clone)]
pub struct ForwardResult {
    pub positions: Vec<Point>,
    pub distances: DistanceMatrix,
    pub integrals: IntegralMatrix,
}

impl ForwardResult {
    pub fn num_events(&self) -> usize {
        self.positions.len()
    }

    pub fn num_pmts(&self) -> usize {
        self.distances.ncols()
    }
}

/// Sample -> distances -> integrals, for one configuration.
pub struct ForwardSimulation {
    config: RunConfig,
    distribution: Distribution,
    sampler: PositionSampler,
    model: ResponseModel,
}

impl ForwardSimulation {
    pub fn new(config: RunConfig) -> SimResult<Self> {
        let distribution = config.distribution.build()?;
        if config.pmts.is_empty() {
            return Err(SimError::InvalidGeometry(
                "PMT layout must contain at least one PMT".to_string(),
            ));
        }
        let sampler = PositionSampler::new(config.geometry);
        let model = ResponseModel::new(config.geometry, config.calibration)?;
        Ok(Self {
            config,
            distribution,
            sampler,
            model,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn model(&self) -> &ResponseModel {
        &self.model
    }

    /// Runs the model, seeded if the configuration carries a seed.
    pub fn run(&self) -> SimResult<ForwardResult> {
        let count = self.config.num_events;
        let positions = match self.config.seed {
            Some(seed) => self.sampler.sample_seeded(count, &self.distribution, seed)?,
            None => self.sampler.sample(count, &self.distribution)?,
        };
        self.respond(positions)
    }

    /// Runs the model with an explicit seed, ignoring the configured one.
    pub fn run_seeded(&self, seed: u64) -> SimResult<ForwardResult> {
        let count = self.config.num_events;
        let positions = self.sampler.sample_seeded(count, &self.distribution, seed)?;
        self.respond(positions)
    }

    /// Computes distances and integrals for given event positions.
    pub fn respond(&self, positions: Vec<Point>) -> SimResult<ForwardResult> {
        let distances = self.model.distance_matrix(&self.config.pmts, &positions)?;
        let integrals = self.model.integrals(&distances, &self.config.energy)?;
        tracing::debug!(
            events = positions.len(),
            pmts = self.config.pmts.len(),
            "Forward model finished"
        );
        Ok(ForwardResult {
            positions,
            distances,
            integrals,
        })
    }
}
