use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{SimError, SimResult};
use crate::vecutils::linspace;
use crate::{PlaneGeometry, Point};

/// Spatial distribution of simulated events on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Independent uniform x and y over `[offset, offset + plane size)`.
    Uniform { x_offset: f64, y_offset: f64 },
    /// Evenly spaced x over `[x_start, x_end]` at constant y.
    FixedY {
        x_start: f64,
        x_end: f64,
        y_offset: f64,
    },
    /// Regular lattice with `rows` rows, emitted row by row.
    Grid {
        x_start: f64,
        x_end: f64,
        y_start: f64,
        y_end: f64,
        rows: usize,
    },
}

impl Distribution {
    /// Builds a distribution from its name and a flat parameter list.
    ///
    /// Accepted names and parameters:
    /// - `uniform`: `[]` or `[x_offset, y_offset]`
    /// - `fixedY` (or `fixed_y`): `[x_start, x_end, y_offset]`
    /// - `grid`: `[x_start, x_end, y_start, y_end, rows]`
    pub fn from_name(kind: &str, params: &[f64]) -> SimResult<Self> {
        if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
            return Err(SimError::InvalidSampling(format!(
                "distribution parameters must be finite, got {bad}"
            )));
        }
        match kind {
            "uniform" => match *params {
                [] => Ok(Self::Uniform {
                    x_offset: 0.0,
                    y_offset: 0.0,
                }),
                [x_offset, y_offset] => Ok(Self::Uniform { x_offset, y_offset }),
                _ => Err(wrong_arity(kind, "0 or 2", params.len())),
            },
            "fixedY" | "fixed_y" => match *params {
                [x_start, x_end, y_offset] => Ok(Self::FixedY {
                    x_start,
                    x_end,
                    y_offset,
                }),
                _ => Err(wrong_arity(kind, "3", params.len())),
            },
            "grid" => match *params {
                [x_start, x_end, y_start, y_end, rows] => {
                    if rows < 1.0 || rows.fract() != 0.0 {
                        return Err(SimError::InvalidSampling(format!(
                            "grid rows must be a positive integer, got {rows}"
                        )));
                    }
                    Ok(Self::Grid {
                        x_start,
                        x_end,
                        y_start,
                        y_end,
                        rows: rows as usize,
                    })
                }
                _ => Err(wrong_arity(kind, "5", params.len())),
            },
            other => Err(SimError::UnsupportedDistribution(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "uniform",
            Self::FixedY { .. } => "fixedY",
            Self::Grid { .. } => "grid",
        }
    }

    fn check_finite(&self) -> SimResult<()> {
        let values = match self {
            Self::Uniform { x_offset, y_offset } => vec![*x_offset, *y_offset],
            Self::FixedY {
                x_start,
                x_end,
                y_offset,
            } => vec![*x_start, *x_end, *y_offset],
            Self::Grid {
                x_start,
                x_end,
                y_start,
                y_end,
                ..
            } => vec![*x_start, *x_end, *y_start, *y_end],
        };
        match values.iter().find(|v| !v.is_finite()) {
            Some(bad) => Err(SimError::InvalidSampling(format!(
                "'{}' parameters must be finite, got {bad}",
                self.name()
            ))),
            None => Ok(()),
        }
    }
}

fn wrong_arity(kind: &str, expected: &str, actual: usize) -> SimError {
    SimError::InvalidSampling(format!(
        "'{kind}' takes {expected} parameters, got {actual}"
    ))
}

/// Draws event positions on the readout plane.
#[derive(Debug, Clone, Copy)]
pub struct PositionSampler {
    geometry: PlaneGeometry,
}

impl PositionSampler {
    pub fn new(geometry: PlaneGeometry) -> Self {
        Self { geometry }
    }

    /// Samples `count` positions using the thread-local RNG.
    pub fn sample(&self, count: usize, distribution: &Distribution) -> SimResult<Vec<Point>> {
        let mut rng = rand::thread_rng();
        self.sample_with_rng(count, distribution, &mut rng)
    }

    /// Samples `count` positions from a stream seeded with `seed`.
    ///
    /// The same seed and parameters always give the same positions.
    pub fn sample_seeded(
        &self,
        count: usize,
        distribution: &Distribution,
        seed: u64,
    ) -> SimResult<Vec<Point>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.sample_with_rng(count, distribution, &mut rng)
    }

    /// Samples `count` positions drawing all randomness from `rng`.
    ///
    /// Position `i` of the returned vector is event number `i` downstream.
    pub fn sample_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        distribution: &Distribution,
        rng: &mut R,
    ) -> SimResult<Vec<Point>> {
        if count == 0 {
            return Err(SimError::InvalidSampling(
                "event count must be positive".to_string(),
            ));
        }
        distribution.check_finite()?;
        tracing::debug!(kind = distribution.name(), count, "Sampling event positions");

        match *distribution {
            Distribution::Uniform { x_offset, y_offset } => {
                let (width, height) = self.geometry.dimensions();
                // Offsets far beyond the plane size swallow it in rounding
                let (x_end, y_end) = (x_offset + width, y_offset + height);
                if x_offset >= x_end || y_offset >= y_end {
                    return Err(SimError::InvalidSampling(format!(
                        "uniform range is empty at offsets ({x_offset}, {y_offset})"
                    )));
                }
                let pts = (0..count)
                    .map(|_| {
                        let x = rng.gen_range(x_offset..x_end);
                        let y = rng.gen_range(y_offset..y_end);
                        Point::new(x, y)
                    })
                    .collect();
                Ok(pts)
            }
            Distribution::FixedY {
                x_start,
                x_end,
                y_offset,
            } => Ok(linspace(x_start, x_end, count)
                .into_iter()
                .map(|x| Point::new(x, y_offset))
                .collect()),
            Distribution::Grid {
                x_start,
                x_end,
                y_start,
                y_end,
                rows,
            } => {
                if rows == 0 {
                    return Err(SimError::InvalidSampling(
                        "grid needs at least one row".to_string(),
                    ));
                }
                if count % rows != 0 {
                    return Err(SimError::InvalidSampling(format!(
                        "event count {count} is not a multiple of {rows} grid rows"
                    )));
                }
                if y_start.is_nan() || y_end.is_nan() || y_start >= y_end {
                    return Err(SimError::InvalidSampling(format!(
                        "grid y range is empty: y_start={y_start}, y_end={y_end}"
                    )));
                }
                let columns = count / rows;
                let xs = linspace(x_start, x_end, columns);
                let ys = linspace(y_start, y_end, rows);

                let mut pts = Vec::with_capacity(count);
                for &y in &ys {
                    for &x in &xs {
                        pts.push(Point::new(x, y));
                    }
                }
                Ok(pts)
            }
        }
    }
}
