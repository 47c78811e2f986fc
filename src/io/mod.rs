//! Flat-file output of simulated events.
//!
//! The truth file feeds the comparison tooling; the integral file feeds the
//! external position fitter.

pub mod tsv;

pub use tsv::{RunLabel, read_truth, write_integrals, write_truth};
