//! Tab-separated truth and integral files.
//!
//! Truth file: one row per event, `x\ty`, no header.
//!
//! Integral file: one row per event,
//! `run\tevent\ttrigger\tslice\t<channel columns...>`, no header. The slice
//! column is always 0 (one peak per event). Channel columns follow the order
//! of the selected PMT indices.

use crate::Point;
use crate::sim::response::IntegralMatrix;
use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Run and trigger numbers stamped on every integral row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunLabel {
    pub run: u32,
    pub trigger: u32,
}

/// Writes event positions to a truth file.
pub fn write_truth(path: &Path, positions: &[Point]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    format_truth(&mut writer, positions)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write truth file: {}", path.display()))?;
    Ok(())
}

/// Writes truth rows to any writer.
pub fn format_truth<W: Write>(writer: &mut W, positions: &[Point]) -> Result<()> {
    for p in positions {
        writeln!(writer, "{}\t{}", p.x, p.y)?;
    }
    Ok(())
}

/// Reads event positions back from a truth file.
pub fn read_truth(path: &Path) -> Result<Vec<Point>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut positions = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", i + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        positions.push(parse_truth_row(line).with_context(|| {
            format!("Invalid truth row at line {} of {}", i + 1, path.display())
        })?);
    }
    Ok(positions)
}

fn parse_truth_row(line: &str) -> Result<Point> {
    let mut cols = line.split('\t');
    let x = cols
        .next()
        .ok_or_else(|| anyhow!("missing x column"))?
        .trim()
        .parse::<f64>()
        .context("Invalid x")?;
    let y = cols
        .next()
        .ok_or_else(|| anyhow!("missing y column"))?
        .trim()
        .parse::<f64>()
        .context("Invalid y")?;
    anyhow::ensure!(cols.next().is_none(), "expected 2 columns");
    Ok(Point::new(x, y))
}

/// Writes the integral file read by the position fitter.
pub fn write_integrals(
    path: &Path,
    label: RunLabel,
    integrals: &IntegralMatrix,
    channels: &[usize],
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    format_integrals(&mut writer, label, integrals, channels)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write integral file: {}", path.display()))?;
    Ok(())
}

/// Writes integral rows for the selected channels to any writer.
///
/// Channels may repeat; each occurrence produces a column.
pub fn format_integrals<W: Write>(
    writer: &mut W,
    label: RunLabel,
    integrals: &IntegralMatrix,
    channels: &[usize],
) -> Result<()> {
    anyhow::ensure!(!channels.is_empty(), "No PMT channels selected for output");
    let num_pmts = integrals.ncols();
    if let Some(&bad) = channels.iter().find(|&&c| c >= num_pmts) {
        anyhow::bail!("PMT channel {bad} out of range: model has {num_pmts} PMTs");
    }

    for (event, row) in integrals.rows().into_iter().enumerate() {
        write!(writer, "{}\t{}\t{}\t0", label.run, event, label.trigger)?;
        for &c in channels {
            write!(writer, "\t{}", row[c])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
