// Copyright (c) 2024 Mike Tsao

//! The whole pipeline, from the rows of a chart's curve file to the rows that
//! replace them.

use crate::{
    automation::{split, AnnotatedSample, Sample, Sampler},
    chart::{format_row, parse_rows, ControlPoint},
    error::CurveError,
    types::TickGrid,
    util::CurveSettings,
};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};

/// Interpolates every segment of `points` and annotates the samples with
/// their auxiliary fields, in timeline order.
pub fn interpolate_points(
    points: &[ControlPoint],
    settings: &CurveSettings,
    grid: &TickGrid,
) -> anyhow::Result<Vec<AnnotatedSample>> {
    if points.is_empty() {
        return Err(CurveError::InsufficientPoints {
            mode: settings.mode.to_string(),
            required: settings.mode.min_points(),
            actual: 0,
        }
        .into());
    }
    let sampler = Sampler::new_with(settings.mode, settings.step);
    let mut annotated = Vec::default();
    for (index, segment) in split(points).into_iter().enumerate() {
        let start = grid.tick_to_position(segment[0].tick);
        log::debug!("segment {index}: {} points from {start}", segment.len());
        let samples: Vec<Sample> = sampler
            .sample(segment)
            .with_context(|| format!("in the segment starting at {start}"))?
            .into_iter()
            .map(|sample| Sample {
                value: settings.snapped(sample.value),
                ..sample
            })
            .collect();
        annotated.extend(settings.aux_policy.propagate(samples, segment));
    }
    Ok(annotated)
}

/// Turns input rows into output rows, each ending in a newline. Nothing here
/// touches the filesystem.
pub fn interpolate_lines<I, S>(lines: I, settings: &CurveSettings) -> anyhow::Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let grid = settings.grid()?;
    let points = parse_rows(lines, &grid, settings.slope_field_for_mode())?;
    Ok(interpolate_points(&points, settings, &grid)?
        .iter()
        .map(|row| format_row(&row.sample, &row.aux, &grid))
        .collect())
}

fn interpolate_file(path: &Path, settings: &CurveSettings) -> anyhow::Result<String> {
    // Bad settings should fail before any file is touched.
    settings.grid()?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    let rows = interpolate_lines(text.lines(), settings)
        .with_context(|| format!("while interpolating {}", path.display()))?;
    log::debug!("{}: {} rows generated", path.display(), rows.len());
    Ok(rows.concat())
}

/// Replaces the contents of `path` with its interpolated curve. The file is
/// left untouched if anything fails.
pub fn interpolate_in_place(path: &Path, settings: &CurveSettings) -> anyhow::Result<()> {
    let output = interpolate_file(path, settings)?;
    std::fs::write(path, output).with_context(|| format!("couldn't write {}", path.display()))?;
    log::info!("{} rewritten with {} curve", path.display(), settings.mode);
    Ok(())
}

/// The path [interpolate_to_named_output()] writes for `path`.
pub fn named_output_path(path: &Path, settings: &CurveSettings) -> PathBuf {
    path.parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&settings.output_name)
}

/// Writes the interpolated curve of `path` to a file named
/// `settings.output_name` in the same directory, and returns that file's
/// path. The input is never modified.
pub fn interpolate_to_named_output(
    path: &Path,
    settings: &CurveSettings,
) -> anyhow::Result<PathBuf> {
    let output_path = named_output_path(path, settings);
    if output_path == path {
        return Err(anyhow!(
            "would overwrite input file {}; rename it or choose another output name",
            path.display()
        ));
    }
    let output = interpolate_file(path, settings)?;
    std::fs::write(&output_path, output)
        .with_context(|| format!("couldn't write {}", output_path.display()))?;
    log::info!("output written to {}", output_path.display());
    Ok(output_path)
}
