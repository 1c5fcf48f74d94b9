// Copyright (c) 2024 Mike Tsao

//! Estimates the slope at each control point of an existing curve by fitting
//! a least-squares cubic to the dense points between each pair of control
//! points.
//!
//! Ticks are normalized to [0, 1] over the span of all the points, control
//! and interpolated together, so the slopes are dy/dx on that axis.

use anyhow::Context;
use nalgebra::{Matrix4, Vector4};
use std::path::Path;
use voxcurve::{
    automation::Sample,
    chart::{format_row, parse_rows, AuxFields, ControlPoint},
    types::{Tick, TickGrid},
    CurveError,
};

const FIT: &str = "cubic fit";

/// The cubic fitted between two neighboring control points.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentFit {
    /// Index of the control point the segment starts at.
    pub index: usize,
    /// Normalized x of the segment's start.
    pub start: f64,
    /// Normalized x of the segment's end.
    pub end: f64,
    /// `c0 + c1 x + c2 x² + c3 x³`, lowest order first.
    pub coefficients: [f64; 4],
    /// dy/dx at `start`.
    pub slope_at_start: f64,
    /// dy/dx at `end`.
    pub slope_at_end: f64,
}
impl SegmentFit {
    /// The fitted polynomial at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let [c0, c1, c2, c3] = self.coefficients;
        c0 + x * (c1 + x * (c2 + x * c3))
    }

    /// The fitted polynomial's derivative at `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        let [_, c1, c2, c3] = self.coefficients;
        c1 + x * (2.0 * c2 + x * 3.0 * c3)
    }
}

struct Normalizer {
    min: f64,
    span: f64,
}
impl Normalizer {
    fn new_with(ticks: impl Iterator<Item = Tick>) -> Result<Self, CurveError> {
        let (min, max) = ticks.fold((usize::MAX, usize::MIN), |(min, max), tick| {
            (min.min(tick.0), max.max(tick.0))
        });
        if max <= min {
            return Err(CurveError::InsufficientPoints {
                mode: FIT.to_string(),
                required: 2,
                actual: if max == min { 1 } else { 0 },
            });
        }
        Ok(Self {
            min: min as f64,
            span: (max - min) as f64,
        })
    }

    fn normalize(&self, tick: Tick) -> f64 {
        (tick.0 as f64 - self.min) / self.span
    }
}

/// Least-squares cubic through `points`, solved with the normal equations.
fn fit_cubic(points: &[(f64, f64)]) -> Result<[f64; 4], CurveError> {
    let mut distinct: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    distinct.dedup();
    let insufficient = |actual| CurveError::InsufficientPoints {
        mode: FIT.to_string(),
        required: 4,
        actual,
    };
    if distinct.len() < 4 {
        return Err(insufficient(distinct.len()));
    }

    let mut normal = Matrix4::<f64>::zeros();
    let mut rhs = Vector4::<f64>::zeros();
    for &(x, y) in points {
        let powers = [1.0, x, x * x, x * x * x];
        for row in 0..4 {
            rhs[row] += powers[row] * y;
            for column in 0..4 {
                normal[(row, column)] += powers[row] * powers[column];
            }
        }
    }
    let Some(inverse) = normal.try_inverse() else {
        return Err(insufficient(distinct.len()));
    };
    let c = inverse * rhs;
    Ok([c[0], c[1], c[2], c[3]])
}

/// Fits a cubic to the interpolated points between each pair of neighboring
/// control points. Both inputs must be in timeline order. Pairs that share a
/// tick have no width and are skipped.
pub fn find_slopes(
    control: &[ControlPoint],
    interpolated: &[ControlPoint],
) -> Result<Vec<SegmentFit>, CurveError> {
    let normalizer =
        Normalizer::new_with(control.iter().chain(interpolated).map(|point| point.tick))?;
    let dense: Vec<(f64, f64)> = interpolated
        .iter()
        .map(|point| (normalizer.normalize(point.tick), point.value))
        .collect();

    let mut fits = Vec::default();
    for (index, pair) in control.windows(2).enumerate() {
        let (start, end) = (
            normalizer.normalize(pair[0].tick),
            normalizer.normalize(pair[1].tick),
        );
        if pair[0].tick == pair[1].tick {
            log::debug!("control points {index} and {} share a tick", index + 1);
            continue;
        }
        let segment: Vec<(f64, f64)> = dense
            .iter()
            .copied()
            .filter(|(x, _)| (start..=end).contains(x))
            .collect();
        let fit = fit_cubic(&segment)?;
        let mut fit = SegmentFit {
            index,
            start,
            end,
            coefficients: fit,
            slope_at_start: 0.0,
            slope_at_end: 0.0,
        };
        fit.slope_at_start = fit.derivative(start);
        fit.slope_at_end = fit.derivative(end);
        log::debug!(
            "segment {index}: dy/dx {:.10} at {start}, {:.10} at {end}",
            fit.slope_at_start,
            fit.slope_at_end
        );
        fits.push(fit);
    }
    Ok(fits)
}

/// One slope per control point. Interior points average the slopes of the
/// segments on either side of them. A point with no fitted segment on either
/// side gets `None`.
pub fn control_point_slopes(control_count: usize, fits: &[SegmentFit]) -> Vec<Option<f64>> {
    let mut sums = vec![(0.0, 0); control_count];
    for fit in fits {
        if let Some(sum) = sums.get_mut(fit.index) {
            sum.0 += fit.slope_at_start;
            sum.1 += 1;
        }
        if let Some(sum) = sums.get_mut(fit.index + 1) {
            sum.0 += fit.slope_at_end;
            sum.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
        .collect()
}

/// Control rows with their slopes written into row field `slope_field`, ready
/// for Hermite interpolation. Shorter rows are padded with "0" up to that
/// field; tokens after it are kept.
pub fn with_slopes(
    control: &[ControlPoint],
    slopes: &[Option<f64>],
    grid: &TickGrid,
    slope_field: usize,
) -> Vec<String> {
    let index = slope_field.saturating_sub(2);
    control
        .iter()
        .zip(slopes)
        .map(|(point, slope)| {
            let mut fields: Vec<String> = point.aux.iter().map(str::to_string).collect();
            if fields.len() < index {
                fields.resize(index, "0".to_string());
            }
            let slope = slope.map(|s| format!("{s:.10}")).unwrap_or_default();
            match fields.get_mut(index) {
                Some(field) => *field = slope,
                None => fields.push(slope),
            }
            format_row(
                &Sample {
                    tick: point.tick,
                    value: point.value,
                },
                &AuxFields(fields),
                grid,
            )
        })
        .collect()
}

fn read_points(path: &Path, grid: &TickGrid) -> anyhow::Result<Vec<ControlPoint>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    Ok(parse_rows(text.lines(), grid, None)
        .with_context(|| format!("while parsing {}", path.display()))?)
}

/// Reads both files and fits every segment.
pub fn find_slopes_in_files(
    control_path: &Path,
    interpolated_path: &Path,
    grid: &TickGrid,
) -> anyhow::Result<(Vec<ControlPoint>, Vec<SegmentFit>)> {
    let control = read_points(control_path, grid)?;
    let interpolated = read_points(interpolated_path, grid)?;
    let fits = find_slopes(&control, &interpolated)?;
    Ok((control, fits))
}
