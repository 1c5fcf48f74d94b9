// Copyright (c) 2024 Mike Tsao

use crate::chart::ControlPoint;

/// Splits points into the runs that are interpolated independently. A new run
/// starts wherever a point shares its tick with the one before it, which is
/// how charts spell an instantaneous jump. Empty input yields no segments.
pub fn split(points: &[ControlPoint]) -> Vec<&[ControlPoint]> {
    if points.is_empty() {
        return Vec::default();
    }
    let mut segments = Vec::default();
    let mut start = 0;
    for i in 1..points.len() {
        if points[i].tick == points[i - 1].tick {
            segments.push(&points[start..i]);
            start = i;
        }
    }
    segments.push(&points[start..]);
    segments
}
