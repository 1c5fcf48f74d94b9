// Copyright (c) 2024 Mike Tsao

//! Mirrors a curve (value becomes `1 - value`) and shifts it along the
//! timeline by whole measures and beats.

use anyhow::Context;
use std::path::Path;
use voxcurve::{
    types::{MusicalPosition, TickGrid},
    CurveError,
};

/// How far to move every row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Offset {
    #[allow(missing_docs)]
    pub measures: i64,
    #[allow(missing_docs)]
    pub beats: i64,
}

/// Inverts and shifts one row. Fields after the value are kept verbatim.
pub fn invert_row(line: &str, grid: &TickGrid, offset: Offset) -> Result<String, CurveError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split('\t');
    let (Some(position), Some(value)) = (fields.next(), fields.next()) else {
        return Err(CurveError::RowFormat {
            line: 0,
            reason: "expected a position and a value".to_string(),
        });
    };
    let value: f64 = value.trim().parse().map_err(|_| CurveError::RowFormat {
        line: 0,
        reason: format!("value \"{value}\" is not a number"),
    })?;
    let tick = grid.position_to_tick(&position.parse::<MusicalPosition>()?)?;
    let tick = grid.offset(tick, offset.measures, offset.beats)?;

    let mut row = format!("{}\t{:.6}", grid.tick_to_position(tick), 1.0 - value);
    for field in fields {
        row.push('\t');
        row.push_str(field);
    }
    row.push('\n');
    Ok(row)
}

/// Inverts and shifts every non-blank line.
pub fn invert_lines<I, S>(
    lines: I,
    grid: &TickGrid,
    offset: Offset,
) -> Result<Vec<String>, CurveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.as_ref().trim().is_empty())
        .map(|(index, line)| {
            invert_row(line.as_ref(), grid, offset).map_err(|e| e.at_line(index + 1))
        })
        .collect()
}

/// Rewrites `path` with every row inverted and shifted. The file is left
/// untouched if any row fails.
pub fn invert_in_place(path: &Path, grid: &TickGrid, offset: Offset) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    let rows = invert_lines(text.lines(), grid, offset)
        .with_context(|| format!("while inverting {}", path.display()))?;
    std::fs::write(path, rows.concat())
        .with_context(|| format!("couldn't write {}", path.display()))?;
    log::info!(
        "{}: {} rows inverted and moved {} measures, {} beats",
        path.display(),
        rows.len(),
        offset.measures,
        offset.beats
    );
    Ok(())
}
