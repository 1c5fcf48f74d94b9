// Copyright (c) 2024 Mike Tsao

//! One tab-delimited chart row: a position, a value, and the auxiliary tokens
//! that ride along with it.

use crate::{
    automation::Sample,
    error::{CurveError, Result},
    types::{MusicalPosition, Tick, TickGrid},
};
use serde::{Deserialize, Serialize};

/// The number of auxiliary fields a laser row usually carries after its value.
pub const AUX_SLOTS: usize = 6;

/// The field Hermite slopes are read from unless configured otherwise: the
/// first one past the usual auxiliary slots.
pub const DEFAULT_SLOPE_FIELD: usize = 2 + AUX_SLOTS;

/// The opaque tokens that follow a row's value. They're passed through
/// verbatim, except for the flag in field 0 of interpolated rows.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuxFields(pub Vec<String>);
impl AuxFields {
    /// The tokens, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the row had nothing after its value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy with field 0 replaced by `flag`. Empty fields stay empty.
    pub fn with_flag(&self, flag: &str) -> Self {
        let mut fields = self.0.clone();
        if let Some(first) = fields.first_mut() {
            *first = flag.to_string();
        }
        Self(fields)
    }
}
impl<S: Into<String>> FromIterator<S> for AuxFields {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A sparse point on the curve as the chart author wrote it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Where the point is.
    pub tick: Tick,
    /// The curve's value there.
    pub value: f64,
    /// dy/dx at this point on the segment's normalized axis. Only Hermite
    /// interpolation uses it. When it's read from a row, its field stays in
    /// [ControlPoint::aux] too.
    #[serde(default)]
    pub slope: Option<f64>,
    /// Every token after the value.
    #[serde(default)]
    pub aux: AuxFields,
}
impl ControlPoint {
    /// A point with no slope and no auxiliary fields.
    pub fn new_with(tick: Tick, value: f64) -> Self {
        Self {
            tick,
            value,
            slope: None,
            aux: AuxFields::default(),
        }
    }
}

fn parse_number(field: &str, what: &str) -> Result<f64> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CurveError::row_format(format!(
            "{what} \"{field}\" is not a number"
        ))),
    }
}

/// Decodes one row. The line terminator, if any, is dropped; every field after
/// the value is kept in the auxiliary fields exactly as written.
///
/// With `slope_field`, the field at that 0-based index (counting the position
/// and the value) is also read as the point's slope. A missing or blank field
/// leaves the slope unset.
pub fn parse_row(text: &str, grid: &TickGrid, slope_field: Option<usize>) -> Result<ControlPoint> {
    let text = text.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = text.split('\t').collect();
    if fields.len() < 2 {
        return Err(CurveError::row_format(format!(
            "expected a position and a value, found {} field(s)",
            fields.len()
        )));
    }

    let position: MusicalPosition = fields[0].parse()?;
    let tick = grid.position_to_tick(&position).map_err(|e| match e {
        CurveError::MalformedPosition { reason, .. } => {
            CurveError::malformed_position(fields[0], reason)
        }
        other => other,
    })?;
    let value = parse_number(fields[1], "value")?;
    let slope = match slope_field.and_then(|index| fields.get(index)) {
        Some(field) if !field.trim().is_empty() => Some(parse_number(field, "slope")?),
        _ => None,
    };
    let aux = fields.iter().skip(2).copied().collect();

    Ok(ControlPoint {
        tick,
        value,
        slope,
        aux,
    })
}

/// Decodes every non-blank line with [parse_row()], in order. Errors name the
/// 1-based line they came from. The points must not go backward in time.
pub fn parse_rows<I, S>(
    lines: I,
    grid: &TickGrid,
    slope_field: Option<usize>,
) -> Result<Vec<ControlPoint>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut points: Vec<ControlPoint> = Vec::new();
    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let point = parse_row(line, grid, slope_field).map_err(|e| e.at_line(index + 1))?;
        if let Some(previous) = points.last() {
            if point.tick < previous.tick {
                return Err(CurveError::RowFormat {
                    line: index + 1,
                    reason: format!(
                        "{} comes before the previous row at {}",
                        grid.tick_to_position(point.tick),
                        grid.tick_to_position(previous.tick)
                    ),
                });
            }
        }
        points.push(point);
    }
    Ok(points)
}

/// Encodes a sample as a row: zero-padded position, the value with exactly six
/// fractional digits, and the auxiliary fields, ending in a newline.
pub fn format_row(sample: &Sample, aux: &AuxFields, grid: &TickGrid) -> String {
    let mut row = format!("{}\t{:.6}", grid.tick_to_position(sample.tick), sample.value);
    for field in aux.iter() {
        row.push('\t');
        row.push_str(field);
    }
    row.push('\n');
    row
}
