// Copyright (c) 2024 Mike Tsao

//! Everything a conversion run needs to know besides its input file. Intended
//! to be serialized.

use crate::{
    automation::{AuxPolicy, Interpolation, StepPolicy},
    chart::DEFAULT_SLOPE_FIELD,
    error::Result,
    types::{TickGrid, TimeSignature, BASE_TICKS_PER_QUARTER},
};
use anyhow::{anyhow, Context};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The file the 24th-note converter writes next to its input.
pub const DEFAULT_OUTPUT_NAME: &str = "kshcurve.txt";

/// Contains the parameters of one curve conversion.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case", default)]
pub struct CurveSettings {
    /// How samples between control points are generated.
    pub mode: Interpolation,

    /// Supplies beats per measure and the beat value.
    pub time_signature: TimeSignature,

    /// Ticks in a quarter note. Ticks per beat is derived from this and the
    /// time signature's bottom number.
    #[derivative(Default(value = "BASE_TICKS_PER_QUARTER"))]
    pub base_ticks_per_quarter: usize,

    /// Distance between consecutive samples.
    pub step: StepPolicy,

    /// Which rows' auxiliary fields the samples inherit.
    pub aux_policy: AuxPolicy,

    /// The 0-based row field that holds each point's slope in Hermite mode.
    /// Other modes treat it as an ordinary auxiliary field.
    #[derivative(Default(value = "DEFAULT_SLOPE_FIELD"))]
    pub slope_field: usize,

    /// When set, sample values closer to zero than this are written as zero.
    pub snap_epsilon: Option<f64>,

    /// File name used by
    /// [interpolate_to_named_output()](crate::converter::interpolate_to_named_output).
    #[derivative(Default(value = "DEFAULT_OUTPUT_NAME.to_string()"))]
    #[builder(setter(into))]
    pub output_name: String,
}
impl CurveSettings {
    /// The in-place curve tool: the given mode on the 64th-note grid, with
    /// positional auxiliary fields.
    pub fn in_place(mode: Interpolation, time_signature: TimeSignature) -> Self {
        Self {
            mode,
            time_signature,
            ..Default::default()
        }
    }

    /// The 24th-note converter: not-a-knot cubic spline per segment, 8-tick
    /// steps falling back to 12, fields from the following control point, and
    /// near-zero values snapped to zero.
    pub fn ksh(time_signature: TimeSignature) -> Self {
        Self {
            mode: Interpolation::CubicNotAKnot,
            time_signature,
            step: StepPolicy::TWENTY_FOURTHS,
            aux_policy: AuxPolicy::FollowingPoint,
            snap_epsilon: Some(1e-6),
            ..Default::default()
        }
    }

    /// The tick grid these settings describe.
    pub fn grid(&self) -> Result<TickGrid> {
        TickGrid::from_time_signature(&self.time_signature, self.base_ticks_per_quarter)
    }

    /// Reads settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::default().load_onto(path)
    }

    /// Reads a JSON settings file over these settings. Keys the file names
    /// replace ours; the rest are kept.
    pub fn load_onto(&self, path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("couldn't open settings file {}", path.display()))?;
        let overrides: serde_json::Value = serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("couldn't parse settings file {}", path.display()))?;
        self.merged_with(overrides)
            .with_context(|| format!("bad settings in {}", path.display()))
    }

    /// These settings with the top-level keys of a JSON object replaced.
    pub fn merged_with(&self, overrides: serde_json::Value) -> anyhow::Result<Self> {
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(anyhow!("settings must be a JSON object"));
        };
        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// The field to read slopes from, if the mode uses them.
    pub fn slope_field_for_mode(&self) -> Option<usize> {
        (self.mode == Interpolation::CubicHermite).then_some(self.slope_field)
    }

    /// Applies the optional near-zero snap.
    pub fn snapped(&self, value: f64) -> f64 {
        match self.snap_epsilon {
            Some(epsilon) if value.abs() < epsilon => 0.0,
            _ => value,
        }
    }
}
