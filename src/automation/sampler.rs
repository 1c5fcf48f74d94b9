// Copyright (c) 2024 Mike Tsao

use super::{
    easing::Easing,
    spline::{CubicHermiteSpline, NaturalCubicSpline, NotAKnotSpline, Spline},
};
use crate::{
    chart::ControlPoint,
    error::{CurveError, Result},
    types::Tick,
};
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// One point of the dense output curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[allow(missing_docs)]
    pub tick: Tick,
    #[allow(missing_docs)]
    pub value: f64,
}

/// How a segment's samples are generated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interpolation {
    /// Blend the two endpoints with an [Easing].
    Eased(Easing),
    /// Natural cubic spline through every point.
    CubicSpline,
    /// Not-a-knot cubic spline through every point.
    CubicNotAKnot,
    /// Cubic Hermite spline through every point, using each point's slope.
    CubicHermite,
}
impl Default for Interpolation {
    fn default() -> Self {
        Self::Eased(Easing::default())
    }
}
impl Interpolation {
    const CUBIC_SPLINE: &'static str = "cubic_spline";
    const CUBIC_NOT_A_KNOT: &'static str = "cubic_not_a_knot";
    const CUBIC_HERMITE: &'static str = "cubic_hermite";

    /// Every mode, in the order they're listed to users.
    pub fn all() -> impl Iterator<Item = Interpolation> {
        Easing::iter()
            .map(Interpolation::Eased)
            .chain([
                Interpolation::CubicSpline,
                Interpolation::CubicNotAKnot,
                Interpolation::CubicHermite,
            ])
    }

    /// The fewest points a segment can have for this mode.
    pub const fn min_points(&self) -> usize {
        match self {
            Interpolation::Eased(_) => 2,
            Interpolation::CubicSpline
            | Interpolation::CubicNotAKnot
            | Interpolation::CubicHermite => 3,
        }
    }
}
impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Eased(easing) => write!(f, "{easing}"),
            Interpolation::CubicSpline => f.write_str(Self::CUBIC_SPLINE),
            Interpolation::CubicNotAKnot => f.write_str(Self::CUBIC_NOT_A_KNOT),
            Interpolation::CubicHermite => f.write_str(Self::CUBIC_HERMITE),
        }
    }
}
impl FromStr for Interpolation {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            Self::CUBIC_SPLINE => Ok(Interpolation::CubicSpline),
            Self::CUBIC_NOT_A_KNOT => Ok(Interpolation::CubicNotAKnot),
            Self::CUBIC_HERMITE => Ok(Interpolation::CubicHermite),
            _ => name
                .parse::<Easing>()
                .map(Interpolation::Eased)
                .map_err(|_| CurveError::UnknownMode {
                    what: "mode",
                    name: s.to_string(),
                }),
        }
    }
}
impl TryFrom<String> for Interpolation {
    type Error = CurveError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
impl From<Interpolation> for String {
    fn from(value: Interpolation) -> Self {
        value.to_string()
    }
}

/// How far apart, in ticks, consecutive samples are.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepPolicy {
    /// The same step for every segment.
    Fixed(usize),
    /// `preferred` when it divides the segment's span evenly, otherwise
    /// `fallback`.
    Fallback {
        #[allow(missing_docs)]
        preferred: usize,
        #[allow(missing_docs)]
        fallback: usize,
    },
}
impl Default for StepPolicy {
    fn default() -> Self {
        Self::SIXTY_FOURTHS
    }
}
impl StepPolicy {
    /// 64th notes at 48 ticks per quarter.
    pub const SIXTY_FOURTHS: Self = Self::Fixed(3);

    /// 24th notes at 48 ticks per quarter, or 16ths when 24ths don't fit.
    pub const TWENTY_FOURTHS: Self = Self::Fallback {
        preferred: 8,
        fallback: 12,
    };

    /// The step to use for a segment spanning `span` ticks. Never zero.
    pub fn step_for(&self, span: usize) -> usize {
        let step = match *self {
            StepPolicy::Fixed(step) => step,
            StepPolicy::Fallback {
                preferred,
                fallback,
            } => {
                if preferred != 0 && span % preferred == 0 {
                    preferred
                } else {
                    fallback
                }
            }
        };
        step.max(1)
    }
}

/// Ticks from `start` through `end` inclusive, `step` apart. If `end` isn't
/// on the step grid, it's appended so that both endpoints are always present.
pub fn sample_ticks(start: Tick, end: Tick, step: usize) -> Vec<Tick> {
    let mut ticks: Vec<Tick> = (start.0..=end.0).step_by(step.max(1)).map(Tick).collect();
    if ticks.last().is_some_and(|last| *last != end) {
        ticks.push(end);
    }
    ticks
}

/// Produces the dense samples for one segment at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sampler {
    mode: Interpolation,
    step: StepPolicy,
}
impl Sampler {
    #[allow(missing_docs)]
    pub fn new_with(mode: Interpolation, step: StepPolicy) -> Self {
        Self { mode, step }
    }

    #[allow(missing_docs)]
    pub fn mode(&self) -> Interpolation {
        self.mode
    }

    /// Samples a segment whose ticks strictly increase. Easing modes use only
    /// the first and last points; spline modes use all of them.
    pub fn sample(&self, segment: &[ControlPoint]) -> Result<Vec<Sample>> {
        let required = self.mode.min_points();
        if segment.len() < required {
            return Err(CurveError::InsufficientPoints {
                mode: self.mode.to_string(),
                required,
                actual: segment.len(),
            });
        }
        let first = &segment[0];
        let last = &segment[segment.len() - 1];
        let span = last.tick.0 - first.tick.0;
        let step = self.step.step_for(span);
        if span % step != 0 {
            log::warn!(
                "segment of {span} ticks isn't a multiple of the {step}-tick step; \
                 its last sample will be closer"
            );
        }
        let ticks = sample_ticks(first.tick, last.tick, step);
        log::debug!(
            "{} over ticks {}..={} every {step}: {} samples",
            self.mode,
            first.tick.0,
            last.tick.0,
            ticks.len()
        );

        let samples = match self.mode {
            Interpolation::Eased(easing) => ticks
                .into_iter()
                .map(|tick| {
                    let ratio = if span == 0 {
                        1.0
                    } else {
                        (tick.0 - first.tick.0) as f64 / span as f64
                    };
                    Sample {
                        tick,
                        value: easing.interpolate(first.value, last.value, ratio),
                    }
                })
                .collect(),
            Interpolation::CubicSpline => {
                let knots: Vec<f64> = segment.iter().map(|p| p.tick.0 as f64).collect();
                let values: Vec<f64> = segment.iter().map(|p| p.value).collect();
                let spline = NaturalCubicSpline::new_with(&knots, &values)?;
                Self::evaluate(&spline, ticks, |tick| tick.0 as f64)
            }
            Interpolation::CubicNotAKnot => {
                let knots: Vec<f64> = segment.iter().map(|p| p.tick.0 as f64).collect();
                let values: Vec<f64> = segment.iter().map(|p| p.value).collect();
                let spline = NotAKnotSpline::new_with(&knots, &values)?;
                Self::evaluate(&spline, ticks, |tick| tick.0 as f64)
            }
            Interpolation::CubicHermite => {
                let slopes: Vec<f64> = segment.iter().filter_map(|p| p.slope).collect();
                if slopes.len() != segment.len() {
                    return Err(CurveError::InsufficientPoints {
                        mode: format!("{} (points with slopes)", self.mode),
                        required: segment.len(),
                        actual: slopes.len(),
                    });
                }
                // Slopes are dy/dx on the segment's 0..=1 axis.
                let origin = first.tick.0 as f64;
                let width = span as f64;
                let normalize = move |tick: Tick| (tick.0 as f64 - origin) / width;
                let knots: Vec<f64> = segment.iter().map(|p| normalize(p.tick)).collect();
                let values: Vec<f64> = segment.iter().map(|p| p.value).collect();
                let spline = CubicHermiteSpline::new_with(&knots, &values, &slopes)?;
                Self::evaluate(&spline, ticks, normalize)
            }
        };
        Ok(samples)
    }

    fn evaluate(spline: &impl Spline, ticks: Vec<Tick>, x: impl Fn(Tick) -> f64) -> Vec<Sample> {
        ticks
            .into_iter()
            .map(|tick| Sample {
                tick,
                value: spline.evaluate(x(tick)),
            })
            .collect()
    }
}
