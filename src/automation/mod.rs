// Copyright (c) 2024 Mike Tsao

//! Turns sparse control points into dense automation curves.
//!
//! A chart author places a handful of [ControlPoint](crate::chart::ControlPoint)s
//! along a laser or knob lane. The [Sampler] fills in the space between them
//! on a fixed tick step, following an [Interpolation] mode:
//!
//! * An [Easing] blends a segment's two endpoints along a closed-form shape.
//! * [Interpolation::CubicSpline] fits a natural cubic spline through every
//!   point of the segment, and [Interpolation::CubicNotAKnot] a not-a-knot
//!   one.
//! * [Interpolation::CubicHermite] fits a cubic Hermite spline that honors
//!   each point's slope.
//!
//! Points that share a tick mark an instantaneous jump. [split()] breaks the
//! curve there so nothing is smoothed across it, and [AuxPolicy] decides which
//! source row's auxiliary fields each output sample inherits.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{AuxPolicy, Easing, Interpolation, Sample, Sampler, StepPolicy};
}

pub use easing::Easing;
pub use propagate::{following_point, positional, AnnotatedSample, AuxPolicy, INTERIOR_FLAG};
pub use sampler::{sample_ticks, Interpolation, Sample, Sampler, StepPolicy};
pub use segment::split;
pub use spline::{CubicHermiteSpline, NaturalCubicSpline, NotAKnotSpline, Spline};

mod easing;
mod propagate;
mod sampler;
mod segment;
mod spline;
