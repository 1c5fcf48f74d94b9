// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs)]
#![warn(unused_imports, unused_variables)]

//! Voxcurve regenerates the dense laser and knob curves of tick-addressed
//! rhythm-game charts.
//!
//! A curve file lists sparse control points, one tab-delimited row each: a
//! `measure,beat,subtick` position, a value, and some opaque auxiliary fields.
//! Voxcurve fills in the points between them and writes the rows back out in
//! the same format.
//!
//! * *Easiest*: call [interpolate_in_place()] or
//! [interpolate_to_named_output()] with a [CurveSettings].
//! * *Without touching files*: feed lines to
//! [interpolate_lines()](converter::interpolate_lines).
//! * *Piece by piece*: parse rows with [chart::parse_rows()], break them up
//! with [automation::split()], sample each segment with a
//! [Sampler](automation::Sampler), and annotate the samples with an
//! [AuxPolicy](automation::AuxPolicy).

/// A collection of imports that are useful to users of this crate. `use
/// voxcurve::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        automation::prelude::*, chart::prelude::*, error::CurveError, types::prelude::*,
        util::prelude::*,
    };
}

pub use {
    converter::{interpolate_in_place, interpolate_to_named_output},
    error::CurveError,
    util::CurveSettings,
};

pub mod automation;
pub mod chart;
pub mod converter;
pub mod error;
pub mod types;
pub mod util;
