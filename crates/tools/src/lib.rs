// Copyright (c) 2024 Mike Tsao

//! Chart utilities that sit beside the curve interpolator: curve inversion,
//! `.vox` format migration, and slope estimation for Hermite curves.

#![deny(missing_docs)]

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::invert::{invert_in_place, invert_lines, Offset};
    pub use super::migrate::{migrate_file, migrate_lines};
    pub use super::slopes::{control_point_slopes, find_slopes, SegmentFit};
}

pub mod invert;
pub mod migrate;
pub mod slopes;
