// Copyright (c) 2024 Mike Tsao

//! Reading and writing the chart's tab-delimited curve rows.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{AuxFields, ControlPoint};
}

pub use row::{
    format_row, parse_row, parse_rows, AuxFields, ControlPoint, AUX_SLOTS, DEFAULT_SLOPE_FIELD,
};

mod row;
