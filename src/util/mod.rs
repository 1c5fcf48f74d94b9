// Copyright (c) 2024 Mike Tsao

//! Configuration for a conversion run.

/// Commonly used imports.
pub mod prelude {
    pub use super::settings::CurveSettings;
}

pub use settings::{
    CurveSettings, CurveSettingsBuilder, CurveSettingsBuilderError, DEFAULT_OUTPUT_NAME,
};

mod settings;
