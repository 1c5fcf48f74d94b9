// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{MusicalPosition, Tick, TickGrid, TimeSignature};
}

pub use time::{
    position_to_tick, tick_to_position, MusicalPosition, Tick, TickGrid, TimeSignature,
    BASE_TICKS_PER_QUARTER,
};

mod time;
