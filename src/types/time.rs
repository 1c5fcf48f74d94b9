// Copyright (c) 2024 Mike Tsao

//! Handles musical time on the chart's tick grid.

use crate::error::{CurveError, Result};
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// The number of ticks in a quarter note in the legacy curve format.
pub const BASE_TICKS_PER_QUARTER: usize = 48;

/// [Tick] is the canonical timeline coordinate: the number of ticks since the
/// first beat of the first measure.
#[derive(Synonym, Serialize, Deserialize)]
pub struct Tick(pub usize);

/// [TimeSignature] represents a music [time
/// signature](https://en.wikipedia.org/wiki/Time_signature).
///
/// The top number tells how many beats are in a measure. The bottom number
/// tells the value of a beat; if it's 4, a beat is a quarter note, and if it's
/// 8, a beat is an eighth note and gets half as many ticks.
#[derive(Clone, Copy, Debug, Derivative, Eq, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct TimeSignature {
    /// The number of beats in a measure.
    #[derivative(Default(value = "4"))]
    pub top: usize,

    /// The value of a beat. Expressed as a reciprocal; for example, if it's 4,
    /// then the beat value is 1/4 or a quarter note.
    #[derivative(Default(value = "4"))]
    pub bottom: usize,
}
impl Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.top, self.bottom))
    }
}
impl FromStr for TimeSignature {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || CurveError::UnknownMode {
            what: "time signature",
            name: s.to_string(),
        };
        let (top, bottom) = s.trim().split_once('/').ok_or_else(unknown)?;
        let top = top.trim().parse().map_err(|_| unknown())?;
        let bottom = bottom.trim().parse().map_err(|_| unknown())?;
        Self::new_with(top, bottom).map_err(|_| unknown())
    }
}
impl TimeSignature {
    /// C time = common time = 4/4
    pub const COMMON_TIME: Self = TimeSignature { top: 4, bottom: 4 };

    /// Creates a time signature, rejecting a zero top or a bottom that isn't a
    /// power of two.
    pub fn new_with(top: usize, bottom: usize) -> Result<Self> {
        if top == 0 || !bottom.is_power_of_two() {
            Err(CurveError::UnknownMode {
                what: "time signature",
                name: format!("{top}/{bottom}"),
            })
        } else {
            Ok(Self { top, bottom })
        }
    }

    /// The number of ticks in one beat, given the number of ticks in a quarter
    /// note. A beat that doesn't land on a whole number of ticks is an error.
    pub fn ticks_per_beat(&self, base_ticks_per_quarter: usize) -> Result<usize> {
        let ticks_per_whole = 4 * base_ticks_per_quarter;
        if self.bottom == 0 || ticks_per_whole % self.bottom != 0 || ticks_per_whole < self.bottom
        {
            return Err(CurveError::UnknownMode {
                what: "time signature",
                name: format!("{self} at {base_ticks_per_quarter} ticks per quarter"),
            });
        }
        Ok(ticks_per_whole / self.bottom)
    }
}

/// A position on the timeline as it's written in a chart: 1-based measure and
/// beat, plus a 0-based subtick within the beat.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MusicalPosition {
    #[allow(missing_docs)]
    pub measure: usize,
    #[allow(missing_docs)]
    pub beat: usize,
    #[allow(missing_docs)]
    pub subtick: usize,
}
impl Display for MusicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03},{:02},{:02}", self.measure, self.beat, self.subtick)
    }
}
impl FromStr for MusicalPosition {
    type Err = CurveError;

    /// Accepts `MMM,BB,TT` (padded or not), or a bracketed form such as
    /// `[MMM,BB,TT]` or `[MMM][BB][TT]`. Only syntax is checked here; range
    /// checks need a [TickGrid].
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let groups: Vec<&str> = if text.starts_with(['[', '(']) {
            if !text.ends_with([']', ')']) {
                return Err(CurveError::malformed_position(s, "unterminated bracket"));
            }
            text.split(|c: char| !c.is_ascii_digit())
                .filter(|g| !g.is_empty())
                .collect()
        } else {
            text.split(',').map(str::trim).collect()
        };
        if groups.len() != 3 {
            return Err(CurveError::malformed_position(
                s,
                format!("expected measure, beat and subtick, found {} fields", groups.len()),
            ));
        }
        let mut parsed = [0usize; 3];
        for (slot, group) in parsed.iter_mut().zip(groups) {
            if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CurveError::malformed_position(
                    s,
                    format!("\"{group}\" is not a number"),
                ));
            }
            *slot = group.parse().map_err(|_| {
                CurveError::malformed_position(s, format!("\"{group}\" is too large"))
            })?;
        }
        Ok(Self {
            measure: parsed[0],
            beat: parsed[1],
            subtick: parsed[2],
        })
    }
}

/// [TickGrid] fixes how many beats are in a measure and how many ticks are in
/// a beat. Every conversion between [MusicalPosition] and [Tick] goes through
/// one.
#[derive(Clone, Copy, Debug, Derivative, Eq, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct TickGrid {
    /// The top of the time signature.
    #[derivative(Default(value = "4"))]
    pub beats_per_measure: usize,
    /// Resolution of one beat.
    #[derivative(Default(value = "BASE_TICKS_PER_QUARTER"))]
    pub ticks_per_beat: usize,
}
impl TickGrid {
    /// Creates a grid. Both dimensions must be nonzero.
    pub fn new_with(beats_per_measure: usize, ticks_per_beat: usize) -> Result<Self> {
        if beats_per_measure == 0
            || ticks_per_beat == 0
            || beats_per_measure.checked_mul(ticks_per_beat).is_none()
        {
            return Err(CurveError::UnknownMode {
                what: "tick grid",
                name: format!("{beats_per_measure} beats of {ticks_per_beat} ticks"),
            });
        }
        Ok(Self {
            beats_per_measure,
            ticks_per_beat,
        })
    }

    /// The grid for a time signature, with the beat length derived from the
    /// number of ticks in a quarter note.
    pub fn from_time_signature(
        time_signature: &TimeSignature,
        base_ticks_per_quarter: usize,
    ) -> Result<Self> {
        Self::new_with(
            time_signature.top,
            time_signature.ticks_per_beat(base_ticks_per_quarter)?,
        )
    }

    /// The number of ticks in a measure.
    pub const fn ticks_per_measure(&self) -> usize {
        self.beats_per_measure * self.ticks_per_beat
    }

    /// Maps a position to its tick, checking that each component is in range.
    pub fn position_to_tick(&self, position: &MusicalPosition) -> Result<Tick> {
        let fail = |reason: String| CurveError::malformed_position(&position.to_string(), reason);
        if position.measure == 0 {
            return Err(fail("measures start at 1".to_string()));
        }
        if position.beat == 0 || position.beat > self.beats_per_measure {
            return Err(fail(format!(
                "beat must be between 1 and {}",
                self.beats_per_measure
            )));
        }
        if position.subtick >= self.ticks_per_beat {
            return Err(fail(format!(
                "subtick must be less than {}",
                self.ticks_per_beat
            )));
        }
        (position.measure - 1)
            .checked_mul(self.ticks_per_measure())
            .and_then(|ticks| ticks.checked_add((position.beat - 1) * self.ticks_per_beat))
            .and_then(|ticks| ticks.checked_add(position.subtick))
            .map(Tick)
            .ok_or_else(|| fail("measure is too far into the chart".to_string()))
    }

    /// Maps a tick back to the position it names. Always succeeds.
    pub const fn tick_to_position(&self, tick: Tick) -> MusicalPosition {
        let within_measure = tick.0 % self.ticks_per_measure();
        MusicalPosition {
            measure: tick.0 / self.ticks_per_measure() + 1,
            beat: within_measure / self.ticks_per_beat + 1,
            subtick: within_measure % self.ticks_per_beat,
        }
    }

    /// Shifts a tick by whole measures and beats. Either offset may be
    /// negative, but the result can't precede the start of the chart.
    pub fn offset(&self, tick: Tick, measures: i64, beats: i64) -> Result<Tick> {
        let fail = |reason: &str| {
            CurveError::malformed_position(
                &self.tick_to_position(tick).to_string(),
                format!("offset of {measures} measures and {beats} beats {reason}"),
            )
        };
        let shifted = self
            .shifted(tick, measures, beats)
            .ok_or_else(|| fail("is too large"))?;
        usize::try_from(shifted)
            .map(Tick)
            .map_err(|_| fail("moves it before the start"))
    }

    fn shifted(&self, tick: Tick, measures: i64, beats: i64) -> Option<i64> {
        let by_measures = measures.checked_mul(i64::try_from(self.ticks_per_measure()).ok()?)?;
        let by_beats = beats.checked_mul(i64::try_from(self.ticks_per_beat).ok()?)?;
        i64::try_from(tick.0)
            .ok()?
            .checked_add(by_measures)?
            .checked_add(by_beats)
    }
}

/// Maps `position` to a tick on the grid described by `beats_per_measure` and
/// `ticks_per_beat`.
pub fn position_to_tick(
    position: &MusicalPosition,
    beats_per_measure: usize,
    ticks_per_beat: usize,
) -> Result<Tick> {
    TickGrid::new_with(beats_per_measure, ticks_per_beat)?.position_to_tick(position)
}

/// The inverse of [position_to_tick()].
pub fn tick_to_position(
    tick: Tick,
    beats_per_measure: usize,
    ticks_per_beat: usize,
) -> Result<MusicalPosition> {
    Ok(TickGrid::new_with(beats_per_measure, ticks_per_beat)?.tick_to_position(tick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_signature_defaults() {
        let ts = TimeSignature::default();
        assert_eq!(ts, TimeSignature::COMMON_TIME);
        assert_eq!(ts.to_string(), "4/4");
    }

    #[test]
    fn time_signature_parses() {
        assert_eq!(
            "3/4".parse::<TimeSignature>().unwrap(),
            TimeSignature { top: 3, bottom: 4 }
        );
        assert_eq!(
            " 7 / 8 ".parse::<TimeSignature>().unwrap(),
            TimeSignature { top: 7, bottom: 8 }
        );
        for bad in ["", "4", "4/", "/4", "0/4", "4/3", "four/4", "4/4/4"] {
            assert!(
                matches!(
                    bad.parse::<TimeSignature>(),
                    Err(CurveError::UnknownMode { .. })
                ),
                "{bad} should have been rejected"
            );
        }
    }

    #[test]
    fn beat_value_sets_ticks_per_beat() {
        let ticks = |top, bottom| {
            TimeSignature::new_with(top, bottom)
                .unwrap()
                .ticks_per_beat(BASE_TICKS_PER_QUARTER)
        };
        assert_eq!(ticks(4, 4).unwrap(), 48);
        assert_eq!(ticks(6, 8).unwrap(), 24);
        assert_eq!(ticks(2, 2).unwrap(), 96);
        assert_eq!(ticks(3, 64).unwrap(), 3);
        assert!(ticks(3, 128).is_err(), "1.5 ticks per beat isn't on the grid");
    }

    #[test]
    fn positions_parse_in_every_form() {
        let expected = MusicalPosition {
            measure: 12,
            beat: 3,
            subtick: 6,
        };
        for text in [
            "012,03,06",
            "12,3,6",
            " 012,03,06 ",
            "[012,03,06]",
            "(12,3,6)",
            "[012][03][06]",
        ] {
            assert_eq!(text.parse::<MusicalPosition>().unwrap(), expected, "{text}");
        }
        for bad in ["012,03", "012,03,06,00", "a12,03,06", "012,,06", "[012,03,06", "[1][2]"] {
            assert!(
                matches!(
                    bad.parse::<MusicalPosition>(),
                    Err(CurveError::MalformedPosition { .. })
                ),
                "{bad} should have been rejected"
            );
        }
    }

    #[test]
    fn positions_display_zero_padded() {
        let p = MusicalPosition {
            measure: 2,
            beat: 1,
            subtick: 3,
        };
        assert_eq!(p.to_string(), "002,01,03");
        let p = MusicalPosition {
            measure: 1234,
            beat: 10,
            subtick: 47,
        };
        assert_eq!(p.to_string(), "1234,10,47");
    }

    #[test]
    fn position_to_tick_mainline() {
        let grid = TickGrid::default();
        let tick = |m, b, s| {
            grid.position_to_tick(&MusicalPosition {
                measure: m,
                beat: b,
                subtick: s,
            })
            .unwrap()
        };
        assert_eq!(tick(1, 1, 0), Tick(0));
        assert_eq!(tick(1, 2, 0), Tick(48));
        assert_eq!(tick(2, 1, 0), Tick(192));
        assert_eq!(tick(3, 4, 47), Tick(2 * 192 + 3 * 48 + 47));
    }

    #[test]
    fn position_to_tick_validates_ranges() {
        let grid = TickGrid::new_with(3, 24).unwrap();
        for (m, b, s) in [(0, 1, 0), (1, 0, 0), (1, 4, 0), (1, 1, 24)] {
            let p = MusicalPosition {
                measure: m,
                beat: b,
                subtick: s,
            };
            assert!(
                matches!(
                    grid.position_to_tick(&p),
                    Err(CurveError::MalformedPosition { .. })
                ),
                "{p} should have been rejected"
            );
        }
    }

    #[test]
    fn conversion_round_trips() {
        for (beats_per_measure, ticks_per_beat) in [(4, 48), (3, 48), (6, 24), (7, 12), (1, 1)] {
            let grid = TickGrid::new_with(beats_per_measure, ticks_per_beat).unwrap();
            for measure in 1..=5 {
                for beat in 1..=beats_per_measure {
                    for subtick in 0..ticks_per_beat {
                        let p = MusicalPosition {
                            measure,
                            beat,
                            subtick,
                        };
                        let tick = position_to_tick(&p, beats_per_measure, ticks_per_beat).unwrap();
                        assert_eq!(
                            tick_to_position(tick, beats_per_measure, ticks_per_beat).unwrap(),
                            p
                        );
                        assert_eq!(grid.tick_to_position(tick), p);
                    }
                }
            }
        }
    }

    #[test]
    fn tick_grid_rejects_zero_dimensions() {
        assert!(TickGrid::new_with(0, 48).is_err());
        assert!(TickGrid::new_with(4, 0).is_err());
        assert!(TickGrid::new_with(usize::MAX, 2).is_err());
    }

    #[test]
    fn offsets_move_by_measures_and_beats() {
        let grid = TickGrid::default();
        assert_eq!(grid.offset(Tick(10), 1, 2).unwrap(), Tick(10 + 192 + 96));
        assert_eq!(grid.offset(Tick(240), -1, -1).unwrap(), Tick(0));
        assert!(grid.offset(Tick(47), 0, -1).is_err());
        assert!(matches!(
            grid.offset(Tick(0), i64::MAX, 0),
            Err(CurveError::MalformedPosition { .. })
        ));
    }

    #[test]
    fn huge_measures_are_rejected() {
        let grid = TickGrid::default();
        let p: MusicalPosition = "99999999999999999,01,00".parse().unwrap();
        assert!(matches!(
            grid.position_to_tick(&p),
            Err(CurveError::MalformedPosition { .. })
        ));
        let p = MusicalPosition {
            measure: usize::MAX,
            beat: 4,
            subtick: 47,
        };
        assert!(grid.position_to_tick(&p).is_err());
    }
}
