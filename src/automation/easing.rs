// Copyright (c) 2024 Mike Tsao

use core::f64::consts::{FRAC_PI_2, PI};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The closed-form curve shapes that blend between a segment's two endpoints.
/// Each maps a normalized ratio in 0..=1 to an eased ratio; the eased ratio of
/// 0 is 0 and of 1 is 1, but in between it can overshoot (back, elastic).
///
/// Names are the snake_case forms used on the command line, such as
/// `ease_out_bounce`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Straight line. Also accepted as `linear`.
    #[default]
    #[strum(to_string = "sharp", serialize = "linear")]
    #[serde(rename = "sharp", alias = "linear")]
    Sharp,
    /// The legacy `ease_in`: a quarter sine, fast at first.
    #[strum(serialize = "ease_in")]
    #[serde(rename = "ease_in")]
    LegacyEaseIn,
    /// The legacy `ease_out`: a quarter cosine, slow at first.
    #[strum(serialize = "ease_out")]
    #[serde(rename = "ease_out")]
    LegacyEaseOut,
    #[allow(missing_docs)]
    EaseInSine,
    #[allow(missing_docs)]
    EaseOutSine,
    #[allow(missing_docs)]
    EaseInQuad,
    #[allow(missing_docs)]
    EaseOutQuad,
    #[allow(missing_docs)]
    EaseInCubic,
    #[allow(missing_docs)]
    EaseOutCubic,
    #[allow(missing_docs)]
    EaseInQuart,
    #[allow(missing_docs)]
    EaseOutQuart,
    #[allow(missing_docs)]
    EaseInQuint,
    #[allow(missing_docs)]
    EaseOutQuint,
    #[allow(missing_docs)]
    EaseInCirc,
    #[allow(missing_docs)]
    EaseOutCirc,
    /// Exactly 0 at the start, skipping the curve's nonzero floor.
    EaseInExpo,
    /// Exactly 1 at the end, skipping the curve's shortfall.
    EaseOutExpo,
    #[allow(missing_docs)]
    EaseInElastic,
    #[allow(missing_docs)]
    EaseOutElastic,
    /// Pulls back below the start before heading to the end.
    EaseInBack,
    /// Overshoots the end and settles back.
    EaseOutBack,
    #[allow(missing_docs)]
    EaseInBounce,
    #[allow(missing_docs)]
    EaseOutBounce,
    /// Quadratic Bezier whose control point sits on the start endpoint.
    BezierIn,
    /// Quadratic Bezier whose control point sits on the end endpoint.
    BezierOut,
}
impl Easing {
    const BACK_OVERSHOOT: f64 = 1.70158;
    const ELASTIC_PERIOD: f64 = (2.0 * PI) / 3.0;

    /// Returns the eased ratio for `t`, clamped to 0..=1 first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Sharp => t,
            Easing::LegacyEaseIn | Easing::EaseOutSine => (t * FRAC_PI_2).sin(),
            Easing::LegacyEaseOut | Easing::EaseInSine => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::EaseInQuad => t.powi(2),
            Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInCubic => t.powi(3),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInCirc => 1.0 - (1.0 - t.powi(2)).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0f64.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0f64.powf(-10.0 * t)
                }
            }
            Easing::EaseInElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2.0f64.powf(10.0 * t - 10.0))
                        * ((10.0 * t - 10.75) * Self::ELASTIC_PERIOD).sin()
                }
            }
            Easing::EaseOutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2.0f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * Self::ELASTIC_PERIOD).sin() + 1.0
                }
            }
            Easing::EaseInBack => {
                let c1 = Self::BACK_OVERSHOOT;
                (c1 + 1.0) * t.powi(3) - c1 * t.powi(2)
            }
            Easing::EaseOutBack => {
                let c1 = Self::BACK_OVERSHOOT;
                1.0 + (c1 + 1.0) * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            Easing::EaseInBounce => 1.0 - Self::bounce_out(1.0 - t),
            Easing::EaseOutBounce => Self::bounce_out(t),
            Easing::BezierIn => Self::quadratic_bezier(t, 0.0),
            Easing::BezierOut => Self::quadratic_bezier(t, 1.0),
        }
    }

    /// Blends from `start` to `end` at ratio `t`.
    pub fn interpolate(&self, start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * self.apply(t)
    }

    fn bounce_out(t: f64) -> f64 {
        const N1: f64 = 7.5625;
        const D1: f64 = 2.75;
        if t < 1.0 / D1 {
            N1 * t * t
        } else if t < 2.0 / D1 {
            let t = t - 1.5 / D1;
            N1 * t * t + 0.75
        } else if t < 2.5 / D1 {
            let t = t - 2.25 / D1;
            N1 * t * t + 0.9375
        } else {
            let t = t - 2.625 / D1;
            N1 * t * t + 0.984375
        }
    }

    // Endpoints are fixed at 0 and 1; `control` is the single control point.
    fn quadratic_bezier(t: f64, control: f64) -> f64 {
        let u = 1.0 - t;
        2.0 * u * t * control + t * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use more_asserts::{assert_gt, assert_lt};
    use strum::IntoEnumIterator;

    #[test]
    fn every_easing_hits_both_endpoints() {
        for easing in Easing::iter() {
            assert!(
                approx_eq!(f64, easing.apply(0.0), 0.0, epsilon = 1e-9),
                "{easing} starts at {}",
                easing.apply(0.0)
            );
            assert!(
                approx_eq!(f64, easing.apply(1.0), 1.0, epsilon = 1e-9),
                "{easing} ends at {}",
                easing.apply(1.0)
            );
            assert!(approx_eq!(
                f64,
                easing.interpolate(-2.0, 6.0, 1.0),
                6.0,
                epsilon = 1e-6
            ));
        }
    }

    #[test]
    fn expo_and_elastic_edges_are_exact() {
        assert_eq!(Easing::EaseInExpo.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOutExpo.apply(1.0), 1.0);
        assert_eq!(Easing::EaseInElastic.apply(0.0), 0.0);
        assert_eq!(Easing::EaseInElastic.apply(1.0), 1.0);
        assert_eq!(Easing::EaseOutElastic.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOutElastic.apply(1.0), 1.0);
    }

    #[test]
    fn midpoints_match_closed_forms() {
        assert_eq!(Easing::Sharp.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOutQuad.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInCubic.apply(0.5), 0.125);
        assert_eq!(Easing::EaseInQuint.apply(0.5), 0.03125);
        assert!(approx_eq!(
            f64,
            Easing::LegacyEaseIn.apply(0.5),
            (PI / 4.0).sin(),
            ulps = 2
        ));
        assert!(approx_eq!(
            f64,
            Easing::EaseInExpo.apply(0.5),
            2.0f64.powi(-5),
            ulps = 2
        ));
        assert!(approx_eq!(
            f64,
            Easing::EaseOutBounce.apply(0.5),
            0.765625,
            epsilon = 1e-12
        ));
    }

    #[test]
    fn legacy_names_keep_their_meaning() {
        for t in [0.1, 0.3, 0.7] {
            assert_eq!(Easing::LegacyEaseIn.apply(t), Easing::EaseOutSine.apply(t));
            assert_eq!(Easing::LegacyEaseOut.apply(t), Easing::EaseInSine.apply(t));
        }
    }

    #[test]
    fn back_and_elastic_overshoot() {
        assert_lt!(Easing::EaseInBack.apply(0.2), 0.0);
        assert_gt!(Easing::EaseOutBack.apply(0.8), 1.0);
        assert_gt!(Easing::EaseOutElastic.apply(0.2), 1.0);
    }

    #[test]
    fn bezier_directions_differ() {
        let t = 0.25;
        assert_eq!(Easing::BezierIn.apply(t), 0.0625);
        assert_eq!(Easing::BezierOut.apply(t), 0.4375);
        assert_ne!(Easing::BezierIn.apply(t), Easing::BezierOut.apply(t));
    }

    #[test]
    fn ratios_outside_the_segment_are_clamped() {
        assert_eq!(Easing::EaseInQuad.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseInQuad.apply(2.0), 1.0);
    }

    #[test]
    fn names_round_trip() {
        for easing in Easing::iter() {
            let name: &'static str = easing.into();
            assert_eq!(name.parse::<Easing>().unwrap(), easing);
            assert_eq!(easing.to_string(), name);
        }
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Sharp);
        assert_eq!(Easing::Sharp.to_string(), "sharp");
        assert_eq!("ease_in".parse::<Easing>().unwrap(), Easing::LegacyEaseIn);
        assert_eq!(
            "ease_out_bounce".parse::<Easing>().unwrap(),
            Easing::EaseOutBounce
        );
        assert!("ease_sideways".parse::<Easing>().is_err());
    }
}
