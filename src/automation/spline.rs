// Copyright (c) 2024 Mike Tsao

//! Piecewise-cubic curves fitted through every point of a segment.

use crate::error::{CurveError, Result};

/// A curve that can be evaluated anywhere along its knots' axis. Outside the
/// knots, the nearest piece is extended.
pub trait Spline {
    /// The curve's value at `x`.
    fn evaluate(&self, x: f64) -> f64;
}

/// Index of the piece that covers `x`, given at least two knots.
fn piece_index(knots: &[f64], x: f64) -> usize {
    knots
        .partition_point(|k| *k <= x)
        .saturating_sub(1)
        .min(knots.len() - 2)
}

fn check_knots(mode: &str, knots: &[f64], values: &[f64]) -> Result<()> {
    debug_assert_eq!(knots.len(), values.len());
    if knots.len() < 3 {
        return Err(CurveError::InsufficientPoints {
            mode: mode.to_string(),
            required: 3,
            actual: knots.len(),
        });
    }
    if knots.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CurveError::row_format(format!(
            "{mode} knots must be strictly increasing"
        )));
    }
    Ok(())
}

/// Solves a tridiagonal system with the Thomas algorithm. `sub[0]` and
/// `sup[last]` are ignored.
fn solve_tridiagonal(sub: &[f64], diagonal: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let m = diagonal.len();
    let mut diagonal = diagonal.to_vec();
    let mut rhs = rhs.to_vec();
    for row in 1..m {
        let factor = sub[row] / diagonal[row - 1];
        diagonal[row] -= factor * sup[row - 1];
        rhs[row] -= factor * rhs[row - 1];
    }
    let mut x = vec![0.0; m];
    for row in (0..m).rev() {
        let upper = if row + 1 < m { sup[row] * x[row + 1] } else { 0.0 };
        x[row] = (rhs[row] - upper) / diagonal[row];
    }
    x
}

/// The continuity equations for the interior second derivatives: one row per
/// interior knot, as (sub, diagonal, super, rhs).
fn interior_system(h: &[f64], values: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let interior = h.len() - 1;
    let mut sub = vec![0.0; interior];
    let mut diagonal = vec![0.0; interior];
    let mut sup = vec![0.0; interior];
    let mut rhs = vec![0.0; interior];
    for row in 0..interior {
        let i = row + 1;
        sub[row] = h[i - 1];
        diagonal[row] = 2.0 * (h[i - 1] + h[i]);
        sup[row] = h[i];
        rhs[row] =
            6.0 * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);
    }
    (sub, diagonal, sup, rhs)
}

/// Piecewise cubics described by the value and second derivative at each knot.
#[derive(Clone, Debug)]
struct SecondDerivativeForm {
    knots: Vec<f64>,
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
}
impl SecondDerivativeForm {
    fn evaluate(&self, x: f64) -> f64 {
        let i = piece_index(&self.knots, x);
        let (x0, x1) = (self.knots[i], self.knots[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        let (m0, m1) = (self.second_derivatives[i], self.second_derivatives[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;
        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

/// A natural cubic spline: C2-continuous, with zero curvature at both ends.
#[derive(Clone, Debug)]
pub struct NaturalCubicSpline {
    form: SecondDerivativeForm,
}
impl NaturalCubicSpline {
    /// Fits the spline. Needs at least three strictly increasing knots.
    pub fn new_with(knots: &[f64], values: &[f64]) -> Result<Self> {
        check_knots("cubic_spline", knots, values)?;
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let (sub, diagonal, sup, rhs) = interior_system(&h, values);

        // The end second derivatives are pinned to zero.
        let mut second_derivatives = vec![0.0];
        second_derivatives.extend(solve_tridiagonal(&sub, &diagonal, &sup, &rhs));
        second_derivatives.push(0.0);

        Ok(Self {
            form: SecondDerivativeForm {
                knots: knots.to_vec(),
                values: values.to_vec(),
                second_derivatives,
            },
        })
    }
}
impl Spline for NaturalCubicSpline {
    fn evaluate(&self, x: f64) -> f64 {
        self.form.evaluate(x)
    }
}

/// A not-a-knot cubic spline: C2-continuous, with the third derivative also
/// continuous across the second and second-to-last knots. Four knots give the
/// single cubic through all of them; three give the parabola through them.
#[derive(Clone, Debug)]
pub struct NotAKnotSpline {
    form: SecondDerivativeForm,
}
impl NotAKnotSpline {
    /// Fits the spline. Needs at least three strictly increasing knots.
    pub fn new_with(knots: &[f64], values: &[f64]) -> Result<Self> {
        check_knots("cubic_not_a_knot", knots, values)?;
        let n = knots.len();
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

        let second_derivatives = if n == 3 {
            let curvature = 2.0
                * ((values[2] - values[1]) / h[1] - (values[1] - values[0]) / h[0])
                / (h[0] + h[1]);
            vec![curvature; 3]
        } else {
            let (mut sub, mut diagonal, mut sup, rhs) = interior_system(&h, values);
            let last = diagonal.len() - 1;

            // M0 = ((h0 + h1) M1 - h0 M2) / h1, folded into the first row.
            let (h0, h1) = (h[0], h[1]);
            diagonal[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
            sup[0] = (h1 * h1 - h0 * h0) / h1;

            // The mirror image at the far end.
            let (a, b) = (h[n - 3], h[n - 2]);
            sub[last] = (a * a - b * b) / a;
            diagonal[last] = (a + b) * (2.0 * a + b) / a;

            let interior = solve_tridiagonal(&sub, &diagonal, &sup, &rhs);
            let mut m = Vec::with_capacity(n);
            m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
            m.extend_from_slice(&interior);
            m.push(((a + b) * interior[last] - b * interior[last - 1]) / a);
            m
        };

        Ok(Self {
            form: SecondDerivativeForm {
                knots: knots.to_vec(),
                values: values.to_vec(),
                second_derivatives,
            },
        })
    }
}
impl Spline for NotAKnotSpline {
    fn evaluate(&self, x: f64) -> f64 {
        self.form.evaluate(x)
    }
}

/// A cubic Hermite spline: each piece matches the values and the given slopes
/// at both of its knots.
#[derive(Clone, Debug)]
pub struct CubicHermiteSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    slopes: Vec<f64>,
}
impl CubicHermiteSpline {
    /// Builds the spline. Needs at least three strictly increasing knots, each
    /// with a slope.
    pub fn new_with(knots: &[f64], values: &[f64], slopes: &[f64]) -> Result<Self> {
        check_knots("cubic_hermite", knots, values)?;
        debug_assert_eq!(knots.len(), slopes.len());
        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            slopes: slopes.to_vec(),
        })
    }
}
impl Spline for CubicHermiteSpline {
    fn evaluate(&self, x: f64) -> f64 {
        let i = piece_index(&self.knots, x);
        let h = self.knots[i + 1] - self.knots[i];
        let t = (x - self.knots[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.values[i]
            + h10 * h * self.slopes[i]
            + h01 * self.values[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}
