//! Parametric curve fitting through sparse ball-flight samples.
//!
//! A fitted curve interpolates every input sample exactly: the samples
//! are assigned normalised chord-length parameters and a polynomial
//! curve of degree `n - 1` is solved through them.

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::geometry::{distance3, linspace, Point3};

/// Default number of points when resampling a fitted curve.
pub const DEFAULT_SAMPLES: usize = 100;
/// Default index of the bounce sample within a tracking sequence.
pub const DEFAULT_BOUNCE_INDEX: usize = 2;

/// Curve evaluated at evenly spaced parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    pub points: Vec<Point3>,
}

/// Polynomial curve through a set of 3D samples, parametrised by
/// normalised chord length in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    control: Vec<Point3>,
    params: Vec<f64>,
}

impl FittedCurve {
    /// Fits an interpolating curve through `samples`.
    ///
    /// Fails with [`Error::InsufficientPoints`] for fewer than two samples
    /// and with [`Error::DegenerateInput`] when adjacent samples coincide,
    /// which would collapse the chord parametrisation.
    pub fn fit(samples: &[Point3]) -> Result<Self> {
        if samples.len() < 2 {
            return Err(Error::InsufficientPoints(samples.len()));
        }
        let mut params = vec![0.0];
        let mut total = 0.0;
        for pair in samples.windows(2) {
            let d = distance3(pair[0], pair[1]);
            if d <= 0.0 {
                return Err(Error::DegenerateInput(
                    "coincident adjacent samples".to_string(),
                ));
            }
            total += d;
            params.push(total);
        }
        for u in &mut params {
            *u /= total;
        }

        let n = samples.len();
        let degree = n - 1;
        let a = DMatrix::from_fn(n, n, |r, c| bernstein(degree, c, params[r]));
        let rhs = DMatrix::from_fn(n, 3, |r, c| match c {
            0 => samples[r].x,
            1 => samples[r].y,
            _ => samples[r].z,
        });
        let sol = a.lu().solve(&rhs).ok_or_else(|| {
            Error::DegenerateInput("curve collocation matrix is singular".to_string())
        })?;
        let control = (0..n)
            .map(|i| Point3::new(sol[(i, 0)], sol[(i, 1)], sol[(i, 2)]))
            .collect();
        Ok(Self { control, params })
    }

    /// Point on the curve at parameter `u`, clamped to `[0, 1]`.
    pub fn point_at(&self, u: f64) -> Point3 {
        let u = u.clamp(0.0, 1.0);
        let mut pts = self.control.clone();
        let mut m = pts.len();
        while m > 1 {
            for i in 0..m - 1 {
                pts[i] = lerp(pts[i], pts[i + 1], u);
            }
            m -= 1;
        }
        pts[0]
    }

    /// Chord-length parameter assigned to each input sample.
    pub fn parameters(&self) -> &[f64] {
        &self.params
    }

    /// Evaluates the curve at exactly `npoints` evenly spaced parameters.
    ///
    /// Counts of 0 and 1 follow [`linspace`]: an empty curve and the
    /// start point respectively.
    pub fn resample(&self, npoints: usize) -> SampledCurve {
        let points = linspace(0.0, 1.0, npoints)
            .into_iter()
            .map(|u| self.point_at(u))
            .collect();
        SampledCurve { points }
    }
}

/// Fits a curve through `samples` and resamples it in one step.
pub fn fit_curve(samples: &[Point3], npoints: usize) -> Result<SampledCurve> {
    Ok(FittedCurve::fit(samples)?.resample(npoints))
}

/// A serve trajectory split at the bounce: a descending arc into the
/// bounce sample and an ascending arc out of it. Both arcs share the
/// bounce sample, so the junction is continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct BounceArc {
    pub descent: SampledCurve,
    pub ascent: SampledCurve,
}

impl BounceArc {
    /// Fits both arcs of a tracked serve. `bounce_index` selects the sample
    /// where the ball meets the court; it must leave at least two samples
    /// on each side (the bounce sample belongs to both).
    pub fn fit(samples: &[Point3], bounce_index: usize, npoints: usize) -> Result<Self> {
        if bounce_index < 1 {
            return Err(Error::InsufficientPoints(bounce_index + 1));
        }
        if samples.len() < bounce_index + 2 {
            return Err(Error::InsufficientPoints(
                samples.len().saturating_sub(bounce_index),
            ));
        }
        let descent = fit_curve(&samples[..=bounce_index], npoints)?;
        let ascent = fit_curve(&samples[bounce_index..], npoints)?;
        Ok(Self { descent, ascent })
    }

    /// Both arcs concatenated into one polyline for drawing.
    pub fn polyline(&self) -> Vec<Point3> {
        let mut pts = self.descent.points.clone();
        pts.extend_from_slice(&self.ascent.points);
        pts
    }
}

fn bernstein(degree: usize, i: usize, u: f64) -> f64 {
    binomial(degree, i) * u.powi(i as i32) * (1.0 - u).powi((degree - i) as i32)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    let mut c = 1.0;
    for i in 0..k {
        c = c * (n - i) as f64 / (i + 1) as f64;
    }
    c
}

fn lerp(a: Point3, b: Point3, t: f64) -> Point3 {
    Point3::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    )
}
