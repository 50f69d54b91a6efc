//! Gaussian kernel density estimation over planar point sets, with
//! contour extraction for drawing the result.

use std::f64::consts::PI;

use nalgebra::Matrix2;

use crate::error::{Error, Result};
use crate::geometry::{linspace, Bounds, Point};

/// Default grid resolution per axis.
pub const DEFAULT_RESOLUTION: usize = 100;
/// Default kernel bandwidth factor applied to the sample covariance.
pub const DEFAULT_BANDWIDTH: f64 = 0.35;

/// Parameters of a density estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityConfig {
    /// Number of grid samples along each axis.
    pub resolution: usize,
    /// Scale factor on the sample covariance used as the kernel bandwidth.
    pub bandwidth: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            bandwidth: DEFAULT_BANDWIDTH,
        }
    }
}

/// Density values sampled over a regular grid spanning the data bounds.
///
/// Values are stored x-major: the value at `(ix, iy)` lives at
/// `ix * ny + iy`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

/// Estimates a Gaussian kernel density over `points`.
///
/// The kernel covariance is the unbiased sample covariance scaled by the
/// squared bandwidth factor. Fewer than two points, or a point cloud whose
/// covariance is singular (all samples on one line), is rejected with
/// [`Error::DegenerateInput`].
pub fn estimate_density(points: &[Point], cfg: &DensityConfig) -> Result<DensityGrid> {
    if points.len() < 2 {
        return Err(Error::DegenerateInput(format!(
            "density estimation needs at least 2 points, got {}",
            points.len()
        )));
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for p in points {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    let denom = n - 1.0;
    let bw2 = cfg.bandwidth * cfg.bandwidth;
    let cov = Matrix2::new(
        sxx / denom * bw2,
        sxy / denom * bw2,
        sxy / denom * bw2,
        syy / denom * bw2,
    );
    let det = cov.determinant();
    if !det.is_finite() || det <= 0.0 {
        return Err(Error::DegenerateInput(
            "sample covariance is singular; the points carry no planar spread".to_string(),
        ));
    }
    let inv = cov.try_inverse().ok_or_else(|| {
        Error::DegenerateInput("sample covariance could not be inverted".to_string())
    })?;

    let bounds = Bounds::from_points(points)
        .ok_or_else(|| Error::DegenerateInput("empty point set".to_string()))?;
    let res = cfg.resolution.max(2);
    let xs = linspace(bounds.min.x, bounds.max.x, res);
    let ys = linspace(bounds.min.y, bounds.max.y, res);

    let norm = 1.0 / (n * 2.0 * PI * det.sqrt());
    let mut values = vec![0.0; res * res];
    for (ix, &x) in xs.iter().enumerate() {
        for (iy, &y) in ys.iter().enumerate() {
            let mut sum = 0.0;
            for p in points {
                let dx = x - p.x;
                let dy = y - p.y;
                let q = inv[(0, 0)] * dx * dx + 2.0 * inv[(0, 1)] * dx * dy + inv[(1, 1)] * dy * dy;
                sum += (-0.5 * q).exp();
            }
            values[ix * res + iy] = sum * norm;
        }
    }
    Ok(DensityGrid { xs, ys, values })
}

impl DensityGrid {
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[ix * self.ys.len() + iy]
    }

    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// `n` contour levels spaced evenly strictly between the minimum and
    /// maximum value. Empty when the field is flat.
    pub fn spaced_levels(&self, n: usize) -> Vec<f64> {
        let lo = self.min_value();
        let hi = self.max_value();
        if n == 0 || !(hi > lo) {
            return Vec::new();
        }
        let step = (hi - lo) / (n + 1) as f64;
        (1..=n).map(|i| lo + step * i as f64).collect()
    }

    /// Normalises a level to `[0, 1]` within the value range, for colour
    /// lookups.
    pub fn normalized(&self, level: f64) -> f64 {
        let lo = self.min_value();
        let hi = self.max_value();
        if hi > lo {
            (level - lo) / (hi - lo)
        } else {
            0.0
        }
    }

    /// Raw contour segments of the field at `level`. Each grid cell is
    /// split into two triangles which contribute at most one segment each.
    pub fn contour_segments(&self, level: f64) -> Vec<(Point, Point)> {
        let mut segments = Vec::new();
        for ix in 0..self.xs.len().saturating_sub(1) {
            for iy in 0..self.ys.len().saturating_sub(1) {
                let c00 = self.corner(ix, iy);
                let c10 = self.corner(ix + 1, iy);
                let c11 = self.corner(ix + 1, iy + 1);
                let c01 = self.corner(ix, iy + 1);
                for tri in [[c00, c10, c11], [c00, c11, c01]] {
                    let tmin = tri[0].1.min(tri[1].1).min(tri[2].1);
                    let tmax = tri[0].1.max(tri[1].1).max(tri[2].1);
                    if level < tmin || level > tmax {
                        continue;
                    }
                    let mut pts = Vec::new();
                    for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                        if let Some(p) = intersect_edge(a, b, level) {
                            pts.push(p);
                        }
                    }
                    if pts.len() == 2 {
                        segments.push((pts[0], pts[1]));
                    }
                }
            }
        }
        segments
    }

    /// Contour polylines of the field at `level`, chained from the raw
    /// segments.
    pub fn contour_polylines(&self, level: f64) -> Vec<Vec<Point>> {
        segments_to_polylines(&self.contour_segments(level), 1e-8)
    }

    fn corner(&self, ix: usize, iy: usize) -> (Point, f64) {
        (Point::new(self.xs[ix], self.ys[iy]), self.value(ix, iy))
    }
}

fn intersect_edge(a: (Point, f64), b: (Point, f64), level: f64) -> Option<Point> {
    let da = a.1 - level;
    let db = b.1 - level;
    if da * db > 0.0 || (da - db).abs() < f64::EPSILON {
        None
    } else {
        let t = da / (da - db);
        Some(Point::new(
            a.0.x + t * (b.0.x - a.0.x),
            a.0.y + t * (b.0.y - a.0.y),
        ))
    }
}

fn points_close(a: Point, b: Point, tol: f64) -> bool {
    (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
}

fn segments_to_polylines(segs: &[(Point, Point)], tol: f64) -> Vec<Vec<Point>> {
    let mut remaining: Vec<(Point, Point)> = segs.to_vec();
    let mut out = Vec::new();
    while let Some((a, b)) = remaining.pop() {
        let mut line = vec![a, b];
        let mut extended = true;
        while extended {
            extended = false;
            let last = *line.last().unwrap();
            for i in 0..remaining.len() {
                let seg = remaining[i];
                if points_close(seg.0, last, tol) {
                    line.push(seg.1);
                    remaining.swap_remove(i);
                    extended = true;
                    break;
                } else if points_close(seg.1, last, tol) {
                    line.push(seg.0);
                    remaining.swap_remove(i);
                    extended = true;
                    break;
                }
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread_points() -> Vec<Point> {
        vec![
            Point::new(-1.0, -0.5),
            Point::new(1.0, -0.5),
            Point::new(-1.0, 0.5),
            Point::new(1.0, 0.5),
        ]
    }

    fn peak_cell(grid: &DensityGrid) -> (usize, usize) {
        let mut best = (0, 0);
        let mut best_v = f64::NEG_INFINITY;
        for ix in 0..grid.nx() {
            for iy in 0..grid.ny() {
                if grid.value(ix, iy) > best_v {
                    best_v = grid.value(ix, iy);
                    best = (ix, iy);
                }
            }
        }
        best
    }

    #[test]
    fn grid_spans_data_bounds() {
        let grid = estimate_density(&spread_points(), &DensityConfig::default()).unwrap();
        assert_eq!(grid.nx(), DEFAULT_RESOLUTION);
        assert_eq!(grid.ny(), DEFAULT_RESOLUTION);
        assert!((grid.xs()[0] + 1.0).abs() < 1e-12);
        assert!((grid.xs()[grid.nx() - 1] - 1.0).abs() < 1e-12);
        assert!((grid.ys()[0] + 0.5).abs() < 1e-12);
        assert!((grid.ys()[grid.ny() - 1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn density_is_finite_and_nonnegative() {
        let grid = estimate_density(&spread_points(), &DensityConfig::default()).unwrap();
        for ix in 0..grid.nx() {
            for iy in 0..grid.ny() {
                let v = grid.value(ix, iy);
                assert!(v.is_finite());
                assert!(v >= 0.0);
            }
        }
        assert!(grid.max_value() > 0.0);
    }

    #[test]
    fn symmetric_data_gives_symmetric_density() {
        let cfg = DensityConfig {
            resolution: 21,
            ..DensityConfig::default()
        };
        let grid = estimate_density(&spread_points(), &cfg).unwrap();
        for ix in 0..grid.nx() {
            for iy in 0..grid.ny() {
                let mirrored = grid.value(grid.nx() - 1 - ix, iy);
                assert!((grid.value(ix, iy) - mirrored).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn peak_sits_near_cluster() {
        let mut pts = vec![
            Point::new(2.0, 1.0),
            Point::new(2.1, 1.05),
            Point::new(1.9, 0.95),
            Point::new(2.05, 0.9),
        ];
        pts.push(Point::new(5.0, 4.0));
        let grid = estimate_density(&pts, &DensityConfig::default()).unwrap();
        let best = peak_cell(&grid);
        assert!((grid.xs()[best.0] - 2.0).abs() < 0.5);
        assert!((grid.ys()[best.1] - 1.0).abs() < 0.5);
    }

    #[test]
    fn tight_cluster_peaks_within_one_cell() {
        let pts = vec![
            Point::new(2.0, 1.0),
            Point::new(2.001, 1.0),
            Point::new(2.0, 1.001),
            Point::new(1.999, 0.999),
            Point::new(5.0, 4.0),
            Point::new(4.8, -1.5),
        ];
        let grid = estimate_density(&pts, &DensityConfig::default()).unwrap();
        let cell_x = grid.xs()[1] - grid.xs()[0];
        let cell_y = grid.ys()[1] - grid.ys()[0];
        // Cluster spread is an order of magnitude below one cell.
        assert!(cell_x > 0.01 && cell_y > 0.01);
        let best = peak_cell(&grid);
        assert!((grid.xs()[best.0] - 2.0).abs() <= cell_x + 1e-9);
        assert!((grid.ys()[best.1] - 1.0).abs() <= cell_y + 1e-9);
    }

    #[test]
    fn too_few_points_rejected() {
        let err = estimate_density(&[Point::new(0.0, 0.0)], &DensityConfig::default());
        assert!(matches!(err, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn collinear_points_rejected() {
        let pts = vec![
            Point::new(0.0, 1.0),
            Point::new(0.0, 2.0),
            Point::new(0.0, 3.0),
        ];
        let err = estimate_density(&pts, &DensityConfig::default());
        assert!(matches!(err, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn spaced_levels_sit_strictly_inside_range() {
        let grid = estimate_density(&spread_points(), &DensityConfig::default()).unwrap();
        let levels = grid.spaced_levels(10);
        assert_eq!(levels.len(), 10);
        let lo = grid.min_value();
        let hi = grid.max_value();
        for pair in levels.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(levels[0] > lo);
        assert!(levels[9] < hi);
        assert!((grid.normalized(levels[0]) - 1.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn contours_of_linear_field_are_straight() {
        let xs = linspace(0.0, 1.0, 5);
        let ys = linspace(0.0, 1.0, 5);
        let mut values = vec![0.0; 25];
        for (ix, &x) in xs.iter().enumerate() {
            for iy in 0..5 {
                values[ix * 5 + iy] = x;
            }
        }
        let grid = DensityGrid { xs, ys, values };
        let lines = grid.contour_polylines(0.3);
        assert!(!lines.is_empty());
        for line in &lines {
            assert!(line.len() >= 2);
            for p in line {
                assert!((p.x - 0.3).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn contours_stay_inside_grid_bounds() {
        let grid = estimate_density(&spread_points(), &DensityConfig::default()).unwrap();
        let levels = grid.spaced_levels(10);
        let mut seen = false;
        for level in levels {
            for line in grid.contour_polylines(level) {
                for p in &line {
                    assert!(p.x >= -1.0 - 1e-9 && p.x <= 1.0 + 1e-9);
                    assert!(p.y >= -0.5 - 1e-9 && p.y <= 0.5 + 1e-9);
                    seen = true;
                }
            }
        }
        assert!(seen);
    }

    #[test]
    fn flat_field_has_no_levels() {
        let grid = DensityGrid {
            xs: linspace(0.0, 1.0, 3),
            ys: linspace(0.0, 1.0, 3),
            values: vec![1.0; 9],
        };
        assert!(grid.spaced_levels(10).is_empty());
    }
}
