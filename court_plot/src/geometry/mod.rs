//! Basic geometric primitives shared across the crate.

use serde::{Deserialize, Serialize};

/// 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 3D point with x, y and z coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 3D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        distance3(self.start, self.end)
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point3 {
        Point3::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
            (self.start.z + self.end.z) / 2.0,
        )
    }
}

/// Computes the planar distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Computes the distance between two 3D points.
pub fn distance3(a: Point3, b: Point3) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2) + (b.z - a.z).powi(2)).sqrt()
}

/// Axis-aligned bounding rectangle of a planar point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Returns the tight bounds of `points`, or `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Returns `n` evenly spaced values from `start` to `stop` inclusive.
///
/// With `n == 1` the single value is `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_simple() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn distance3_simple() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 2.0, 2.0);
        assert!((distance3(a, b) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn line3_length_and_midpoint() {
        let l = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 2.0));
        assert!((l.length() - (8f64).sqrt()).abs() < 1e-9);
        let m = l.midpoint();
        assert!((m.x - 1.0).abs() < 1e-9);
        assert!((m.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bounds_from_points() {
        let pts = [
            Point::new(1.0, -2.0),
            Point::new(-3.0, 4.0),
            Point::new(0.5, 0.5),
        ];
        let b = Bounds::from_points(&pts).unwrap();
        assert!((b.min.x + 3.0).abs() < 1e-9);
        assert!((b.min.y + 2.0).abs() < 1e-9);
        assert!((b.max.x - 1.0).abs() < 1e-9);
        assert!((b.max.y - 4.0).abs() < 1e-9);
        assert!(b.contains(Point::new(0.0, 0.0)));
        assert!(!b.contains(Point::new(2.0, 0.0)));
    }

    #[test]
    fn bounds_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn linspace_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0] + 1.0).abs() < 1e-12);
        assert!((v[2]).abs() < 1e-12);
        assert!((v[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }
}
