//! Regulation court geometry in metres, centred on the net.
//!
//! The x axis runs along the length of the court with the net at `x = 0`,
//! the y axis along the net, and z is height above the floor.

use serde::{Deserialize, Serialize};

use crate::geometry::{Line3, Point3};

/// Court and scene dimensions. Defaults follow the regulation values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtDimensions {
    /// Baseline-to-baseline length.
    pub length: f64,
    /// Width of the doubles court.
    pub doubles_width: f64,
    /// Width of the singles court.
    pub singles_width: f64,
    /// Distance from the net to each service line.
    pub service_box_length: f64,
    /// Net height at the posts.
    pub net_post_height: f64,
    /// Net height at the centre strap.
    pub net_center_height: f64,
    /// Extra net width beyond the doubles court.
    pub net_overhang: f64,
    /// Length of the centre mark on each baseline.
    pub center_mark_length: f64,
    /// Scene half-extent along x.
    pub bound_x: f64,
    /// Scene half-extent along y.
    pub bound_y: f64,
    /// Scene extent along z, starting at the floor.
    pub bound_z: f64,
}

impl Default for CourtDimensions {
    fn default() -> Self {
        Self {
            length: 23.77,
            doubles_width: 10.973,
            singles_width: 8.23,
            service_box_length: 6.4,
            net_post_height: 1.07,
            net_center_height: 0.91,
            net_overhang: 0.5,
            center_mark_length: 0.2,
            bound_x: 15.0,
            bound_y: 8.0,
            bound_z: 5.0,
        }
    }
}

impl CourtDimensions {
    /// Net width from post to post.
    pub fn net_width(&self) -> f64 {
        self.doubles_width + self.net_overhang
    }
}

/// Role of a painted court line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    DoublesSideline,
    SinglesSideline,
    Baseline,
    ServiceLine,
    CenterServiceLine,
    CenterMark,
}

/// A painted line with its role on the court.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtLine {
    pub role: LineRole,
    pub line: Line3,
}

/// Net structure: the two posts, the sagging top cord and the mesh outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetGeometry {
    pub post_left: Line3,
    pub post_right: Line3,
    /// Top cord from post to post, dipping at the centre strap.
    pub cord: [Point3; 3],
    /// Closed outline of the net face.
    pub mesh: [Point3; 5],
}

/// Complete court model ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtModel {
    pub dims: CourtDimensions,
    pub lines: Vec<CourtLine>,
    pub net: NetGeometry,
    /// Floor rectangle spanning the scene bounds at `z = 0`.
    pub floor: [Point3; 4],
}

impl CourtModel {
    /// Builds the full line work and net for the given dimensions.
    pub fn build(dims: &CourtDimensions) -> Self {
        let hl = dims.length / 2.0;
        let hd = dims.doubles_width / 2.0;
        let hs = dims.singles_width / 2.0;
        let sx = dims.service_box_length;
        let mark = dims.center_mark_length;

        let flat = |x0: f64, y0: f64, x1: f64, y1: f64| {
            Line3::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0))
        };

        let lines = vec![
            CourtLine {
                role: LineRole::DoublesSideline,
                line: flat(-hl, -hd, hl, -hd),
            },
            CourtLine {
                role: LineRole::DoublesSideline,
                line: flat(-hl, hd, hl, hd),
            },
            CourtLine {
                role: LineRole::SinglesSideline,
                line: flat(-hl, -hs, hl, -hs),
            },
            CourtLine {
                role: LineRole::SinglesSideline,
                line: flat(-hl, hs, hl, hs),
            },
            CourtLine {
                role: LineRole::Baseline,
                line: flat(-hl, -hd, -hl, hd),
            },
            CourtLine {
                role: LineRole::Baseline,
                line: flat(hl, -hd, hl, hd),
            },
            CourtLine {
                role: LineRole::ServiceLine,
                line: flat(-sx, -hs, -sx, hs),
            },
            CourtLine {
                role: LineRole::ServiceLine,
                line: flat(sx, -hs, sx, hs),
            },
            CourtLine {
                role: LineRole::CenterServiceLine,
                line: flat(-sx, 0.0, sx, 0.0),
            },
            CourtLine {
                role: LineRole::CenterMark,
                line: flat(hl, 0.0, hl - mark, 0.0),
            },
            CourtLine {
                role: LineRole::CenterMark,
                line: flat(-hl, 0.0, -hl + mark, 0.0),
            },
        ];

        let hw = dims.net_width() / 2.0;
        let hp = dims.net_post_height;
        let hc = dims.net_center_height;
        let net = NetGeometry {
            post_left: Line3::new(Point3::new(0.0, -hw, 0.0), Point3::new(0.0, -hw, hp)),
            post_right: Line3::new(Point3::new(0.0, hw, 0.0), Point3::new(0.0, hw, hp)),
            cord: [
                Point3::new(0.0, -hw, hp),
                Point3::new(0.0, 0.0, hc),
                Point3::new(0.0, hw, hp),
            ],
            mesh: [
                Point3::new(0.0, -hw, hp),
                Point3::new(0.0, 0.0, hc),
                Point3::new(0.0, hw, hp),
                Point3::new(0.0, hw, 0.0),
                Point3::new(0.0, -hw, 0.0),
            ],
        };

        let bx = dims.bound_x;
        let by = dims.bound_y;
        let floor = [
            Point3::new(-bx, -by, 0.0),
            Point3::new(bx, -by, 0.0),
            Point3::new(bx, by, 0.0),
            Point3::new(-bx, by, 0.0),
        ];

        Self {
            dims: *dims,
            lines,
            net,
            floor,
        }
    }

    /// Axis ranges of the scene as `(x, y, z)` pairs.
    pub fn axis_bounds(&self) -> ((f64, f64), (f64, f64), (f64, f64)) {
        (
            (-self.dims.bound_x, self.dims.bound_x),
            (-self.dims.bound_y, self.dims.bound_y),
            (0.0, self.dims.bound_z),
        )
    }

    /// Box aspect proportional to the axis extents, so a metre measures the
    /// same along every axis.
    pub fn box_aspect(&self) -> (f64, f64, f64) {
        (
            2.0 * self.dims.bound_x,
            2.0 * self.dims.bound_y,
            self.dims.bound_z,
        )
    }

    /// All painted lines with the given role.
    pub fn lines_with_role(&self, role: LineRole) -> Vec<&CourtLine> {
        self.lines.iter().filter(|l| l.role == role).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regulation_line_counts() {
        let model = CourtModel::build(&CourtDimensions::default());
        assert_eq!(model.lines.len(), 11);
        assert_eq!(model.lines_with_role(LineRole::DoublesSideline).len(), 2);
        assert_eq!(model.lines_with_role(LineRole::SinglesSideline).len(), 2);
        assert_eq!(model.lines_with_role(LineRole::Baseline).len(), 2);
        assert_eq!(model.lines_with_role(LineRole::ServiceLine).len(), 2);
        assert_eq!(model.lines_with_role(LineRole::CenterServiceLine).len(), 1);
        assert_eq!(model.lines_with_role(LineRole::CenterMark).len(), 2);
    }

    #[test]
    fn court_is_symmetric_about_net() {
        let model = CourtModel::build(&CourtDimensions::default());
        for role in [LineRole::Baseline, LineRole::ServiceLine] {
            let xs: Vec<f64> = model
                .lines_with_role(role)
                .iter()
                .map(|l| l.line.start.x)
                .collect();
            assert_eq!(xs.len(), 2);
            assert!((xs[0] + xs[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn singles_court_sits_inside_doubles() {
        let dims = CourtDimensions::default();
        let model = CourtModel::build(&dims);
        let singles = model.lines_with_role(LineRole::SinglesSideline);
        let doubles = model.lines_with_role(LineRole::DoublesSideline);
        let max_singles = singles
            .iter()
            .map(|l| l.line.start.y.abs())
            .fold(0.0, f64::max);
        let max_doubles = doubles
            .iter()
            .map(|l| l.line.start.y.abs())
            .fold(0.0, f64::max);
        assert!(max_singles < max_doubles);
        assert!((max_doubles - dims.doubles_width / 2.0).abs() < 1e-9);
        let extra = dims.doubles_width - dims.singles_width;
        assert!((2.0 * (max_doubles - max_singles) - extra).abs() < 1e-9);
    }

    #[test]
    fn service_lines_between_net_and_baseline() {
        let dims = CourtDimensions::default();
        let model = CourtModel::build(&dims);
        for l in model.lines_with_role(LineRole::ServiceLine) {
            let x = l.line.start.x.abs();
            assert!((x - dims.service_box_length).abs() < 1e-9);
            assert!(x > 0.0 && x < dims.length / 2.0);
        }
    }

    #[test]
    fn center_marks_point_inward() {
        let dims = CourtDimensions::default();
        let model = CourtModel::build(&dims);
        for l in model.lines_with_role(LineRole::CenterMark) {
            assert!((l.line.length() - dims.center_mark_length).abs() < 1e-9);
            assert!(l.line.end.x.abs() < l.line.start.x.abs());
        }
    }

    #[test]
    fn net_dips_at_center() {
        let model = CourtModel::build(&CourtDimensions::default());
        let net = &model.net;
        assert!(net.cord[1].z < net.cord[0].z);
        assert!((net.cord[0].z - net.post_left.end.z).abs() < 1e-9);
        assert!((net.cord[1].y).abs() < 1e-9);
    }

    #[test]
    fn net_extends_beyond_doubles_court() {
        let dims = CourtDimensions::default();
        let model = CourtModel::build(&dims);
        let hw = dims.net_width() / 2.0;
        assert!(hw > dims.doubles_width / 2.0);
        assert!((model.net.post_left.start.y + hw).abs() < 1e-9);
        assert!((model.net.post_right.start.y - hw).abs() < 1e-9);
    }

    #[test]
    fn all_line_work_is_flat() {
        let model = CourtModel::build(&CourtDimensions::default());
        for l in &model.lines {
            assert_eq!(l.line.start.z, 0.0);
            assert_eq!(l.line.end.z, 0.0);
        }
        for p in &model.floor {
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn aspect_matches_axis_extents() {
        let model = CourtModel::build(&CourtDimensions::default());
        let (ax, ay, az) = model.box_aspect();
        let (bx, by, bz) = model.axis_bounds();
        assert!((ax - (bx.1 - bx.0)).abs() < 1e-9);
        assert!((ay - (by.1 - by.0)).abs() < 1e-9);
        assert!((az - (bz.1 - bz.0)).abs() < 1e-9);
    }

    #[test]
    fn custom_dimensions_flow_through() {
        let dims = CourtDimensions {
            length: 20.0,
            doubles_width: 10.0,
            singles_width: 8.0,
            ..CourtDimensions::default()
        };
        let model = CourtModel::build(&dims);
        for l in model.lines_with_role(LineRole::Baseline) {
            assert!((l.line.start.x.abs() - 10.0).abs() < 1e-9);
            assert!((l.line.length() - 10.0).abs() < 1e-9);
        }
    }
}
