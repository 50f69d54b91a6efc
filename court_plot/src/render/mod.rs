//! Drawing surface abstraction used to compose scenes.
//!
//! Scene code talks to a [`Canvas3`] and never to a concrete backend, so
//! the same composition can be rasterised, recorded for inspection or
//! forwarded elsewhere.

pub mod pixmap;

use crate::geometry::Point3;
use crate::styles::{LineStyle, PolyStyle, Rgba};
use crate::text::TextPatch;

/// A 3D drawing surface.
///
/// Geometry arrives in scene coordinates. Colour alpha is honoured exactly
/// as given; implementations must not layer an extra opacity on top.
pub trait Canvas3 {
    /// Sets the camera elevation and azimuth, in degrees.
    fn set_view(&mut self, elev_deg: f64, azim_deg: f64);

    /// Sets the visible axis ranges.
    fn set_axis_bounds(&mut self, x: (f64, f64), y: (f64, f64), z: (f64, f64));

    /// Sets the relative lengths of the three projected axes.
    fn set_box_aspect(&mut self, aspect: (f64, f64, f64));

    fn draw_polyline(&mut self, points: &[Point3], style: &LineStyle);

    fn draw_polygon(&mut self, vertices: &[Point3], style: &PolyStyle);

    fn draw_patch(&mut self, patch: &TextPatch);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    View {
        elev_deg: f64,
        azim_deg: f64,
    },
    AxisBounds {
        x: (f64, f64),
        y: (f64, f64),
        z: (f64, f64),
    },
    BoxAspect {
        aspect: (f64, f64, f64),
    },
    Polyline {
        points: Vec<Point3>,
        style: LineStyle,
    },
    Polygon {
        vertices: Vec<Point3>,
        style: PolyStyle,
    },
    Patch {
        contours: Vec<Vec<Point3>>,
        fill: Rgba,
        edge: Rgba,
    },
}

/// Canvas that records every call instead of rasterising it.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas3 for RecordingCanvas {
    fn set_view(&mut self, elev_deg: f64, azim_deg: f64) {
        self.calls.push(DrawCall::View { elev_deg, azim_deg });
    }

    fn set_axis_bounds(&mut self, x: (f64, f64), y: (f64, f64), z: (f64, f64)) {
        self.calls.push(DrawCall::AxisBounds { x, y, z });
    }

    fn set_box_aspect(&mut self, aspect: (f64, f64, f64)) {
        self.calls.push(DrawCall::BoxAspect { aspect });
    }

    fn draw_polyline(&mut self, points: &[Point3], style: &LineStyle) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn draw_polygon(&mut self, vertices: &[Point3], style: &PolyStyle) {
        self.calls.push(DrawCall::Polygon {
            vertices: vertices.to_vec(),
            style: *style,
        });
    }

    fn draw_patch(&mut self, patch: &TextPatch) {
        self.calls.push(DrawCall::Patch {
            contours: patch.embedded_contours(),
            fill: patch.fill,
            edge: patch.edge,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::text::Axis;

    #[test]
    fn calls_keep_submission_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.set_view(20.0, 10.0);
        canvas.draw_polyline(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            &LineStyle::solid(Rgba::WHITE, 1.0),
        );
        canvas.draw_polygon(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            &PolyStyle::new(Rgba::BLACK, Rgba::BLACK, 1.0),
        );
        assert_eq!(canvas.calls.len(), 3);
        assert!(matches!(canvas.calls[0], DrawCall::View { .. }));
        assert!(matches!(canvas.calls[1], DrawCall::Polyline { .. }));
        assert!(matches!(canvas.calls[2], DrawCall::Polygon { .. }));
    }

    #[test]
    fn patch_is_recorded_in_scene_coordinates() {
        let patch = TextPatch {
            contours: vec![vec![Point::new(1.0, 2.0)]],
            axis: Axis::Y,
            depth: -4.0,
            fill: Rgba::BLACK,
            edge: Rgba::BLACK,
        };
        let mut canvas = RecordingCanvas::new();
        canvas.draw_patch(&patch);
        match &canvas.calls[0] {
            DrawCall::Patch { contours, .. } => {
                assert_eq!(contours[0][0], Point3::new(1.0, -4.0, 2.0));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
