//! Scene composition: the court, density overlays, bounce markers, ball
//! arcs and text labels drawn onto a canvas in submission order.

use log::debug;

use crate::court::CourtModel;
use crate::density::DensityGrid;
use crate::geometry::{linspace, Point, Point3};
use crate::render::Canvas3;
use crate::styles::{ColorRamp, LineStyle, PolyStyle, Rgba};
use crate::text::{GlyphFont, TextPlacement};
use crate::trajectory::BounceArc;

/// Colours and stroke widths used for the court itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CourtStyle {
    pub floor: Rgba,
    pub line: Rgba,
    pub line_width: f32,
    pub post: Rgba,
    pub post_width: f32,
    pub cord: Rgba,
    pub cord_width: f32,
    pub mesh_fill: Rgba,
    pub mesh_edge: Rgba,
    pub mesh_edge_width: f32,
}

impl Default for CourtStyle {
    fn default() -> Self {
        Self {
            floor: Rgba::new(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0, 1.0),
            line: Rgba::WHITE,
            line_width: 1.5,
            post: Rgba::BLACK,
            post_width: 3.0,
            cord: Rgba::new(1.0, 1.0, 240.0 / 255.0, 1.0),
            cord_width: 3.0,
            mesh_fill: Rgba::TRANSPARENT,
            mesh_edge: Rgba::new(0.862, 0.862, 0.862, 0.25),
            mesh_edge_width: 0.2,
        }
    }
}

impl CourtStyle {
    pub fn with_floor(mut self, floor: Rgba) -> Self {
        self.floor = floor;
        self
    }
}

/// Draws the court: axis setup, floor, painted lines and the net.
///
/// The floor goes down first so everything else paints over it.
pub fn draw_court(canvas: &mut dyn Canvas3, model: &CourtModel, style: &CourtStyle) {
    let (bx, by, bz) = model.axis_bounds();
    canvas.set_axis_bounds(bx, by, bz);
    canvas.set_box_aspect(model.box_aspect());

    canvas.draw_polygon(
        &model.floor,
        &PolyStyle::new(style.floor, style.floor, 0.0),
    );

    let line_style = LineStyle::solid(style.line, style.line_width);
    for court_line in &model.lines {
        canvas.draw_polyline(
            &[court_line.line.start, court_line.line.end],
            &line_style,
        );
    }

    canvas.draw_polygon(
        &model.net.mesh,
        &PolyStyle::new(style.mesh_fill, style.mesh_edge, style.mesh_edge_width),
    );
    let post_style = LineStyle::solid(style.post, style.post_width);
    canvas.draw_polyline(
        &[model.net.post_left.start, model.net.post_left.end],
        &post_style,
    );
    canvas.draw_polyline(
        &[model.net.post_right.start, model.net.post_right.end],
        &post_style,
    );
    canvas.draw_polyline(
        &model.net.cord,
        &LineStyle::solid(style.cord, style.cord_width),
    );
    debug!("court drawn with {} painted lines", model.lines.len());
}

/// Projects `text` through `font` and draws it.
pub fn draw_label(
    canvas: &mut dyn Canvas3,
    font: &GlyphFont,
    text: &str,
    placement: &TextPlacement,
) {
    let patch = font.project(text, placement);
    canvas.draw_patch(&patch);
}

/// Draws density contours flat on the floor, coloured through `ramp` by
/// each level's position in the value range.
pub fn draw_density_overlay(
    canvas: &mut dyn Canvas3,
    grid: &DensityGrid,
    n_levels: usize,
    ramp: &ColorRamp,
    line_width: f32,
) {
    let levels = grid.spaced_levels(n_levels);
    debug!("density overlay with {} levels", levels.len());
    for level in levels {
        let color = ramp.sample(grid.normalized(level));
        let style = LineStyle::solid(color, line_width);
        for line in grid.contour_polylines(level) {
            let pts: Vec<Point3> = line.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
            canvas.draw_polyline(&pts, &style);
        }
    }
}

/// Draws planar points as markers on the floor.
pub fn draw_floor_markers(canvas: &mut dyn Canvas3, points: &[Point], style: &LineStyle) {
    let pts: Vec<Point3> = points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
    canvas.draw_polyline(&pts, style);
}

/// Draws a fitted serve trajectory, both arcs as one run of points.
pub fn draw_bounce_arc(canvas: &mut dyn Canvas3, arc: &BounceArc, style: &LineStyle) {
    canvas.draw_polyline(&arc.polyline(), style);
}

/// Draws a marker key on the floor: `count` markers in a straight run
/// along y at the given x.
pub fn draw_marker_key(
    canvas: &mut dyn Canvas3,
    x: f64,
    y_range: (f64, f64),
    count: usize,
    style: &LineStyle,
) {
    let pts: Vec<Point3> = linspace(y_range.0, y_range.1, count)
        .into_iter()
        .map(|y| Point3::new(x, y, 0.0))
        .collect();
    canvas.draw_polyline(&pts, style);
}
