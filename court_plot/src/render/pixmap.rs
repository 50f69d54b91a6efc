//! Rasterising canvas backed by `tiny-skia`.
//!
//! The camera is orthographic: scene points are scaled into the aspect
//! box, rotated by elevation and azimuth and fitted to the image with a
//! uniform margin. Draw calls paint in submission order, so later geometry
//! covers earlier geometry.

use std::io;
use std::path::Path;

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::Canvas3;
use crate::error::{Error, Result};
use crate::geometry::Point3;
use crate::styles::{LineKind, LineStyle, PolyStyle, Rgba};
use crate::text::TextPatch;

/// Margin kept around the projected scene, in pixels.
const MARGIN: f32 = 24.0;

pub struct PixmapCanvas {
    pixmap: Pixmap,
    elev_deg: f64,
    azim_deg: f64,
    bounds: ((f64, f64), (f64, f64), (f64, f64)),
    aspect: (f64, f64, f64),
}

impl PixmapCanvas {
    /// Creates a canvas of the given pixel size filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::DegenerateInput("image dimensions must be non-zero".to_string())
        })?;
        let [r, g, b, a] = background.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        Ok(Self {
            pixmap,
            elev_deg: 30.0,
            azim_deg: -60.0,
            bounds: ((-1.0, 1.0), (-1.0, 1.0), (0.0, 1.0)),
            aspect: (1.0, 1.0, 1.0),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Writes the canvas to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(())
    }

    fn projection(&self) -> Projection {
        Projection::new(
            self.bounds,
            self.aspect,
            self.elev_deg,
            self.azim_deg,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
    }

    fn paint_for(color: Rgba) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color(tiny_skia::Color::from_rgba8(r, g, b, a));
        paint.anti_alias = true;
        paint
    }

    fn open_path(&self, points: &[Point3]) -> Option<tiny_skia::Path> {
        let proj = self.projection();
        let mut pb = PathBuilder::new();
        for (i, p) in points.iter().enumerate() {
            let (x, y) = proj.to_pixel(*p);
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        pb.finish()
    }

    fn closed_path(&self, rings: &[Vec<Point3>]) -> Option<tiny_skia::Path> {
        let proj = self.projection();
        let mut pb = PathBuilder::new();
        for ring in rings {
            for (i, p) in ring.iter().enumerate() {
                let (x, y) = proj.to_pixel(*p);
                if i == 0 {
                    pb.move_to(x, y);
                } else {
                    pb.line_to(x, y);
                }
            }
            if ring.len() >= 2 {
                pb.close();
            }
        }
        pb.finish()
    }
}

impl Canvas3 for PixmapCanvas {
    fn set_view(&mut self, elev_deg: f64, azim_deg: f64) {
        self.elev_deg = elev_deg;
        self.azim_deg = azim_deg;
    }

    fn set_axis_bounds(&mut self, x: (f64, f64), y: (f64, f64), z: (f64, f64)) {
        self.bounds = (x, y, z);
    }

    fn set_box_aspect(&mut self, aspect: (f64, f64, f64)) {
        self.aspect = aspect;
    }

    fn draw_polyline(&mut self, points: &[Point3], style: &LineStyle) {
        if style.kind != LineKind::MarkersOnly && points.len() >= 2 {
            if let Some(path) = self.open_path(points) {
                let paint = Self::paint_for(style.color);
                let mut stroke = Stroke {
                    width: style.width.max(0.1),
                    ..Stroke::default()
                };
                match style.kind {
                    LineKind::Dashed => stroke.dash = StrokeDash::new(vec![10.0, 10.0], 0.0),
                    LineKind::Dotted => stroke.dash = StrokeDash::new(vec![2.0, 6.0], 0.0),
                    _ => {}
                }
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        if let Some(marker) = &style.marker {
            let proj = self.projection();
            let fill = Self::paint_for(style.color);
            for p in points.iter().step_by(marker.every.max(1)) {
                let (x, y) = proj.to_pixel(*p);
                let mut pb = PathBuilder::new();
                pb.push_circle(x, y, marker.size.max(0.1));
                if let Some(circle) = pb.finish() {
                    self.pixmap.fill_path(
                        &circle,
                        &fill,
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                    if let Some(edge) = marker.edge {
                        let stroke = Stroke {
                            width: 1.0,
                            ..Stroke::default()
                        };
                        self.pixmap.stroke_path(
                            &circle,
                            &Self::paint_for(edge),
                            &stroke,
                            Transform::identity(),
                            None,
                        );
                    }
                }
            }
        }
    }

    fn draw_polygon(&mut self, vertices: &[Point3], style: &PolyStyle) {
        if vertices.len() < 3 {
            return;
        }
        let ring = [vertices.to_vec()];
        if let Some(path) = self.closed_path(&ring) {
            self.pixmap.fill_path(
                &path,
                &Self::paint_for(style.fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            if style.edge_width > 0.0 {
                let stroke = Stroke {
                    width: style.edge_width,
                    ..Stroke::default()
                };
                self.pixmap.stroke_path(
                    &path,
                    &Self::paint_for(style.edge),
                    &stroke,
                    Transform::identity(),
                    None,
                );
            }
        }
    }

    fn draw_patch(&mut self, patch: &TextPatch) {
        let rings = patch.embedded_contours();
        if let Some(path) = self.closed_path(&rings) {
            self.pixmap.fill_path(
                &path,
                &Self::paint_for(patch.fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            let stroke = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(
                &path,
                &Self::paint_for(patch.edge),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }
}

/// World-to-pixel mapping for one camera and image configuration.
struct Projection {
    right: [f64; 3],
    up: [f64; 3],
    center: [f64; 3],
    scale: [f64; 3],
    px_per_unit: f64,
    left_pad: f64,
    bottom_pad: f64,
    u_min: f64,
    v_min: f64,
    height: f64,
}

impl Projection {
    fn new(
        bounds: ((f64, f64), (f64, f64), (f64, f64)),
        aspect: (f64, f64, f64),
        elev_deg: f64,
        azim_deg: f64,
        width: f32,
        height: f32,
    ) -> Self {
        let (bx, by, bz) = bounds;
        let center = [
            (bx.0 + bx.1) / 2.0,
            (by.0 + by.1) / 2.0,
            (bz.0 + bz.1) / 2.0,
        ];
        let extent = |r: (f64, f64)| if r.1 > r.0 { r.1 - r.0 } else { 1.0 };
        let scale = [
            aspect.0 / extent(bx),
            aspect.1 / extent(by),
            aspect.2 / extent(bz),
        ];

        let az = azim_deg.to_radians();
        let el = elev_deg.to_radians();
        let right = [-az.sin(), az.cos(), 0.0];
        let up = [-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos()];

        let mut proj = Self {
            right,
            up,
            center,
            scale,
            px_per_unit: 1.0,
            left_pad: 0.0,
            bottom_pad: 0.0,
            u_min: 0.0,
            v_min: 0.0,
            height: height as f64,
        };

        let mut u_min = f64::INFINITY;
        let mut u_max = f64::NEG_INFINITY;
        let mut v_min = f64::INFINITY;
        let mut v_max = f64::NEG_INFINITY;
        for &x in &[bx.0, bx.1] {
            for &y in &[by.0, by.1] {
                for &z in &[bz.0, bz.1] {
                    let (u, v) = proj.to_camera(Point3::new(x, y, z));
                    u_min = u_min.min(u);
                    u_max = u_max.max(u);
                    v_min = v_min.min(v);
                    v_max = v_max.max(v);
                }
            }
        }
        let du = (u_max - u_min).max(1e-9);
        let dv = (v_max - v_min).max(1e-9);
        let avail_w = (width - 2.0 * MARGIN).max(1.0) as f64;
        let avail_h = (height - 2.0 * MARGIN).max(1.0) as f64;
        let s = (avail_w / du).min(avail_h / dv);
        proj.px_per_unit = s;
        proj.left_pad = (width as f64 - du * s) / 2.0;
        proj.bottom_pad = (height as f64 - dv * s) / 2.0;
        proj.u_min = u_min;
        proj.v_min = v_min;
        proj
    }

    fn to_camera(&self, p: Point3) -> (f64, f64) {
        let b = [
            (p.x - self.center[0]) * self.scale[0],
            (p.y - self.center[1]) * self.scale[1],
            (p.z - self.center[2]) * self.scale[2],
        ];
        let u = b[0] * self.right[0] + b[1] * self.right[1] + b[2] * self.right[2];
        let v = b[0] * self.up[0] + b[1] * self.up[1] + b[2] * self.up[2];
        (u, v)
    }

    fn to_pixel(&self, p: Point3) -> (f32, f32) {
        let (u, v) = self.to_camera(p);
        let px = self.left_pad + (u - self.u_min) * self.px_per_unit;
        let py = self.height - (self.bottom_pad + (v - self.v_min) * self.px_per_unit);
        (px as f32, py as f32)
    }
}
