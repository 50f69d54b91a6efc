//! Text rendered as flat vector outlines embedded on a plane in the scene.
//!
//! Glyph outlines are flattened to polygonal contours in a local plane,
//! rotated and anchored there, and only lifted into scene coordinates when
//! a drawing surface asks for them.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rusttype::{Font, OutlineBuilder, Scale};

use crate::error::{Error, Result};
use crate::geometry::{Point, Point3};
use crate::styles::Rgba;

/// Line segments used to flatten one quadratic or cubic outline curve.
const CURVE_STEPS: usize = 8;

/// Axis perpendicular to the plane a text patch lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Splits an anchor into its in-plane pair and its depth along this axis.
    pub fn split(&self, p: Point3) -> (Point, f64) {
        match self {
            Axis::X => (Point::new(p.y, p.z), p.x),
            Axis::Y => (Point::new(p.x, p.z), p.y),
            Axis::Z => (Point::new(p.x, p.y), p.z),
        }
    }

    /// Embeds an in-plane point at `depth` along this axis.
    pub fn embed(&self, planar: Point, depth: f64) -> Point3 {
        match self {
            Axis::X => Point3::new(depth, planar.x, planar.y),
            Axis::Y => Point3::new(planar.x, depth, planar.y),
            Axis::Z => Point3::new(planar.x, planar.y, depth),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(Error::InvalidAxis(other.to_string())),
        }
    }
}

/// Where and how a text label sits in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    /// Anchor of the text baseline start, in scene coordinates.
    pub position: Point3,
    /// Axis perpendicular to the text plane.
    pub axis: Axis,
    /// Glyph size in scene units.
    pub size: f64,
    /// In-plane rotation in radians, counter-clockwise, applied before
    /// the anchor translation.
    pub angle: f64,
    pub fill: Rgba,
    pub edge: Rgba,
}

impl TextPlacement {
    pub fn new(position: Point3, axis: Axis, size: f64) -> Self {
        Self {
            position,
            axis,
            size,
            angle: 0.0,
            fill: Rgba::BLACK,
            edge: Rgba::BLACK,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_colors(mut self, fill: Rgba, edge: Rgba) -> Self {
        self.fill = fill;
        self.edge = edge;
        self
    }
}

/// Flat text outline bound to a plane in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPatch {
    /// Planar outline contours, already rotated and anchored.
    pub contours: Vec<Vec<Point>>,
    pub axis: Axis,
    /// Position of the text plane along `axis`.
    pub depth: f64,
    pub fill: Rgba,
    pub edge: Rgba,
}

impl TextPatch {
    /// Contours lifted into scene coordinates.
    pub fn embedded_contours(&self) -> Vec<Vec<Point3>> {
        self.contours
            .iter()
            .map(|c| c.iter().map(|p| self.axis.embed(*p, self.depth)).collect())
            .collect()
    }
}

/// A loaded TrueType face used to outline label text.
pub struct GlyphFont {
    font: Font<'static>,
}

impl GlyphFont {
    /// Parses a face from raw TTF/OTF bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| Error::Font("unsupported or corrupt font data".to_string()))?;
        Ok(Self { font })
    }

    /// Loads a face from a font file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Outlines `text` and places it according to `placement`.
    ///
    /// The pen starts at the local origin and advances per glyph, with pair
    /// kerning applied; whitespace advances the pen without emitting any
    /// outline. Characters missing from the face fall back to the face's
    /// notdef glyph.
    pub fn project(&self, text: &str, placement: &TextPlacement) -> TextPatch {
        let scale = Scale::uniform(placement.size as f32);
        let mut sink = OutlineSink::default();
        let mut cursor = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let glyph = self.font.glyph(ch).scaled(scale);
            if let Some(last) = prev {
                cursor += self.font.pair_kerning(scale, last, glyph.id());
            }
            sink.pen_x = cursor;
            glyph.build_outline(&mut sink);
            sink.end_contour();
            cursor += glyph.h_metrics().advance_width;
            prev = Some(glyph.id());
        }

        let (anchor, depth) = placement.axis.split(placement.position);
        let contours = sink
            .contours
            .iter()
            .map(|c| {
                c.iter()
                    .map(|p| rotate_translate(*p, placement.angle, anchor))
                    .collect()
            })
            .collect();
        TextPatch {
            contours,
            axis: placement.axis,
            depth,
            fill: placement.fill,
            edge: placement.edge,
        }
    }
}

/// Collects glyph outlines into flat polygonal contours.
///
/// Faces emit outlines with y growing downward; the sink flips y so the
/// contours live in plot coordinates.
#[derive(Default)]
struct OutlineSink {
    contours: Vec<Vec<Point>>,
    current: Vec<Point>,
    last: (f32, f32),
    pen_x: f32,
}

impl OutlineSink {
    fn push(&mut self, x: f32, y: f32) {
        self.current
            .push(Point::new((x + self.pen_x) as f64, -y as f64));
    }

    fn end_contour(&mut self) {
        if self.current.len() >= 2 {
            self.contours.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_contour();
        self.last = (x, y);
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.last = (x, y);
        self.push(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.last;
        for i in 1..=CURVE_STEPS {
            let t = i as f32 / CURVE_STEPS as f32;
            let mt = 1.0 - t;
            let qx = mt * mt * x0 + 2.0 * mt * t * x1 + t * t * x;
            let qy = mt * mt * y0 + 2.0 * mt * t * y1 + t * t * y;
            self.push(qx, qy);
        }
        self.last = (x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x0, y0) = self.last;
        for i in 1..=CURVE_STEPS {
            let t = i as f32 / CURVE_STEPS as f32;
            let mt = 1.0 - t;
            let cx = mt * mt * mt * x0
                + 3.0 * mt * mt * t * x1
                + 3.0 * mt * t * t * x2
                + t * t * t * x;
            let cy = mt * mt * mt * y0
                + 3.0 * mt * mt * t * y1
                + 3.0 * mt * t * t * y2
                + t * t * t * y;
            self.push(cx, cy);
        }
        self.last = (x, y);
    }

    fn close(&mut self) {
        self.end_contour();
    }
}

fn rotate_translate(p: Point, angle: f64, anchor: Point) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(
        p.x * cos - p.y * sin + anchor.x,
        p.x * sin + p.y * cos + anchor.y,
    )
}
