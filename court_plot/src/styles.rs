//! Colour handling and styling structures for drawing entities.

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::Error;

/// RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

static NAMED_COLORS: Lazy<HashMap<&'static str, [u8; 3]>> = Lazy::new(|| {
    HashMap::from([
        ("black", [0, 0, 0]),
        ("white", [255, 255, 255]),
        ("red", [255, 0, 0]),
        ("green", [0, 128, 0]),
        ("blue", [0, 0, 255]),
        ("yellow", [255, 255, 0]),
        ("cyan", [0, 255, 255]),
        ("magenta", [255, 0, 255]),
        ("gray", [128, 128, 128]),
        ("grey", [128, 128, 128]),
        ("orange", [255, 165, 0]),
        ("pink", [255, 192, 203]),
        ("teal", [0, 128, 128]),
        ("navy", [0, 0, 128]),
        ("purple", [128, 0, 128]),
        ("brown", [165, 42, 42]),
        ("ivory", [255, 255, 240]),
        ("cornflowerblue", [100, 149, 237]),
    ])
});

impl Rgba {
    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Colour with full opacity.
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with the alpha channel replaced.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    /// Channels quantised to 8 bits, clamped to the valid range.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Parses a colour name or a `#rrggbb`/`#rrggbbaa` hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            // Byte-indexed slicing below is only sound on ASCII input.
            if !hex.is_ascii() {
                return Err(Error::InvalidColor(spec.to_string()));
            }
            let channel = |range: &str| {
                u8::from_str_radix(range, 16).map_err(|_| Error::InvalidColor(spec.to_string()))
            };
            return match hex.len() {
                6 => Ok(Rgba::from_rgba8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Ok(Rgba::from_rgba8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => Err(Error::InvalidColor(spec.to_string())),
            };
        }
        NAMED_COLORS
            .get(spec.to_ascii_lowercase().as_str())
            .map(|[r, g, b]| Rgba::from_rgba8(*r, *g, *b, 255))
            .ok_or_else(|| Error::InvalidColor(spec.to_string()))
    }
}

/// Default number of entries in a colour ramp.
pub const RAMP_SIZE: usize = 256;

/// Discrete colour ramp with monotone alpha, sampled by a value in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    entries: Vec<Rgba>,
}

impl ColorRamp {
    /// Builds a ramp interpolating `low` to `high` with alpha rising
    /// linearly from 0 to 1 over `n` entries.
    pub fn alpha_ramp(low: Rgba, high: Rgba, n: usize) -> Self {
        let n = n.max(2);
        let entries = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Rgba {
                    r: low.r + (high.r - low.r) * t,
                    g: low.g + (high.g - low.g) * t,
                    b: low.b + (high.b - low.b) * t,
                    a: t,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest ramp entry for `t` in `[0, 1]`; out-of-range values clamp
    /// to the ends.
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let idx = (t * (self.entries.len() - 1) as f64).round() as usize;
        self.entries[idx]
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }
}

/// Stroke pattern of a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
    /// No stroke at all; only the markers are drawn.
    MarkersOnly,
}

/// Marker decoration placed on polyline vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker radius in pixels.
    pub size: f32,
    /// Draw a marker on every n-th vertex.
    pub every: usize,
    /// Optional outline colour around each marker.
    pub edge: Option<Rgba>,
}

impl MarkerStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            every: 1,
            edge: None,
        }
    }

    pub fn with_every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    pub fn with_edge(mut self, edge: Rgba) -> Self {
        self.edge = Some(edge);
        self
    }
}

/// Style applied to a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub kind: LineKind,
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: f32,
    pub marker: Option<MarkerStyle>,
}

impl LineStyle {
    pub fn new(kind: LineKind, color: Rgba, width: f32) -> Self {
        Self {
            kind,
            color,
            width,
            marker: None,
        }
    }

    pub fn solid(color: Rgba, width: f32) -> Self {
        Self::new(LineKind::Solid, color, width)
    }

    /// Marker-only style with no connecting stroke.
    pub fn markers(color: Rgba, marker: MarkerStyle) -> Self {
        Self {
            kind: LineKind::MarkersOnly,
            color,
            width: 0.0,
            marker: Some(marker),
        }
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }
}

/// Fill and edge style applied to a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyStyle {
    pub fill: Rgba,
    pub edge: Rgba,
    /// Edge stroke width in pixels.
    pub edge_width: f32,
}

impl PolyStyle {
    pub fn new(fill: Rgba, edge: Rgba, edge_width: f32) -> Self {
        Self {
            fill,
            edge,
            edge_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_color() {
        let c: Rgba = "cornflowerblue".parse().unwrap();
        assert!((c.r - 100.0 / 255.0).abs() < 1e-9);
        assert!((c.g - 149.0 / 255.0).abs() < 1e-9);
        assert!((c.b - 237.0 / 255.0).abs() < 1e-9);
        assert!((c.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let a: Rgba = "Pink".parse().unwrap();
        let b: Rgba = "pink".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_hex_with_alpha() {
        let c: Rgba = "#ff000080".parse().unwrap();
        assert!((c.r - 1.0).abs() < 1e-9);
        assert!((c.g).abs() < 1e-9);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("no-such-color".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#zzzzzz".parse::<Rgba>().is_err());
    }

    #[test]
    fn parse_rejects_non_ascii_hex() {
        // "€" is three bytes, so these specs byte-count as 6 and 8 digits.
        for spec in ["#\u{20ac}aaa", "#\u{20ac}\u{20ac}ab"] {
            assert!(matches!(spec.parse::<Rgba>(), Err(Error::InvalidColor(_))));
        }
    }

    #[test]
    fn rgba8_round_trip() {
        let c = Rgba::new(0.603, 0.184, 0.035, 1.0);
        let [r, g, b, a] = c.to_rgba8();
        assert_eq!([r, g, b, a], [154, 47, 9, 255]);
    }

    #[test]
    fn ramp_alpha_is_monotone() {
        let ramp = ColorRamp::alpha_ramp(Rgba::WHITE, Rgba::opaque(0.0, 0.5, 0.5), RAMP_SIZE);
        assert_eq!(ramp.len(), RAMP_SIZE);
        let entries = ramp.entries();
        assert!((entries[0].a).abs() < 1e-12);
        assert!((entries[RAMP_SIZE - 1].a - 1.0).abs() < 1e-12);
        for pair in entries.windows(2) {
            assert!(pair[1].a >= pair[0].a);
        }
    }

    #[test]
    fn ramp_sample_clamps() {
        let low = Rgba::opaque(1.0, 1.0, 1.0);
        let high = Rgba::opaque(0.0, 0.0, 0.0);
        let ramp = ColorRamp::alpha_ramp(low, high, 16);
        assert_eq!(ramp.sample(-0.5), ramp.sample(0.0));
        assert_eq!(ramp.sample(1.5), ramp.sample(1.0));
        let mid = ramp.sample(0.5);
        assert!((mid.r - 0.5).abs() < 0.1);
    }

    #[test]
    fn ramp_endpoint_colors() {
        let low = Rgba::opaque(1.0, 0.0, 0.0);
        let high = Rgba::opaque(0.0, 0.0, 1.0);
        let ramp = ColorRamp::alpha_ramp(low, high, 64);
        let first = ramp.sample(0.0);
        let last = ramp.sample(1.0);
        assert!((first.r - 1.0).abs() < 1e-9 && first.b.abs() < 1e-9);
        assert!((last.b - 1.0).abs() < 1e-9 && last.r.abs() < 1e-9);
        assert!((last.a - 1.0).abs() < 1e-9);
    }
}
