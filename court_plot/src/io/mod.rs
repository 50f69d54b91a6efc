//! Loading and filtering of the play-by-play and ball-tracking tables.
//!
//! Both tables are comma-separated with a header row; columns are located
//! by name, so column order does not matter. All geometry leaves this
//! module already normalised onto the positive-x end of the court.

use std::fs::File;
use std::io::{self, Read};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Point3};

/// Which service court a serve was directed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourtSide {
    Deuce,
    Ad,
}

/// One serve from the play-by-play table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeRecord {
    pub point_id: u64,
    pub server_id: u64,
    /// 1 for first serves, 2 for second serves.
    pub serve_num: u32,
    /// Fault classification, when the serve was a fault.
    pub error_type: Option<String>,
    /// Where the serve met the court.
    pub bounce: Point,
    pub court_side: CourtSide,
    pub is_ace: bool,
}

/// One ball position from the tracking table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingSample {
    pub point_id: u64,
    /// Order of the sample within its point.
    pub seq: u32,
    pub position: Point3,
}

/// Selection criteria for serves to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeFilter {
    pub server_id: u64,
    pub serve_num: u32,
    /// Largest |x| a bounce may have before the serve counts as wayward.
    pub cutoff_x: f64,
    /// Largest |y| a bounce may have before the serve counts as wayward.
    pub cutoff_y: f64,
}

impl ServeFilter {
    /// First serves by one server, with bounce cutoffs one metre beyond
    /// the service box.
    pub fn first_serves(server_id: u64) -> Self {
        Self {
            server_id,
            serve_num: 1,
            cutoff_x: 7.4,
            cutoff_y: 6.487,
        }
    }

    /// Whether a record passes the filter. Net faults never pass.
    pub fn matches(&self, r: &ServeRecord) -> bool {
        r.server_id == self.server_id
            && r.serve_num == self.serve_num
            && r.error_type.as_deref() != Some("Net Error")
            && r.bounce.x.abs() <= self.cutoff_x
            && r.bounce.y.abs() <= self.cutoff_y
    }
}

fn read_lines(path: &str) -> io::Result<Vec<String>> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer.lines().map(|l| l.to_string()).collect())
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn column(header: &[&str], name: &str) -> io::Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| invalid(format!("missing column `{name}`")))
}

fn field<'a>(parts: &'a [&str], idx: usize, line_no: usize) -> io::Result<&'a str> {
    parts
        .get(idx)
        .map(|s| s.trim())
        .ok_or_else(|| invalid(format!("line {line_no}: too few fields")))
}

fn parse_field<T: FromStr>(s: &str, line_no: usize) -> io::Result<T>
where
    T::Err: std::fmt::Display,
{
    s.parse()
        .map_err(|e| invalid(format!("line {line_no}: {e}")))
}

/// Reads the play-by-play table.
///
/// Required columns: `point_ID`, `server_id`, `serve_num`, `error_type`,
/// `x_serve_bounce`, `y_serve_bounce`, `court_side`, `is_ace`. An empty
/// `error_type` field means the serve was not a fault.
pub fn read_serve_records(path: &str) -> io::Result<Vec<ServeRecord>> {
    let lines = read_lines(path)?;
    let header_line = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| invalid("missing header row".to_string()))?;
    let header: Vec<&str> = header_line.split(',').collect();
    let c_point = column(&header, "point_ID")?;
    let c_server = column(&header, "server_id")?;
    let c_num = column(&header, "serve_num")?;
    let c_error = column(&header, "error_type")?;
    let c_x = column(&header, "x_serve_bounce")?;
    let c_y = column(&header, "y_serve_bounce")?;
    let c_side = column(&header, "court_side")?;
    let c_ace = column(&header, "is_ace")?;

    let mut records = Vec::new();
    let mut seen_header = false;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !seen_header {
            seen_header = true;
            continue;
        }
        let line_no = idx + 1;
        let parts: Vec<&str> = line.split(',').collect();
        let error_type = match field(&parts, c_error, line_no)? {
            "" => None,
            s => Some(s.to_string()),
        };
        let side = match field(&parts, c_side, line_no)? {
            "DeuceCourt" => CourtSide::Deuce,
            "AdCourt" => CourtSide::Ad,
            other => {
                return Err(invalid(format!(
                    "line {line_no}: unknown court side `{other}`"
                )))
            }
        };
        records.push(ServeRecord {
            point_id: parse_field(field(&parts, c_point, line_no)?, line_no)?,
            server_id: parse_field(field(&parts, c_server, line_no)?, line_no)?,
            serve_num: parse_field(field(&parts, c_num, line_no)?, line_no)?,
            error_type,
            bounce: Point::new(
                parse_field(field(&parts, c_x, line_no)?, line_no)?,
                parse_field(field(&parts, c_y, line_no)?, line_no)?,
            ),
            court_side: side,
            is_ace: parse_field::<u32>(field(&parts, c_ace, line_no)?, line_no)? != 0,
        });
    }
    Ok(records)
}

/// Reads the ball-tracking table.
///
/// Required columns: `point_ID`, `seq`, `x`, `y`, `z`.
pub fn read_tracking_samples(path: &str) -> io::Result<Vec<TrackingSample>> {
    let lines = read_lines(path)?;
    let header_line = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| invalid("missing header row".to_string()))?;
    let header: Vec<&str> = header_line.split(',').collect();
    let c_point = column(&header, "point_ID")?;
    let c_seq = column(&header, "seq")?;
    let c_x = column(&header, "x")?;
    let c_y = column(&header, "y")?;
    let c_z = column(&header, "z")?;

    let mut samples = Vec::new();
    let mut seen_header = false;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !seen_header {
            seen_header = true;
            continue;
        }
        let line_no = idx + 1;
        let parts: Vec<&str> = line.split(',').collect();
        samples.push(TrackingSample {
            point_id: parse_field(field(&parts, c_point, line_no)?, line_no)?,
            seq: parse_field(field(&parts, c_seq, line_no)?, line_no)?,
            position: Point3::new(
                parse_field(field(&parts, c_x, line_no)?, line_no)?,
                parse_field(field(&parts, c_y, line_no)?, line_no)?,
                parse_field(field(&parts, c_z, line_no)?, line_no)?,
            ),
        });
    }
    Ok(samples)
}

/// Applies `filter` to the table, keeping table order.
pub fn filter_serves<'a>(records: &'a [ServeRecord], filter: &ServeFilter) -> Vec<&'a ServeRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Point ids of the aces among `serves`, in table order.
pub fn ace_point_ids(serves: &[&ServeRecord]) -> Vec<u64> {
    serves
        .iter()
        .filter(|r| r.is_ace)
        .map(|r| r.point_id)
        .collect()
}

/// Bounce points aimed at one service court, reflected onto the
/// positive-x end.
pub fn bounce_points(serves: &[&ServeRecord], side: CourtSide) -> Vec<Point> {
    let mut pts: Vec<Point> = serves
        .iter()
        .filter(|r| r.court_side == side)
        .map(|r| r.bounce)
        .collect();
    reflect_to_positive_x(&mut pts);
    pts
}

/// Reflects every point with a negative x through the origin, so all
/// points land on the positive-x end of the court.
pub fn reflect_to_positive_x(points: &mut [Point]) {
    for p in points {
        if p.x < 0.0 {
            p.x = -p.x;
            p.y = -p.y;
        }
    }
}

/// Reflects a whole flight through the plane origin when its first sample
/// sits on the positive-x end, so every serve travels the same way.
/// Heights are untouched.
pub fn normalize_serve_direction(samples: &mut [Point3]) {
    if samples.first().is_some_and(|p| p.x > 0.0) {
        for p in samples {
            p.x = -p.x;
            p.y = -p.y;
        }
    }
}

/// Tracking samples of one point, ordered by sequence index and
/// direction-normalised.
pub fn tracking_sequence(samples: &[TrackingSample], point_id: u64) -> Vec<Point3> {
    let mut selected: Vec<&TrackingSample> =
        samples.iter().filter(|s| s.point_id == point_id).collect();
    selected.sort_by_key(|s| s.seq);
    let mut pts: Vec<Point3> = selected.iter().map(|s| s.position).collect();
    normalize_serve_direction(&mut pts);
    pts
}
