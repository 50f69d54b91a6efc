//! Error type shared by the plotting pipeline.

use thiserror::Error;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing or rendering a court scene.
#[derive(Debug, Error)]
pub enum Error {
    /// Input data carries too little variation for the requested
    /// computation, e.g. a point cloud with singular covariance.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A curve fit was asked for with fewer samples than it needs.
    #[error("curve fit needs at least 2 samples, got {0}")]
    InsufficientPoints(usize),

    /// A depth-axis designator other than `x`, `y` or `z`.
    #[error("invalid depth axis `{0}` (expected `x`, `y` or `z`)")]
    InvalidAxis(String),

    /// A colour specification that does not resolve to an RGBA value.
    #[error("unknown color `{0}`")]
    InvalidColor(String),

    /// The typeface could not be loaded or parsed.
    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
