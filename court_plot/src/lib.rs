//! Core library for stylised 3D tennis-court visualisations: regulation
//! court geometry, serve bounce density estimation, ball-flight curve
//! fitting and planar text patches, composed onto an injected drawing
//! surface.

pub mod court;
pub mod density;
pub mod error;
pub mod geometry;
pub mod io;
pub mod render;
pub mod scene;
pub mod styles;
pub mod text;
pub mod trajectory;

pub use error::{Error, Result};
