//! Raster paint buffers for livery: brush strokes, polygon fills and
//! bit-exact snapshots on top of `tiny_skia`.

pub mod buffer;
pub mod convert;
pub mod error;

pub use buffer::{BlendOp, BrushStyle, RasterBuffer, RasterSnapshot, polygon_path};
pub use convert::{pixmap_from_rgba, pixmap_to_rgba};
pub use error::{RasterError, Result};
