use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Cannot allocate a {width}x{height} raster buffer")]
    EmptyBuffer { width: u32, height: u32 },

    #[error("Snapshot is {found_width}x{found_height}, buffer is {width}x{height}")]
    SnapshotMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("Image is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("Degenerate path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;
