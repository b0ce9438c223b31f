//! Error type shared by every stage of the mosaic pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("image {} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cell count {count} out of range, it must be greater than 5 and at most {max} for this image")]
    InvalidCellCount { count: usize, max: usize },

    #[error("generator {index} at ({x}, {y}) lies outside the canvas")]
    GeneratorOutOfBounds { index: usize, x: f64, y: f64 },

    #[error("degenerate tessellation input: {0}")]
    Geometry(String),

    #[error("failed to encode output: {0}")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
