use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, RgbImage};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Appended to the input's base name to form the default output file name.
pub const OUTPUT_SUFFIX: &str = "-voronoi.jpeg";

pub const DEFAULT_QUALITY: u8 = 90;

/// Open and decode `path` as 8-bit RGB.
pub fn open_image(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|source| match source {
        ImageError::IoError(ref e) if e.kind() == ErrorKind::NotFound => {
            Error::InputNotFound(path.to_path_buf())
        }
        source => Error::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(img.to_rgb8())
}

/// `photo.png` becomes `photo-voronoi.jpeg`, relative to the working directory.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("mosaic");

    PathBuf::from(format!("{}{}", name, OUTPUT_SUFFIX))
}

pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder.encode_image(canvas).map_err(Error::Encode)?;
    }

    Ok(buffer)
}

/// Encode in memory first so a failed encode never leaves a partial file behind.
pub fn write_jpeg(path: &Path, canvas: &RgbImage, quality: u8) -> Result<()> {
    let bytes = encode_jpeg(canvas, quality)?;
    std::fs::write(path, bytes)?;

    Ok(())
}
