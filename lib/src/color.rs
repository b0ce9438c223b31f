use crate::config::ColorMode;
use crate::point::Point;
use image::{Rgb, RgbImage};
use rand::Rng;

/// Map a continuous coordinate to a pixel index, rounding half up. A coordinate on the far edge
/// rounds to `dimension` and is pulled back onto the last pixel.
pub fn pixel_index(coordinate: f64, dimension: u32) -> u32 {
    let index = (coordinate + 0.5).floor().max(0.0) as u32;
    index.min(dimension.saturating_sub(1))
}

/// Resolves the fill color of a cell from a point inside it.
#[derive(Copy, Clone, Debug)]
pub struct ColorSampler<'a> {
    mode: ColorMode,
    source: &'a RgbImage,
}

impl<'a> ColorSampler<'a> {
    pub fn new(mode: ColorMode, source: &'a RgbImage) -> Self {
        ColorSampler { mode, source }
    }

    pub fn color_at<R: Rng + ?Sized>(&self, rng: &mut R, point: &Point) -> Rgb<u8> {
        match self.mode {
            ColorMode::Sampled => {
                let (width, height) = self.source.dimensions();
                let x = pixel_index(point.x, width);
                let y = pixel_index(point.y, height);
                *self.source.get_pixel(x, y)
            }
            ColorMode::Random => Rgb([rng.gen(), rng.gen(), rng.gen()]),
        }
    }
}
