//! Run configuration passed explicitly to the pipeline.

use crate::error::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Cell counts must be strictly greater than this.
pub const MIN_CELLS: usize = 5;

/// At most one cell per this many pixels.
pub const PIXELS_PER_CELL: u64 = 10;

/// How a cell's fill color is chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Read the source pixel under the cell's generator.
    #[default]
    Sampled,
    /// Draw a uniform random RGB triple per cell.
    Random,
}

/// What happens to Voronoi regions that extend to infinity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Close unbounded regions and clip every cell to the canvas.
    #[default]
    Clip,
    /// Skip unbounded regions entirely, leaving the background visible.
    Drop,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub num_cells: usize,
    pub color_mode: ColorMode,
    pub seed: u64,
    pub boundary: Boundary,
    /// Ignore the generator to region index and match generators by point location.
    pub locate_generators: bool,
}

impl Config {
    pub fn new(num_cells: usize) -> Self {
        Config {
            num_cells,
            color_mode: ColorMode::default(),
            seed: 0,
            boundary: Boundary::default(),
            locate_generators: false,
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

pub fn max_cells(width: u32, height: u32) -> usize {
    (width as u64 * height as u64 / PIXELS_PER_CELL) as usize
}

pub fn validate_cell_count(count: usize, width: u32, height: u32) -> Result<()> {
    let max = max_cells(width, height);

    if count <= MIN_CELLS || count > max {
        return Err(Error::InvalidCellCount { count, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_few_cells() {
        assert!(matches!(
            validate_cell_count(5, 1000, 1000),
            Err(Error::InvalidCellCount { count: 5, .. })
        ));
        assert!(validate_cell_count(6, 1000, 1000).is_ok());
    }

    #[test]
    fn rejects_too_dense_cells() {
        assert!(matches!(
            validate_cell_count(1000, 50, 50),
            Err(Error::InvalidCellCount {
                count: 1000,
                max: 250
            })
        ));
        assert!(validate_cell_count(250, 50, 50).is_ok());
        assert!(validate_cell_count(251, 50, 50).is_err());
    }

    #[test]
    fn same_seed_same_stream() {
        use rand::Rng;

        let mut config = Config::new(10);
        config.seed = 1234;

        let a: Vec<u32> = (0..8).map(|_| config.rng().gen()).collect();
        let mut rng = config.rng();
        let b: Vec<u32> = (0..8).map(|_| rng.gen()).collect();

        assert!(a.iter().all(|v| *v == a[0]));
        assert_eq!(a[0], b[0]);
    }
}
