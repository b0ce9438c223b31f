pub mod color;
pub mod config;
pub mod error;
pub mod file;
pub mod locate;
#[cfg(feature = "svg")]
pub mod plot;
pub mod point;
pub mod polygon;
pub mod raster;
pub mod sampler;
pub mod voronoi;

pub use config::{Boundary, ColorMode, Config};
pub use error::{Error, Result};

use color::ColorSampler;
use image::{Rgb, RgbImage};
use locate::ColorResolution;
use log::{debug, info};
use point::Point;
use polygon::{Bounds, Clipper, Polygon};
use rand::Rng;
use rayon::prelude::*;
use std::path;
use voronoi::{DelaunayTessellator, Diagram, Tessellator};

/// One rendered cell.
#[derive(Clone, Debug)]
pub struct Cell {
    pub polygon: Polygon,
    /// Index into [`Mosaic::generators`], `None` if no generator was located inside the polygon.
    pub generator: Option<usize>,
    pub color: Rgb<u8>,
    /// Number of canvas pixels painted for this cell.
    pub pixels: usize,
}

#[derive(Clone, Debug)]
pub struct Mosaic {
    pub canvas: RgbImage,
    pub generators: Vec<Point>,
    /// Cells in the order they were painted.
    pub cells: Vec<Cell>,
}

/// Sample generators for `source` and render the mosaic.
pub fn make_mosaic(source: &RgbImage, config: &Config) -> Result<Mosaic> {
    let (width, height) = source.dimensions();
    let mut rng = config.rng();

    info!("Sample {} generators", config.num_cells);
    let generators = sampler::sample_generators(&mut rng, config.num_cells, width, height)?;

    render(&DelaunayTessellator, source, generators, config, &mut rng)
}

/// Render the mosaic for a given generator set, skipping the sampler.
pub fn render_generators(
    source: &RgbImage,
    generators: Vec<Point>,
    config: &Config,
) -> Result<Mosaic> {
    render_generators_with(&DelaunayTessellator, source, generators, config)
}

pub fn render_generators_with(
    tessellator: &dyn Tessellator,
    source: &RgbImage,
    generators: Vec<Point>,
    config: &Config,
) -> Result<Mosaic> {
    let mut rng = config.rng();
    render(tessellator, source, generators, config, &mut rng)
}

fn check_generators(generators: &[Point], width: u32, height: u32) -> Result<()> {
    if generators.len() <= config::MIN_CELLS {
        return Err(Error::InvalidCellCount {
            count: generators.len(),
            max: config::max_cells(width, height),
        });
    }

    let bounds = Bounds::canvas(width, height);

    match generators.iter().position(|p| !bounds.contains(p)) {
        Some(index) => Err(Error::GeneratorOutOfBounds {
            index,
            x: generators[index].x,
            y: generators[index].y,
        }),
        None => Ok(()),
    }
}

fn reconstruct_regions(
    diagram: &Diagram,
    boundary: Boundary,
    width: u32,
    height: u32,
) -> Vec<Option<Polygon>> {
    match boundary {
        Boundary::Drop => diagram
            .regions
            .par_iter()
            .map(|r| polygon::reconstruct(r, &diagram.vertices))
            .collect(),
        Boundary::Clip => {
            let clipper = Clipper::new(Bounds::canvas(width, height), &diagram.vertices);

            diagram
                .regions
                .par_iter()
                .map(|r| clipper.clip(r, &diagram.vertices))
                .collect()
        }
    }
}

fn render<R: Rng + ?Sized>(
    tessellator: &dyn Tessellator,
    source: &RgbImage,
    generators: Vec<Point>,
    config: &Config,
    rng: &mut R,
) -> Result<Mosaic> {
    let (width, height) = source.dimensions();
    check_generators(&generators, width, height)?;

    info!("Tessellate");
    let mut diagram = tessellator.tessellate(&generators)?;

    if config.locate_generators {
        diagram = diagram.without_correspondence();
    }

    info!("Reconstruct {} regions", diagram.regions.len());
    let polygons = reconstruct_regions(&diagram, config.boundary, width, height);

    let resolution = ColorResolution::for_diagram(&diagram);
    debug!("Pair regions and generators by {:?}", resolution);
    let assignments = resolution.resolve(&diagram, polygons, &generators);

    info!("Rasterize {} cells", assignments.len());
    let sampler = ColorSampler::new(config.color_mode, source);
    let mut canvas = RgbImage::new(width, height);
    let mut cells = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        let anchor = match assignment.generator {
            Some(index) => generators[index],
            None => assignment.polygon.centroid(),
        };

        let color = sampler.color_at(rng, &anchor);
        let pixels = raster::fill_polygon(&mut canvas, &assignment.polygon, color);

        cells.push(Cell {
            polygon: assignment.polygon,
            generator: assignment.generator,
            color,
            pixels,
        });
    }

    debug!(
        "Painted {} of {} pixels",
        cells.iter().map(|c| c.pixels).sum::<usize>(),
        width as usize * height as usize
    );

    Ok(Mosaic {
        canvas,
        generators,
        cells,
    })
}

/// Read `input`, render its mosaic and write it as JPEG to `output`.
///
/// The output file is only created once the whole mosaic has been rendered and encoded.
pub fn mosaic_file(
    input: &path::Path,
    output: &path::Path,
    config: &Config,
    quality: u8,
) -> Result<Mosaic> {
    let source = file::open_image(input)?;
    let (width, height) = source.dimensions();

    info!("Loaded {} ({}x{})", input.display(), width, height);

    let mosaic = make_mosaic(&source, config)?;

    info!("Write {}", output.display());
    file::write_jpeg(output, &mosaic.canvas, quality)?;

    Ok(mosaic)
}
