use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use tessera::{Boundary, ColorMode, Config};

/// Turn an image into a mosaic of Voronoi cells.
#[derive(Parser)]
#[command(version, about)]
pub struct Options {
    /// Source image
    #[arg(long, short)]
    image: PathBuf,

    /// Number of Voronoi cells, more than 5 and at most one per 10 pixels
    #[arg(long, short)]
    count: usize,

    /// Fill cells with random colors instead of sampling the image
    #[arg(long, short)]
    random_color: bool,

    /// Output file, defaults to <image name>-voronoi.jpeg in the working directory
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Seed for the random generator, picked at random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Leave cells that touch the canvas border empty instead of clipping them
    #[arg(long)]
    drop_unbounded: bool,

    /// Match generators to cells by point location
    #[arg(long)]
    locate: bool,

    /// JPEG quality
    #[arg(long, short, default_value_t = tessera::file::DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Also plot the diagram as SVG
    #[arg(long)]
    diagram: Option<PathBuf>,
}

impl Options {
    fn config(&self) -> Config {
        Config {
            num_cells: self.count,
            color_mode: if self.random_color {
                ColorMode::Random
            } else {
                ColorMode::Sampled
            },
            seed: self.seed.unwrap_or_else(rand::random),
            boundary: if self.drop_unbounded {
                Boundary::Drop
            } else {
                Boundary::Clip
            },
            locate_generators: self.locate,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let opt = Options::parse();
    let config = opt.config();
    let output = opt
        .output
        .clone()
        .unwrap_or_else(|| tessera::file::output_path(&opt.image));

    info!("Using seed {}", config.seed);
    debug!("Configuration: {}", serde_json::to_string(&config)?);

    let mosaic = tessera::mosaic_file(&opt.image, &output, &config, opt.quality)?;

    if let Some(diagram) = &opt.diagram {
        info!("Plot diagram to {}", diagram.display());
        tessera::plot::write_diagram(diagram, &mosaic)?;
    }

    Ok(())
}
