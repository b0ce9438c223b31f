use crate::config::validate_cell_count;
use crate::error::Result;
use crate::point::Point;
use rand::Rng;

/// Unit square corners, appended after the random points.
const CORNERS: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];

/// Sample `num_cells` generators over a `width` x `height` canvas.
///
/// All but four points are drawn uniformly from the unit square, the four corners are always
/// included so that only the corner cells reach the canvas border, and everything is scaled to
/// pixel space at the end.
pub fn sample_generators<R: Rng + ?Sized>(
    rng: &mut R,
    num_cells: usize,
    width: u32,
    height: u32,
) -> Result<Vec<Point>> {
    validate_cell_count(num_cells, width, height)?;

    let mut points = Vec::with_capacity(num_cells);

    for _ in 0..num_cells - CORNERS.len() {
        let x = rng.gen::<f64>();
        let y = rng.gen::<f64>();
        points.push(Point::new(x, y));
    }

    points.extend(CORNERS.iter().map(|&(x, y)| Point::new(x, y)));

    let (width, height) = (width as f64, height as f64);

    Ok(points
        .into_iter()
        .map(|p| Point::new(p.x * width, p.y * height))
        .collect())
}
