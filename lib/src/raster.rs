use crate::polygon::Polygon;
use image::{Rgb, RgbImage};
use std::ops::Range;

/// Horizontal pixel runs covered by `polygon` on a `width` x `height` grid.
///
/// A pixel is covered when its center `(x + 0.5, y + 0.5)` lies inside the polygon. Edges are
/// half-open in y and spans half-open in x, so polygons that tile the plane cover every pixel
/// center exactly once.
pub fn spans(polygon: &Polygon, width: u32, height: u32) -> Vec<(u32, Range<u32>)> {
    let mut result = Vec::new();

    if !polygon.is_renderable() {
        return result;
    }

    let points = &polygon.points;

    // Orient every edge downwards so shared edges produce identical crossings.
    let edges = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .filter(|(a, b)| a.y != b.y)
        .map(|(a, b)| if a.y < b.y { (*a, *b) } else { (*b, *a) })
        .collect::<Vec<_>>();

    let (top, bottom) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
        (lo.min(p.y), hi.max(p.y))
    });

    let first = to_index(top - 0.5, height);
    let last = to_index(bottom - 0.5, height);
    let mut crossings = Vec::new();

    for y in first..last {
        let center = y as f64 + 0.5;

        crossings.clear();
        crossings.extend(
            edges
                .iter()
                .filter(|(a, b)| a.y <= center && center < b.y)
                .map(|(a, b)| a.x + (center - a.y) * (b.x - a.x) / (b.y - a.y)),
        );
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let start = to_index(pair[0] - 0.5, width);
            let end = to_index(pair[1] - 0.5, width);

            if start < end {
                result.push((y, start..end));
            }
        }
    }

    result
}

/// Smallest pixel index whose center is at or beyond `value + 0.5`, clamped to `[0, limit]`.
fn to_index(value: f64, limit: u32) -> u32 {
    value.ceil().clamp(0.0, limit as f64) as u32
}

/// Fill `polygon` on `canvas` and return the number of pixels written. Polygons with fewer than
/// three points are skipped.
pub fn fill_polygon(canvas: &mut RgbImage, polygon: &Polygon, color: Rgb<u8>) -> usize {
    let (width, height) = canvas.dimensions();
    let mut count = 0;

    for (y, xs) in spans(polygon, width, height) {
        count += xs.len();

        for x in xs {
            canvas.put_pixel(x, y, color);
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    #[test]
    fn fills_whole_canvas() {
        let mut canvas = RgbImage::new(5, 3);
        let count = fill_polygon(&mut canvas, &rect(0.0, 0.0, 5.0, 3.0), Rgb([9, 8, 7]));

        assert_eq!(count, 15);
        assert!(canvas.pixels().all(|p| *p == Rgb([9, 8, 7])));
    }

    #[test]
    fn clamps_to_canvas() {
        let mut canvas = RgbImage::new(4, 4);
        let count = fill_polygon(&mut canvas, &rect(-10.0, 2.0, 10.0, 30.0), Rgb([1, 1, 1]));

        assert_eq!(count, 8);
        assert_eq!(*canvas.get_pixel(0, 1), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgb([1, 1, 1]));
    }

    #[test]
    fn adjacent_triangles_partition_pixels() {
        let a = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(7.0, 0.0),
            Point::new(0.0, 7.0),
        ]);
        let b = Polygon::new(vec![
            Point::new(7.0, 0.0),
            Point::new(7.0, 7.0),
            Point::new(0.0, 7.0),
        ]);

        let mut hits = vec![0; 49];

        for polygon in [&a, &b] {
            for (y, xs) in spans(polygon, 7, 7) {
                for x in xs {
                    hits[(y * 7 + x) as usize] += 1;
                }
            }
        }

        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn skips_degenerate_polygons() {
        let mut canvas = RgbImage::new(4, 4);
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)]);

        assert_eq!(fill_polygon(&mut canvas, &line, Rgb([255, 0, 0])), 0);
        assert_eq!(fill_polygon(&mut canvas, &Polygon::new(vec![]), Rgb([255, 0, 0])), 0);
    }
}
