use crate::point::Point;
use crate::voronoi::Region;
use serde::{Deserialize, Serialize};

/// Tolerance for a point to count as lying on a polygon edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Closed polygon, the last point connects back to the first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

/// Axis-aligned rectangle, usually the canvas `[0, width] x [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn canvas(width: u32, height: u32) -> Self {
        Bounds {
            min: Point::origin(),
            max: Point::new(width as f64, height as f64),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    fn center(&self) -> Point {
        (self.min + self.max) / 2.0
    }
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Polygon { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 3
    }

    fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
    }

    fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| a.cross(b)).sum::<f64>() / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid, or the vertex mean for polygons without area.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::origin();
        }

        let area = self.signed_area();

        if area.abs() < f64::EPSILON {
            let sum = self.points.iter().fold(Point::origin(), |acc, p| acc + *p);
            return sum / self.points.len() as f64;
        }

        let sum = self.edges().fold(Point::origin(), |acc, (a, b)| {
            acc + (*a + *b) * a.cross(b)
        });

        sum / (6.0 * area)
    }

    /// Crossing-number test. Points on an edge count as inside.
    pub fn contains(&self, p: &Point) -> bool {
        if !self.is_renderable() {
            return false;
        }

        let mut inside = false;

        for (a, b) in self.edges() {
            if on_segment(p, a, b) {
                return true;
            }

            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);

                if p.x < x {
                    inside = !inside;
                }
            }
        }

        inside
    }

    /// Sutherland-Hodgman clip against each side of `bounds`.
    pub fn clip_to(&self, bounds: &Bounds) -> Polygon {
        let sides = [
            Side::Left(bounds.min.x),
            Side::Right(bounds.max.x),
            Side::Top(bounds.min.y),
            Side::Bottom(bounds.max.y),
        ];

        let points = sides
            .iter()
            .fold(self.points.clone(), |points, side| side.clip(&points));

        Polygon::new(points)
    }
}

fn on_segment(p: &Point, a: &Point, b: &Point) -> bool {
    let ab = *b - *a;
    let ap = *p - *a;
    let length = ab.length();

    if length == 0.0 {
        return ap.length() <= EDGE_EPSILON;
    }

    if (ab.cross(&ap) / length).abs() > EDGE_EPSILON {
        return false;
    }

    let t = ab.dot(&ap) / (length * length);
    (-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&t)
}

#[derive(Copy, Clone, Debug)]
enum Side {
    Left(f64),
    Right(f64),
    Top(f64),
    Bottom(f64),
}

impl Side {
    fn inside(&self, p: &Point) -> bool {
        match *self {
            Side::Left(x) => p.x >= x,
            Side::Right(x) => p.x <= x,
            Side::Top(y) => p.y >= y,
            Side::Bottom(y) => p.y <= y,
        }
    }

    /// Intersection of segment `a`-`b` with the side's line. The endpoints are put into a fixed
    /// order first so that two cells sharing the segment get identical vertices.
    fn intersect(&self, a: &Point, b: &Point) -> Point {
        let (a, b) = if b.precedes(a) { (b, a) } else { (a, b) };

        match *self {
            Side::Left(x) | Side::Right(x) => {
                let t = (x - a.x) / (b.x - a.x);
                Point::new(x, a.y + t * (b.y - a.y))
            }
            Side::Top(y) | Side::Bottom(y) => {
                let t = (y - a.y) / (b.y - a.y);
                Point::new(a.x + t * (b.x - a.x), y)
            }
        }
    }

    fn clip(&self, points: &[Point]) -> Vec<Point> {
        let mut result = Vec::with_capacity(points.len() + 2);

        let mut previous = match points.last() {
            Some(p) => p,
            None => return result,
        };

        for current in points {
            match (self.inside(previous), self.inside(current)) {
                (true, true) => result.push(*current),
                (true, false) => result.push(self.intersect(previous, current)),
                (false, true) => {
                    result.push(self.intersect(previous, current));
                    result.push(*current);
                }
                (false, false) => {}
            }

            previous = current;
        }

        result
    }
}

/// Build the polygon of a bounded region from the diagram vertices, keeping diagram order.
///
/// Regions that reach infinity are dropped rather than approximated.
pub fn reconstruct(region: &Region, vertices: &[Point]) -> Option<Polygon> {
    if !region.is_bounded() {
        return None;
    }

    let points = region
        .finite()
        .filter_map(|i| vertices.get(i).copied())
        .collect::<Vec<_>>();

    let polygon = Polygon::new(points);
    polygon.is_renderable().then_some(polygon)
}

/// Reconstructs regions clipped to the canvas, closing unbounded regions first.
#[derive(Copy, Clone, Debug)]
pub struct Clipper {
    bounds: Bounds,
    /// Distance along a ray that is guaranteed to leave the canvas from every diagram vertex.
    reach: f64,
}

impl Clipper {
    pub fn new(bounds: Bounds, vertices: &[Point]) -> Self {
        let center = bounds.center();
        let farthest = vertices
            .iter()
            .map(|v| v.distance(&center))
            .fold(0.0, f64::max);

        Clipper {
            bounds,
            reach: 4.0 * (bounds.min.distance(&bounds.max) + farthest) + 1.0,
        }
    }

    pub fn clip(&self, region: &Region, vertices: &[Point]) -> Option<Polygon> {
        let mut points = region
            .finite()
            .filter_map(|i| vertices.get(i).copied())
            .collect::<Vec<_>>();

        if !region.is_bounded() {
            let (leaving, entering) = region.rays?;
            let (first, last) = (*points.first()?, *points.last()?);

            let exit = last + leaving * self.reach;
            let entry = first + entering * self.reach;
            let middle = leaving + entering;

            points.push(exit);

            // Rays are at most half a turn apart, their sum points into the open end.
            if middle.length() > EDGE_EPSILON {
                points.push((exit + entry) / 2.0 + middle / middle.length() * self.reach);
            }

            points.push(entry);
        }

        let polygon = Polygon::new(points).clip_to(&self.bounds);
        polygon.is_renderable().then_some(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::{DelaunayTessellator, Tessellator};

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn area_and_centroid_of_square() {
        let polygon = square(4.0);

        assert_eq!(polygon.area(), 16.0);
        assert_eq!(polygon.centroid(), Point::new(2.0, 2.0));
    }

    #[test]
    fn contains_interior_and_boundary() {
        let polygon = square(4.0);

        assert!(polygon.contains(&Point::new(1.0, 3.0)));
        assert!(polygon.contains(&Point::new(0.0, 2.0)));
        assert!(polygon.contains(&Point::new(4.0, 4.0)));
        assert!(!polygon.contains(&Point::new(4.5, 2.0)));
        assert!(!polygon.contains(&Point::new(-0.1, -0.1)));
    }

    #[test]
    fn clip_to_smaller_bounds() {
        let clipped = square(10.0).clip_to(&Bounds::canvas(4, 6));

        assert_eq!(clipped.area(), 24.0);
        assert!(clipped
            .points
            .iter()
            .all(|p| Bounds::canvas(4, 6).contains(p)));
    }

    #[test]
    fn clip_outside_bounds_is_empty() {
        let far = Polygon::new(vec![
            Point::new(20.0, 20.0),
            Point::new(30.0, 20.0),
            Point::new(25.0, 30.0),
        ]);

        assert!(far.clip_to(&Bounds::canvas(10, 10)).is_empty());
    }

    #[test]
    fn reconstruct_drops_unbounded_regions() {
        let generators = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
        ];
        let diagram = DelaunayTessellator.tessellate(&generators).unwrap();

        for generator in 0..4 {
            let region = diagram.region_of(generator).unwrap();
            assert!(reconstruct(region, &diagram.vertices).is_none());
        }

        let center = reconstruct(diagram.region_of(4).unwrap(), &diagram.vertices).unwrap();
        assert_eq!(center.len(), 4);
        assert!((center.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn clipped_regions_tile_the_canvas() {
        let generators = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
            Point::new(2.0, 7.0),
        ];
        let diagram = DelaunayTessellator.tessellate(&generators).unwrap();
        let clipper = Clipper::new(Bounds::canvas(10, 10), &diagram.vertices);

        let polygons = diagram
            .regions
            .iter()
            .map(|r| clipper.clip(r, &diagram.vertices).unwrap())
            .collect::<Vec<_>>();

        let total = polygons.iter().map(Polygon::area).sum::<f64>();
        assert!((total - 100.0).abs() < 1e-6);

        for (polygon, generator) in polygons.iter().zip(&generators) {
            assert!(polygon.contains(generator));
        }
    }
}
