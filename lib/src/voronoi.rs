use crate::error::{Error, Result};
use crate::point::Point;
use log::debug;
use std::collections::HashSet;
use voronator::delaunator::{self, next_halfedge, prev_halfedge, INVALID_INDEX};

/// Reference to a diagram vertex, or the marker for an edge that runs off to infinity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexRef {
    Index(usize),
    Infinity,
}

#[derive(Clone, Debug, Default)]
pub struct Region {
    pub vertices: Vec<VertexRef>,

    /// Unit directions of the two infinite edges of an unbounded region: the first leaves the
    /// last finite vertex, the second leads back into the first finite vertex.
    pub rays: Option<(Point, Point)>,
}

impl Region {
    pub fn is_bounded(&self) -> bool {
        !self.vertices.contains(&VertexRef::Infinity)
    }

    /// Finite vertex indices in diagram order.
    pub fn finite(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices.iter().filter_map(|v| match v {
            VertexRef::Index(i) => Some(*i),
            VertexRef::Infinity => None,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Diagram {
    pub vertices: Vec<Point>,
    pub regions: Vec<Region>,

    /// Region index for every generator, if the tessellation knows it.
    pub point_region: Option<Vec<usize>>,
}

impl Diagram {
    /// Forget the generator to region index, as if the diagram came from a source that does not
    /// provide it.
    pub fn without_correspondence(self) -> Self {
        Diagram {
            point_region: None,
            ..self
        }
    }

    pub fn region_of(&self, generator: usize) -> Option<&Region> {
        let index = *self.point_region.as_ref()?.get(generator)?;
        self.regions.get(index)
    }
}

pub trait Tessellator {
    fn tessellate(&self, generators: &[Point]) -> Result<Diagram>;
}

/// Voronoi diagram derived as the dual of a Delaunay triangulation.
#[derive(Copy, Clone, Debug, Default)]
pub struct DelaunayTessellator;

struct Mesh<'a> {
    triangles: &'a [usize],
    halfedges: &'a [usize],
    generators: &'a [Point],
}

impl<'a> Mesh<'a> {
    fn opposite(&self, e: usize) -> Option<usize> {
        self.halfedges
            .get(e)
            .copied()
            .filter(|&o| o != INVALID_INDEX)
    }

    /// Unit normal of the hull edge `a`-`b` pointing away from `inner`. Endpoints are ordered by
    /// index first so both cells adjacent to the edge get the same bits.
    fn outward_normal(&self, a: usize, b: usize, inner: usize) -> Point {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        let origin = self.generators[a];
        let mut normal = (self.generators[b] - origin).perp();

        if normal.dot(&(self.generators[inner] - origin)) > 0.0 {
            normal = -normal;
        }

        normal / normal.length()
    }

    fn region(&self, start: usize) -> Region {
        let mut first = start;
        let mut bounded = true;

        // Rotate backwards until we either close the ring or hit the hull.
        loop {
            match self.opposite(first) {
                None => {
                    bounded = false;
                    break;
                }
                Some(o) => {
                    first = next_halfedge(o);

                    if first == start {
                        break;
                    }
                }
            }
        }

        let mut edges = vec![first];
        let mut e = first;

        while let Some(o) = self.opposite(prev_halfedge(e)) {
            if o == first {
                break;
            }

            edges.push(o);
            e = o;
        }

        let mut vertices = edges
            .iter()
            .map(|e| VertexRef::Index(e / 3))
            .collect::<Vec<_>>();

        if bounded {
            return Region {
                vertices,
                rays: None,
            };
        }

        let last = e;
        let p = self.triangles[first];
        let q = self.triangles[next_halfedge(first)];
        let r = self.triangles[prev_halfedge(last)];

        let leaving = self.outward_normal(r, p, self.triangles[next_halfedge(last)]);
        let entering = self.outward_normal(p, q, self.triangles[prev_halfedge(first)]);

        vertices.push(VertexRef::Infinity);

        Region {
            vertices,
            rays: Some((leaving, entering)),
        }
    }
}

fn check_distinct(generators: &[Point]) -> Result<()> {
    let mut seen = HashSet::with_capacity(generators.len());

    for (index, p) in generators.iter().enumerate() {
        if !seen.insert((p.x.to_bits(), p.y.to_bits())) {
            return Err(Error::Geometry(format!(
                "generator {} at ({}, {}) is a duplicate",
                index, p.x, p.y
            )));
        }
    }

    Ok(())
}

impl Tessellator for DelaunayTessellator {
    fn tessellate(&self, generators: &[Point]) -> Result<Diagram> {
        check_distinct(generators)?;

        let points = generators
            .iter()
            .map(delaunator::Point::from)
            .collect::<Vec<_>>();

        let triangulation = delaunator::triangulate(&points[..]).ok_or_else(|| {
            Error::Geometry(format!(
                "cannot triangulate {} generators, they may be collinear",
                generators.len()
            ))
        })?;

        let mesh = Mesh {
            triangles: &triangulation.triangles,
            halfedges: &triangulation.halfedges,
            generators,
        };

        let vertices = mesh
            .triangles
            .chunks_exact(3)
            .enumerate()
            .map(|(index, t)| {
                delaunator::circumcenter(&points[t[0]], &points[t[1]], &points[t[2]])
                    .map(Point::from)
                    .ok_or_else(|| Error::Geometry(format!("triangle {} has zero area", index)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outgoing = vec![None; generators.len()];

        for (e, &origin) in mesh.triangles.iter().enumerate() {
            outgoing[origin].get_or_insert(e);
        }

        let regions = outgoing
            .into_iter()
            .enumerate()
            .map(|(index, start)| {
                start.map(|e| mesh.region(e)).ok_or_else(|| {
                    Error::Geometry(format!("generator {} has no Voronoi region", index))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Tessellated {} generators into {} vertices, {} unbounded regions",
            generators.len(),
            vertices.len(),
            regions.iter().filter(|r| !r.is_bounded()).count()
        );

        Ok(Diagram {
            vertices,
            regions,
            point_region: Some((0..generators.len()).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_center() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
        ]
    }

    #[test]
    fn circumcenter_of_right_triangle_is_hypotenuse_midpoint() {
        let corner = |x, y| delaunator::Point::from(&Point::new(x, y));
        let c = delaunator::circumcenter(&corner(0.0, 0.0), &corner(4.0, 0.0), &corner(0.0, 2.0));

        assert_eq!(c.map(Point::from), Some(Point::new(2.0, 1.0)));
    }

    #[test]
    fn flat_triangle_has_no_circumcenter() {
        let corner = |x, y| delaunator::Point::from(&Point::new(x, y));
        let c = delaunator::circumcenter(&corner(0.0, 0.0), &corner(1.0, 1.0), &corner(3.0, 3.0));

        assert!(c.is_none());
    }

    #[test]
    fn interior_generator_has_bounded_region() {
        let generators = square_with_center();
        let diagram = DelaunayTessellator.tessellate(&generators).unwrap();
        let region = diagram.region_of(4).unwrap();

        assert!(region.is_bounded());
        assert!(region.rays.is_none());

        let mut corners = region
            .finite()
            .map(|i| diagram.vertices[i])
            .collect::<Vec<_>>();
        corners.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

        assert_eq!(
            corners,
            vec![
                Point::new(0.0, 5.0),
                Point::new(5.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(10.0, 5.0),
            ]
        );
    }

    #[test]
    fn hull_generators_are_unbounded_with_outward_rays() {
        let generators = square_with_center();
        let diagram = DelaunayTessellator.tessellate(&generators).unwrap();
        let region = diagram.region_of(0).unwrap();

        assert!(!region.is_bounded());
        assert_eq!(region.vertices.last(), Some(&VertexRef::Infinity));

        let (leaving, entering) = region.rays.unwrap();
        let rays = [leaving, entering];

        assert!(rays.contains(&Point::new(-1.0, 0.0)));
        assert!(rays.contains(&Point::new(0.0, -1.0)));
    }

    #[test]
    fn correspondence_covers_every_generator() {
        let generators = square_with_center();
        let diagram = DelaunayTessellator.tessellate(&generators).unwrap();

        assert_eq!(diagram.regions.len(), generators.len());
        assert_eq!(diagram.point_region.as_ref().unwrap().len(), generators.len());

        let stripped = diagram.without_correspondence();
        assert!(stripped.point_region.is_none());
        assert!(stripped.region_of(0).is_none());
    }

    #[test]
    fn collinear_generators_are_rejected() {
        let generators = (0..6)
            .map(|i| Point::new(i as f64, i as f64 * 2.0))
            .collect::<Vec<_>>();

        assert!(matches!(
            DelaunayTessellator.tessellate(&generators),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn duplicate_generators_are_rejected() {
        let mut generators = square_with_center();
        generators.push(Point::new(5.0, 5.0));

        assert!(matches!(
            DelaunayTessellator.tessellate(&generators),
            Err(Error::Geometry(_))
        ));
    }
}
