//! Pairing rendered polygons with the generators whose color they take.

use crate::point::Point;
use crate::polygon::Polygon;
use crate::voronoi::Diagram;
use log::{debug, warn};
use rayon::prelude::*;

/// For every polygon, the generators located inside it, in ascending generator order.
///
/// A generator is assigned to at most one polygon. If it lies inside several (on a shared edge or
/// vertex) it goes to the polygon whose centroid is nearest, and on equal distance to the lowest
/// polygon index.
pub fn locate(polygons: &[Option<Polygon>], generators: &[Point]) -> Vec<Vec<usize>> {
    let centroids = polygons
        .iter()
        .map(|p| p.as_ref().map(Polygon::centroid))
        .collect::<Vec<_>>();

    let owners = generators
        .par_iter()
        .map(|generator| {
            polygons
                .iter()
                .zip(&centroids)
                .enumerate()
                .filter_map(|(index, (polygon, centroid))| {
                    let polygon = polygon.as_ref()?;
                    let centroid = (*centroid)?;
                    polygon
                        .contains(generator)
                        .then(|| (index, centroid.distance(generator)))
                })
                // First of equal minima, so ties go to the lowest region index.
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _)| index)
        })
        .collect::<Vec<_>>();

    let mut matches = vec![Vec::new(); polygons.len()];

    for (generator, owner) in owners.into_iter().enumerate() {
        match owner {
            Some(index) => matches[index].push(generator),
            None => warn!("Generator {} lies in no rendered region", generator),
        }
    }

    matches
}

/// A renderable polygon and the generator it belongs to, if any.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub polygon: Polygon,
    pub generator: Option<usize>,
}

/// How polygons are paired with generators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorResolution {
    /// Use the diagram's generator to region index.
    DirectCorrespondence,
    /// Find generators by point-in-polygon tests.
    PointLocation,
}

impl ColorResolution {
    pub fn for_diagram(diagram: &Diagram) -> Self {
        if diagram.point_region.is_some() {
            ColorResolution::DirectCorrespondence
        } else {
            ColorResolution::PointLocation
        }
    }

    /// Pair renderable polygons (indexed like `diagram.regions`) with generators.
    ///
    /// With a direct index the result follows generator order and generators without a
    /// renderable region are skipped. With point location the result follows region order and
    /// each polygon takes the lowest generator it contains.
    pub fn resolve(
        &self,
        diagram: &Diagram,
        polygons: Vec<Option<Polygon>>,
        generators: &[Point],
    ) -> Vec<Assignment> {
        match (self, diagram.point_region.as_ref()) {
            (ColorResolution::DirectCorrespondence, Some(point_region)) => {
                let mut polygons = polygons;

                point_region
                    .iter()
                    .enumerate()
                    .filter_map(|(generator, &region)| {
                        let polygon = polygons.get_mut(region)?.take()?;
                        Some(Assignment {
                            polygon,
                            generator: Some(generator),
                        })
                    })
                    .collect()
            }
            _ => {
                let matches = locate(&polygons, generators);

                debug!(
                    "Located {} of {} generators",
                    matches.iter().map(Vec::len).sum::<usize>(),
                    generators.len()
                );

                polygons
                    .into_iter()
                    .zip(matches)
                    .enumerate()
                    .filter_map(|(index, (polygon, found))| {
                        let polygon = polygon?;

                        if found.is_empty() {
                            warn!("Region {} contains no generator", index);
                        }

                        Some(Assignment {
                            polygon,
                            generator: found.first().copied(),
                        })
                    })
                    .collect()
            }
        }
    }
}
