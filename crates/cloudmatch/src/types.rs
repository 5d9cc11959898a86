//! Core point-set data types.

use nalgebra::Point2;

use crate::error::{AlignError, AlignResult};
use crate::procrustes::RigidTransform2d;

/// An ordered set of 2D points.
///
/// Order is semantically meaningful: point indices are used as identifiers
/// throughout the matching pipeline, so a `PointSet` never reorders its
/// contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    /// The points, index-addressable.
    pub points: Vec<Point2<f64>>,
}

impl PointSet {
    /// Create a new empty point set.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point set with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point set from a list of positions.
    pub fn from_positions(positions: &[Point2<f64>]) -> Self {
        Self {
            points: positions.to_vec(),
        }
    }

    /// Create a point set from raw `(x, y)` coordinate pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }

    /// Number of points in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get a point by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point2<f64>> {
        self.points.get(index).copied()
    }

    /// Append a point to the set.
    #[inline]
    pub fn push(&mut self, point: Point2<f64>) {
        self.points.push(point);
    }

    /// Iterate over the points in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Point2<f64>> {
        self.points.iter()
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if the set is empty.
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        if self.points.is_empty() {
            return None;
        }

        let mut min = self.points[0];
        let mut max = self.points[0];

        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Some((min, max))
    }

    /// Arithmetic mean of all points, or None if the set is empty.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
        Some(Point2::from(sum / self.points.len() as f64))
    }

    /// Return a copy of this set with `transform` applied to every point.
    pub fn transformed(&self, transform: &RigidTransform2d) -> PointSet {
        Self {
            points: self.points.iter().map(|p| transform.apply(p)).collect(),
        }
    }
}

impl FromIterator<Point2<f64>> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point2<f64>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A triangle produced by a triangulation of a [`PointSet`].
///
/// Carries both the vertex coordinates and the indices of the originating
/// points, so that matches between triangles can be traced back to point
/// correspondences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions.
    pub vertices: [Point2<f64>; 3],

    /// Indices of the vertices in the originating point set.
    pub indices: [usize; 3],
}

impl Triangle {
    /// Create a triangle from explicit vertices and origin indices.
    pub fn new(vertices: [Point2<f64>; 3], indices: [usize; 3]) -> Self {
        Self { vertices, indices }
    }

    /// Create a triangle from a point set and an index triple.
    ///
    /// Fails if any index is out of range for the set.
    pub fn from_point_set(set: &PointSet, indices: [usize; 3]) -> AlignResult<Self> {
        let mut vertices = [Point2::origin(); 3];
        for (slot, &index) in vertices.iter_mut().zip(indices.iter()) {
            *slot = set
                .get(index)
                .ok_or_else(|| AlignError::invalid_point_index(index, set.len()))?;
        }
        Ok(Self { vertices, indices })
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Point2<f64> {
        let sum = self.vertices[0].coords + self.vertices[1].coords + self.vertices[2].coords;
        Point2::from(sum / 3.0)
    }

    /// Signed area (positive for counter-clockwise winding).
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
    }
}

/// A candidate pairing of one model point with one data point.
///
/// Correspondences are index pairs, not coordinates; the same pair may be
/// emitted multiple times by the matcher when several triangle pairs agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Correspondence {
    /// Index into the model point set.
    pub model: usize,
    /// Index into the data point set.
    pub data: usize,
}

impl Correspondence {
    /// Create a new correspondence.
    #[inline]
    pub fn new(model: usize, data: usize) -> Self {
        Self { model, data }
    }
}
