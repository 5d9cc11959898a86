//! Seam for the external triangulation provider.
//!
//! Triangulation construction is outside this crate. Anything that can turn a
//! [`PointSet`] into triangles (a Delaunay library, a precomputed index file,
//! a test fixture) plugs in through the [`Triangulator`] trait. No particular
//! triangulation algorithm is assumed.

use crate::error::{AlignError, AlignResult};
use crate::types::{PointSet, Triangle};

/// Produces a triangulation of a point set.
pub trait Triangulator {
    /// Triangulate `points`, returning triangles that carry origin indices
    /// into `points`.
    ///
    /// Implementations should reject sets with fewer than 3 points with
    /// [`AlignError::InsufficientPoints`].
    fn triangulate(&self, points: &PointSet) -> AlignResult<Vec<Triangle>>;
}

/// A triangulation loaded ahead of time as index triples.
///
/// This is how an externally produced triangulation (for example a file
/// written by a Delaunay tool) enters the pipeline: the triples are resolved
/// against the point set at use time.
#[derive(Debug, Clone, Default)]
pub struct IndexedTriangulation {
    /// Index triples into the point set this triangulation was built for.
    pub triples: Vec<[usize; 3]>,
}

impl IndexedTriangulation {
    /// Create a triangulation from index triples.
    pub fn new(triples: Vec<[usize; 3]>) -> Self {
        Self { triples }
    }

    /// Number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the triangulation has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl Triangulator for IndexedTriangulation {
    fn triangulate(&self, points: &PointSet) -> AlignResult<Vec<Triangle>> {
        if points.len() < 3 {
            return Err(AlignError::insufficient_points("points", points.len()));
        }
        self.triples
            .iter()
            .map(|&triple| Triangle::from_point_set(points, triple))
            .collect()
    }
}
