//! Shape-invariant triangle descriptors.
//!
//! A triangle's signature is the multiset of Euclidean distances from its
//! vertices to its centroid, sorted ascending. The signature is invariant
//! under rotation, translation and reflection of the triangle, but not under
//! scaling: the pipeline assumes congruent triangles between the two clouds,
//! not merely similar ones.

use crate::types::Triangle;

/// The sorted centroid-distance signature of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleSignature {
    /// Vertex-to-centroid distances, ascending.
    pub distances: [f64; 3],

    /// Permutation mapping sorted position to the original vertex slot:
    /// `order[i]` is the index (0..3) of the vertex whose distance landed at
    /// sorted position `i`. Needed to map matches back to origin indices.
    pub order: [usize; 3],
}

impl TriangleSignature {
    /// Euclidean norm of the element-wise difference between two signatures.
    pub fn distance(&self, other: &TriangleSignature) -> f64 {
        self.distances
            .iter()
            .zip(other.distances.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// Compute the [`TriangleSignature`] of a triangle.
///
/// Degenerate triangles (coincident vertices) are not an error: distances may
/// tie or be zero, and the stable sort keeps the vertex-slot order for ties,
/// which is irrelevant to the symmetric signature distance.
pub fn describe(triangle: &Triangle) -> TriangleSignature {
    let centroid = triangle.centroid();

    let raw: [f64; 3] = [
        (triangle.vertices[0] - centroid).norm(),
        (triangle.vertices[1] - centroid).norm(),
        (triangle.vertices[2] - centroid).norm(),
    ];

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));

    TriangleSignature {
        distances: [raw[order[0]], raw[order[1]], raw[order[2]]],
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procrustes::RigidTransform2d;
    use nalgebra::{Point2, Vector2};

    fn scalene() -> Triangle {
        Triangle::new(
            [
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(1.0, 3.0),
            ],
            [0, 1, 2],
        )
    }

    #[test]
    fn test_distances_are_sorted() {
        let sig = describe(&scalene());
        assert!(sig.distances[0] <= sig.distances[1]);
        assert!(sig.distances[1] <= sig.distances[2]);
    }

    #[test]
    fn test_order_maps_back_to_raw_distances() {
        let tri = scalene();
        let sig = describe(&tri);
        let centroid = tri.centroid();
        for i in 0..3 {
            let raw = (tri.vertices[sig.order[i]] - centroid).norm();
            assert!((raw - sig.distances[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invariance_under_rigid_motion() {
        let tri = scalene();
        let tf = RigidTransform2d::from_angle(1.234, Vector2::new(-7.0, 3.5));
        let moved = Triangle::new(
            [
                tf.apply(&tri.vertices[0]),
                tf.apply(&tri.vertices[1]),
                tf.apply(&tri.vertices[2]),
            ],
            tri.indices,
        );

        let sig_a = describe(&tri);
        let sig_b = describe(&moved);
        assert!(sig_a.distance(&sig_b) < 1e-9);
    }

    #[test]
    fn test_invariance_under_reflection() {
        let tri = scalene();
        let mirrored = Triangle::new(
            [
                Point2::new(-tri.vertices[0].x, tri.vertices[0].y),
                Point2::new(-tri.vertices[1].x, tri.vertices[1].y),
                Point2::new(-tri.vertices[2].x, tri.vertices[2].y),
            ],
            tri.indices,
        );

        assert!(describe(&tri).distance(&describe(&mirrored)) < 1e-12);
    }

    #[test]
    fn test_not_invariant_under_scaling() {
        let tri = scalene();
        let scaled = Triangle::new(
            [
                Point2::new(tri.vertices[0].x * 2.0, tri.vertices[0].y * 2.0),
                Point2::new(tri.vertices[1].x * 2.0, tri.vertices[1].y * 2.0),
                Point2::new(tri.vertices[2].x * 2.0, tri.vertices[2].y * 2.0),
            ],
            tri.indices,
        );

        assert!(describe(&tri).distance(&describe(&scaled)) > 0.5);
    }

    #[test]
    fn test_degenerate_triangle_ties_are_stable() {
        // Two coincident vertices give tied distances; the stable tie-break
        // must keep slot order.
        let tri = Triangle::new(
            [
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 1.0),
                Point2::new(4.0, 1.0),
            ],
            [0, 1, 2],
        );
        let sig = describe(&tri);
        assert_eq!(sig.order[0], 0);
        assert_eq!(sig.order[1], 1);
        assert!((sig.distances[0] - sig.distances[1]).abs() < 1e-12);
    }

    #[test]
    fn test_equilateral_signature() {
        // All three centroid distances equal for an equilateral triangle.
        let h = 3.0f64.sqrt() / 2.0;
        let tri = Triangle::new(
            [
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.5, h),
            ],
            [0, 1, 2],
        );
        let sig = describe(&tri);
        assert!((sig.distances[2] - sig.distances[0]).abs() < 1e-12);
    }
}
