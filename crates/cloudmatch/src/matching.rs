//! Triangle matching between two triangulated point sets.
//!
//! Every (model, data) triangle pair in the full Cartesian product is
//! compared by the distance between their centroid-distance signatures; pairs
//! below the threshold contribute three candidate point correspondences,
//! pairing sorted vertex with sorted vertex. No spatial indexing or early
//! pruning is applied: a triangulation of n points yields O(n) triangles, so
//! the full scan is O(n^2) and dominates runtime for large clouds.
//!
//! Candidate correspondences are intentionally allowed to repeat; consistency
//! pruning is the job of the downstream solver (see [`crate::consistency`]).
//!
//! # Example
//!
//! ```
//! use cloudmatch::{MatchParams, PointSet, Triangle, match_triangles};
//!
//! let set = PointSet::from_coords(&[(0.0, 0.0), (4.0, 0.0), (1.0, 3.0)]);
//! let tri = Triangle::from_point_set(&set, [0, 1, 2]).unwrap();
//!
//! let result = match_triangles(&[tri], &[tri], &MatchParams::default());
//! assert_eq!(result.accepted_pairs(), 1);
//! assert!(result.diffs[0] < 1e-12);
//! ```

use hashbrown::HashSet;
use nalgebra::Point2;
use rayon::prelude::*;
use tracing::debug;

use crate::descriptor::describe;
use crate::error::{AlignError, AlignResult};
use crate::tracing_ext::OperationTimer;
use crate::types::{Correspondence, PointSet, Triangle};

/// Parameters for triangle matching.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MatchParams {
    /// Maximum signature distance for a triangle pair to be accepted.
    /// Smaller thresholds increase precision and reduce candidate recall.
    pub threshold: f64,

    /// Drop repeated (model, data) index pairs from the candidate list,
    /// keeping the first occurrence. Off by default: duplicates carry vote
    /// weight for the downstream consistency solver.
    pub dedup_candidates: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            dedup_candidates: false,
        }
    }
}

impl MatchParams {
    /// Create params with the default threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matching threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable candidate deduplication.
    pub fn with_dedup(mut self) -> Self {
        self.dedup_candidates = true;
        self
    }
}

/// Output of [`match_triangles`].
///
/// An empty result is a valid state, not an error: a threshold that accepts
/// nothing simply yields zero diffs and zero correspondences.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Signature distance of each accepted triangle pair, in scan order.
    pub diffs: Vec<f64>,

    /// Candidate correspondences, three per accepted triangle pair (unless
    /// deduplication removed repeats).
    pub correspondences: Vec<Correspondence>,
}

impl MatchResult {
    /// Number of triangle pairs that passed the threshold.
    #[inline]
    pub fn accepted_pairs(&self) -> usize {
        self.diffs.len()
    }

    /// Check whether no triangle pair passed the threshold.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Materialize the matched coordinates from the owning point sets, one
    /// (model, data) position pair per correspondence, in candidate order.
    ///
    /// Fails if a correspondence references a point outside either set.
    pub fn matched_points(
        &self,
        model: &PointSet,
        data: &PointSet,
    ) -> AlignResult<(Vec<Point2<f64>>, Vec<Point2<f64>>)> {
        let mut model_points = Vec::with_capacity(self.correspondences.len());
        let mut data_points = Vec::with_capacity(self.correspondences.len());

        for c in &self.correspondences {
            model_points.push(
                model
                    .get(c.model)
                    .ok_or_else(|| AlignError::invalid_point_index(c.model, model.len()))?,
            );
            data_points.push(
                data.get(c.data)
                    .ok_or_else(|| AlignError::invalid_point_index(c.data, data.len()))?,
            );
        }

        Ok((model_points, data_points))
    }
}

/// Compare every model triangle against every data triangle.
///
/// The pair scan is parallelized over model triangles with per-worker
/// accumulators; the collected output is in the same order as the sequential
/// double loop, so results are deterministic.
pub fn match_triangles(
    model_triangles: &[Triangle],
    data_triangles: &[Triangle],
    params: &MatchParams,
) -> MatchResult {
    let _timer = OperationTimer::with_context(
        "match_triangles",
        model_triangles.len(),
        data_triangles.len(),
    );

    let data_signatures: Vec<_> = data_triangles.iter().map(describe).collect();

    let accepted: Vec<(f64, [Correspondence; 3])> = model_triangles
        .par_iter()
        .flat_map(|model_tri| {
            let model_sig = describe(model_tri);
            let mut local = Vec::new();

            for (data_tri, data_sig) in data_triangles.iter().zip(data_signatures.iter()) {
                let diff = model_sig.distance(data_sig);
                if diff < params.threshold {
                    // Pair i-th sorted vertex with i-th sorted vertex, mapped
                    // back through each signature's permutation to the origin
                    // indices.
                    let pairs = [
                        Correspondence::new(
                            model_tri.indices[model_sig.order[0]],
                            data_tri.indices[data_sig.order[0]],
                        ),
                        Correspondence::new(
                            model_tri.indices[model_sig.order[1]],
                            data_tri.indices[data_sig.order[1]],
                        ),
                        Correspondence::new(
                            model_tri.indices[model_sig.order[2]],
                            data_tri.indices[data_sig.order[2]],
                        ),
                    ];
                    local.push((diff, pairs));
                }
            }

            local
        })
        .collect();

    let mut result = MatchResult {
        diffs: Vec::with_capacity(accepted.len()),
        correspondences: Vec::with_capacity(accepted.len() * 3),
    };

    let mut seen: Option<HashSet<Correspondence>> = params
        .dedup_candidates
        .then(|| HashSet::with_capacity(accepted.len() * 3));

    for (diff, pairs) in accepted {
        result.diffs.push(diff);
        for c in pairs {
            match seen.as_mut() {
                Some(seen) => {
                    if seen.insert(c) {
                        result.correspondences.push(c);
                    }
                }
                None => result.correspondences.push(c),
            }
        }
    }

    debug!(
        target: "cloudmatch::matching",
        model_triangles = model_triangles.len(),
        data_triangles = data_triangles.len(),
        accepted_pairs = result.accepted_pairs(),
        candidates = result.correspondences.len(),
        "Triangle matching finished"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procrustes::RigidTransform2d;
    use nalgebra::Vector2;

    fn triangulated_l_shape() -> (PointSet, Vec<Triangle>) {
        let set = PointSet::from_coords(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (1.0, 1.0),
            (1.0, 4.0),
            (0.0, 4.0),
        ]);
        let triangles = vec![
            Triangle::from_point_set(&set, [0, 1, 2]).unwrap(),
            Triangle::from_point_set(&set, [0, 2, 3]).unwrap(),
            Triangle::from_point_set(&set, [0, 3, 4]).unwrap(),
            Triangle::from_point_set(&set, [0, 4, 5]).unwrap(),
        ];
        (set, triangles)
    }

    #[test]
    fn test_self_match_yields_zero_diffs() {
        let (_, triangles) = triangulated_l_shape();
        let result = match_triangles(&triangles, &triangles, &MatchParams::default());

        // Every triangle matches itself with diff ~ 0.
        assert!(result.accepted_pairs() >= triangles.len());
        let near_zero = result.diffs.iter().filter(|d| **d < 1e-12).count();
        assert!(near_zero >= triangles.len());
        assert_eq!(result.correspondences.len(), result.accepted_pairs() * 3);
    }

    #[test]
    fn test_matching_survives_rigid_motion() {
        let (_, model_triangles) = triangulated_l_shape();
        let tf = RigidTransform2d::from_angle(0.9, Vector2::new(10.0, -4.0));

        let data_triangles: Vec<Triangle> = model_triangles
            .iter()
            .map(|t| {
                Triangle::new(
                    [
                        tf.apply(&t.vertices[0]),
                        tf.apply(&t.vertices[1]),
                        tf.apply(&t.vertices[2]),
                    ],
                    t.indices,
                )
            })
            .collect();

        let result = match_triangles(&model_triangles, &data_triangles, &MatchParams::default());
        assert!(result.accepted_pairs() >= model_triangles.len());
    }

    #[test]
    fn test_strict_threshold_yields_empty_result() {
        let (_, triangles) = triangulated_l_shape();
        let distant = PointSet::from_coords(&[(0.0, 0.0), (40.0, 0.0), (0.0, 40.0)]);
        let other = vec![Triangle::from_point_set(&distant, [0, 1, 2]).unwrap()];

        let result = match_triangles(&triangles, &other, &MatchParams::new().with_threshold(1e-6));
        assert!(result.is_empty());
        assert!(result.correspondences.is_empty());
    }

    #[test]
    fn test_matches_sequential_scan_order() {
        let (_, triangles) = triangulated_l_shape();
        let params = MatchParams::new().with_threshold(5.0);

        let parallel = match_triangles(&triangles, &triangles, &params);

        // Sequential reference scan.
        let mut expected = Vec::new();
        for m in &triangles {
            for d in &triangles {
                let diff = describe(m).distance(&describe(d));
                if diff < params.threshold {
                    expected.push(diff);
                }
            }
        }

        assert_eq!(parallel.diffs, expected);
    }

    #[test]
    fn test_dedup_removes_repeated_pairs() {
        let (_, triangles) = triangulated_l_shape();
        let params = MatchParams::new().with_threshold(5.0);

        let raw = match_triangles(&triangles, &triangles, &params);
        let deduped = match_triangles(&triangles, &triangles, &params.clone().with_dedup());

        assert!(deduped.correspondences.len() < raw.correspondences.len());
        assert_eq!(deduped.diffs, raw.diffs);

        let unique: HashSet<_> = deduped.correspondences.iter().copied().collect();
        assert_eq!(unique.len(), deduped.correspondences.len());
    }

    #[test]
    fn test_matched_points_gather() {
        let (set, triangles) = triangulated_l_shape();
        let result = match_triangles(&triangles, &triangles, &MatchParams::default());

        let (model_pts, data_pts) = result.matched_points(&set, &set).unwrap();
        assert_eq!(model_pts.len(), result.correspondences.len());
        assert_eq!(model_pts.len(), data_pts.len());
    }

    #[test]
    fn test_matched_points_rejects_bad_indices() {
        let (set, _) = triangulated_l_shape();
        let result = MatchResult {
            diffs: vec![0.0],
            correspondences: vec![Correspondence::new(99, 0)],
        };
        let err = result.matched_points(&set, &set).unwrap_err();
        assert!(matches!(err, AlignError::InvalidPointIndex { .. }));
    }
}
