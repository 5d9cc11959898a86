//! Seam for the external consistency (densest-clique) solver.
//!
//! Pruning the candidate correspondence set down to a mutually consistent
//! inlier set is the job of an external combinatorial optimizer over the
//! pairwise-consistency graph. This crate only defines the interface and
//! passes the scoring parameters through unmodified.

use crate::error::AlignResult;
use crate::types::{Correspondence, PointSet};

/// Pass-through parameters for the external consistency scorer.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ConsistencyParams {
    /// Noise standard deviation for pairwise-distance consistency scoring.
    pub sigma: f64,

    /// Outlier rejection bound: pairs whose distance discrepancy exceeds this
    /// are scored as inconsistent.
    pub epsilon: f64,
}

impl Default for ConsistencyParams {
    fn default() -> Self {
        Self {
            sigma: 0.1,
            epsilon: 0.3,
        }
    }
}

impl ConsistencyParams {
    /// Set the noise sigma.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the outlier epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Prunes a candidate correspondence set to a consistent inlier subset.
pub trait ConsistencyPruner {
    /// Return the inlier subset of `candidates`.
    ///
    /// The returned correspondences must all come from `candidates`; an empty
    /// candidate set must yield an empty inlier set, not an error.
    fn prune(
        &self,
        candidates: &[Correspondence],
        model: &PointSet,
        data: &PointSet,
        params: &ConsistencyParams,
    ) -> AlignResult<Vec<Correspondence>>;
}

/// A pruner that accepts every candidate.
///
/// Useful when the candidate set is already trusted (synthetic data, tests)
/// or when no clique solver is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAllPruner;

impl ConsistencyPruner for KeepAllPruner {
    fn prune(
        &self,
        candidates: &[Correspondence],
        _model: &PointSet,
        _data: &PointSet,
        _params: &ConsistencyParams,
    ) -> AlignResult<Vec<Correspondence>> {
        Ok(candidates.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_all_passthrough() {
        let candidates = vec![Correspondence::new(0, 1), Correspondence::new(2, 0)];
        let empty = PointSet::new();

        let inliers = KeepAllPruner
            .prune(&candidates, &empty, &empty, &ConsistencyParams::default())
            .unwrap();
        assert_eq!(inliers, candidates);
    }

    #[test]
    fn test_keep_all_on_empty_candidates() {
        let empty = PointSet::new();
        let inliers = KeepAllPruner
            .prune(&[], &empty, &empty, &ConsistencyParams::default())
            .unwrap();
        assert!(inliers.is_empty());
    }

    #[test]
    fn test_default_params() {
        let params = ConsistencyParams::default();
        assert!((params.sigma - 0.1).abs() < f64::EPSILON);
        assert!((params.epsilon - 0.3).abs() < f64::EPSILON);
    }
}
