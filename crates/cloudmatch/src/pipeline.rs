//! The full registration pipeline.
//!
//! Ties the stages together: triangulate both point sets through the
//! [`Triangulator`] seam, match triangles into candidate correspondences,
//! prune the candidates through the [`ConsistencyPruner`] seam, and estimate
//! the rigid transform from the surviving inliers.
//!
//! # Example
//!
//! ```
//! use cloudmatch::{
//!     IndexedTriangulation, KeepAllPruner, PointSet, RegistrationParams, RigidTransform2d,
//!     register_point_sets,
//! };
//! use nalgebra::Vector2;
//!
//! let model = PointSet::from_coords(&[(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (1.0, 2.0)]);
//! let truth = RigidTransform2d::from_angle(0.5, Vector2::new(2.0, -1.0));
//! let data = model.transformed(&truth);
//! let triangulation = IndexedTriangulation::new(vec![[0, 1, 2], [0, 2, 3]]);
//!
//! let report = register_point_sets(
//!     &model,
//!     &data,
//!     &triangulation,
//!     &KeepAllPruner,
//!     &RegistrationParams::default(),
//! )
//! .unwrap();
//!
//! assert!((report.transform.angle() - 0.5).abs() < 1e-9);
//! assert!(report.mean_residual < 1e-9);
//! ```

use tracing::{debug, info};

use crate::consistency::{ConsistencyParams, ConsistencyPruner};
use crate::error::{AlignError, AlignResult};
use crate::matching::{MatchParams, MatchResult, match_triangles};
use crate::procrustes::{RigidTransform2d, estimate_rigid_transform};
use crate::tracing_ext::{OperationTimer, log_point_set_stats};
use crate::triangulation::Triangulator;
use crate::types::{Correspondence, PointSet, Triangle};

/// Parameters for the full registration pipeline.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RegistrationParams {
    /// Triangle matching stage.
    pub matching: MatchParams,

    /// Pass-through parameters for the consistency pruner.
    pub consistency: ConsistencyParams,
}

impl RegistrationParams {
    /// Create params with default matching and consistency settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the triangle matching threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.matching.threshold = threshold;
        self
    }

    /// Replace the matching parameters.
    pub fn with_matching(mut self, matching: MatchParams) -> Self {
        self.matching = matching;
        self
    }

    /// Replace the consistency parameters.
    pub fn with_consistency(mut self, consistency: ConsistencyParams) -> Self {
        self.consistency = consistency;
        self
    }
}

/// Result of a full registration run.
#[derive(Debug, Clone)]
pub struct RegistrationReport {
    /// The estimated transform; applying it to a model point predicts the
    /// matching data point.
    pub transform: RigidTransform2d,

    /// Triangles produced for the model set.
    pub model_triangles: usize,

    /// Triangles produced for the data set.
    pub data_triangles: usize,

    /// Candidate correspondences emitted by the matcher.
    pub candidates: usize,

    /// Correspondences surviving consistency pruning.
    pub inliers: Vec<Correspondence>,

    /// Mean alignment residual over the inliers.
    pub mean_residual: f64,

    /// Maximum alignment residual over the inliers.
    pub max_residual: f64,
}

impl RegistrationReport {
    /// Number of inlier correspondences used for estimation.
    #[inline]
    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }
}

/// Register `data` against `model`: find the rigid transform such that
/// `transform.apply(model_point) ≈ data_point`.
///
/// # Errors
///
/// - [`AlignError::InsufficientPoints`] when either set has fewer than 3
///   points.
/// - [`AlignError::NoCorrespondences`] when matching or pruning leaves
///   nothing to estimate from.
/// - Any error surfaced by the triangulator, the pruner, or the estimator.
pub fn register_point_sets<T, P>(
    model: &PointSet,
    data: &PointSet,
    triangulator: &T,
    pruner: &P,
    params: &RegistrationParams,
) -> AlignResult<RegistrationReport>
where
    T: Triangulator + ?Sized,
    P: ConsistencyPruner + ?Sized,
{
    let _timer = OperationTimer::with_context("register_point_sets", model.len(), data.len());
    log_point_set_stats(model, "model");
    log_point_set_stats(data, "data");

    if model.len() < 3 {
        return Err(AlignError::insufficient_points("model", model.len()));
    }
    if data.len() < 3 {
        return Err(AlignError::insufficient_points("data", data.len()));
    }

    let model_triangles = triangulator.triangulate(model)?;
    let data_triangles = triangulator.triangulate(data)?;
    debug!(
        target: "cloudmatch::pipeline",
        model_triangles = model_triangles.len(),
        data_triangles = data_triangles.len(),
        "Triangulated both point sets"
    );

    register_triangulated(model, data, &model_triangles, &data_triangles, pruner, params)
}

/// Register two point sets whose triangulations were produced ahead of time
/// (for example loaded from files alongside the points).
///
/// This is the lower layer of [`register_point_sets`]; the same errors apply,
/// except that triangulation has already happened.
pub fn register_triangulated<P>(
    model: &PointSet,
    data: &PointSet,
    model_triangles: &[Triangle],
    data_triangles: &[Triangle],
    pruner: &P,
    params: &RegistrationParams,
) -> AlignResult<RegistrationReport>
where
    P: ConsistencyPruner + ?Sized,
{
    let matches: MatchResult = match_triangles(model_triangles, data_triangles, &params.matching);
    if matches.is_empty() {
        return Err(AlignError::no_correspondences(format!(
            "matching threshold {} accepted no triangle pairs",
            params.matching.threshold
        )));
    }

    let inliers = pruner.prune(&matches.correspondences, model, data, &params.consistency)?;
    if inliers.is_empty() {
        return Err(AlignError::no_correspondences(
            "consistency pruning rejected every candidate",
        ));
    }

    let inlier_result = MatchResult {
        diffs: Vec::new(),
        correspondences: inliers.clone(),
    };
    let (matched_model, matched_data) = inlier_result.matched_points(model, data)?;

    let transform = estimate_rigid_transform(&matched_model, &matched_data)?;

    let mut max_residual = 0.0f64;
    let mut residual_sum = 0.0f64;
    for (pm, pd) in matched_model.iter().zip(matched_data.iter()) {
        let residual = (transform.apply(pm) - pd).norm();
        residual_sum += residual;
        max_residual = max_residual.max(residual);
    }
    let mean_residual = residual_sum / matched_model.len() as f64;

    info!(
        target: "cloudmatch::pipeline",
        candidates = matches.correspondences.len(),
        inliers = inliers.len(),
        mean_residual = format!("{:.3e}", mean_residual),
        "Registration finished"
    );

    Ok(RegistrationReport {
        transform,
        model_triangles: model_triangles.len(),
        data_triangles: data_triangles.len(),
        candidates: matches.correspondences.len(),
        inliers,
        mean_residual,
        max_residual,
    })
}
