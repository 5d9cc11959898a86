//! 2D point-set registration without known correspondences.
//!
//! This crate aligns two planar point clouds ("model" and "data") observed by
//! different agents or sensors. Candidate point correspondences are proposed
//! from local geometric invariants, pruned for mutual consistency, and fed
//! into a closed-form rigid transform estimate:
//!
//! 1. Both clouds are triangulated by an external provider (the
//!    [`Triangulator`] seam; Delaunay construction is out of scope).
//! 2. Every (model, data) triangle pair is compared by a rotation- and
//!    translation-invariant signature: the sorted vertex-to-centroid
//!    distances ([`describe`]). Pairs within a threshold contribute three
//!    candidate correspondences ([`match_triangles`]).
//! 3. The candidate set is pruned to a mutually consistent inlier subset by
//!    an external densest-clique solver (the [`ConsistencyPruner`] seam).
//! 4. The rigid transform is estimated from the inliers by the orthogonal
//!    Procrustes method ([`estimate_rigid_transform`]).
//!
//! The [`association`] module carries the reusable combinatorial primitives
//! for pairwise-scored association problems: the closed-form linear-index to
//! (row, col) pair bijection and bounded top-k selection.
//!
//! # Units and assumptions
//!
//! Coordinates are unit-agnostic, but the matching threshold is expressed in
//! the same unit as the inputs. Triangles must be congruent between the two
//! clouds, not merely similar: the signature is deliberately not scale
//! invariant.
//!
//! # Quick start
//!
//! ```
//! use cloudmatch::{
//!     IndexedTriangulation, KeepAllPruner, PointSet, RegistrationParams, RigidTransform2d,
//!     register_point_sets,
//! };
//! use nalgebra::Vector2;
//!
//! let model = PointSet::from_coords(&[(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (1.0, 2.0)]);
//! let truth = RigidTransform2d::from_angle(0.8, Vector2::new(1.0, -2.0));
//! let data = model.transformed(&truth);
//!
//! // The triangulation comes from an external tool; here it is given as
//! // index triples directly.
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
//! assert!((report.transform.angle() - 0.8).abs() < 1e-9);
//! ```
//!
//! # Error handling
//!
//! Most operations return [`AlignResult`], which is `Result<T, AlignError>`.
//! Errors carry machine-readable `ALIGN-XXXX` codes (see [`ErrorCode`]). A
//! matcher that accepts nothing returns an empty
//! [`MatchResult`] rather than an error; only the full pipeline, which must
//! produce a transform, reports an empty candidate set as
//! [`AlignError::NoCorrespondences`].
//!
//! # Determinism
//!
//! All components are pure functions of their inputs. The triangle matcher
//! parallelizes its pair scan with rayon but collects results in sequential
//! scan order, and any randomized utility takes a caller-seeded generator.

mod descriptor;
mod error;
mod matching;
mod procrustes;
mod types;

pub mod association;
pub mod consistency;
pub mod io;
pub mod pipeline;
pub mod tracing_ext;
pub mod triangulation;

// Re-export core types at crate root
pub use error::{AlignError, AlignResult, ErrorCode};
pub use types::{Correspondence, PointSet, Triangle};

pub use descriptor::{TriangleSignature, describe};
pub use matching::{MatchParams, MatchResult, match_triangles};
pub use procrustes::{
    DEGENERATE_COVARIANCE_EPSILON, RigidTransform2d, estimate_rigid_transform,
};

pub use association::{pair_count, pair_from_linear, pairs, random_scores, top_k_indices};
pub use consistency::{ConsistencyParams, ConsistencyPruner, KeepAllPruner};
pub use io::{load_points, load_triangles, save_points};
pub use pipeline::{
    RegistrationParams, RegistrationReport, register_point_sets, register_triangulated,
};
pub use tracing_ext::{OperationTimer, log_point_set_stats};
pub use triangulation::{IndexedTriangulation, Triangulator};

// Convenience methods on PointSet
impl PointSet {
    /// Load a point set from a comma-separated text file.
    pub fn load(path: impl AsRef<std::path::Path>) -> AlignResult<Self> {
        io::load_points(path.as_ref())
    }

    /// Save the point set to a comma-separated text file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> AlignResult<()> {
        io::save_points(self, path.as_ref())
    }

    /// Register `data` against this set as the model.
    ///
    /// Shorthand for [`register_point_sets`] with default parameters.
    pub fn register_to<T, P>(
        &self,
        data: &PointSet,
        triangulator: &T,
        pruner: &P,
    ) -> AlignResult<RegistrationReport>
    where
        T: Triangulator + ?Sized,
        P: ConsistencyPruner + ?Sized,
    {
        register_point_sets(self, data, triangulator, pruner, &RegistrationParams::default())
    }
}
