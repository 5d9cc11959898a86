//! Rigid transform estimation via the orthogonal Procrustes method.
//!
//! Given two matched point sets of equal length, [`estimate_rigid_transform`]
//! computes the rotation and translation minimizing the summed squared
//! alignment error (Kabsch-style): centroids are removed, the 2x2
//! cross-covariance is decomposed by SVD, and the rotation is sign-corrected
//! so that it is always proper (no reflection).
//!
//! # Example
//!
//! ```
//! use cloudmatch::estimate_rigid_transform;
//! use nalgebra::{Point2, Vector2};
//!
//! let model = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! // Data is the model translated by (2, -1).
//! let data: Vec<_> = model.iter().map(|p| p + Vector2::new(2.0, -1.0)).collect();
//!
//! let tf = estimate_rigid_transform(&model, &data).unwrap();
//! assert!((tf.translation - Vector2::new(2.0, -1.0)).norm() < 1e-9);
//! ```

use nalgebra::{Matrix2, Matrix3, Point2, Rotation2, Vector2};
use tracing::debug;

use crate::error::{AlignError, AlignResult};

/// Cross-covariance Frobenius norms below this are rejected as degenerate.
pub const DEGENERATE_COVARIANCE_EPSILON: f64 = 1e-12;

/// A rigid transformation in the plane: a proper rotation plus a translation.
///
/// Applying the transform to a model point predicts its matched data point:
/// `data ≈ R * model + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform2d {
    /// Rotation component (determinant +1 by construction).
    pub rotation: Rotation2<f64>,
    /// Translation component.
    pub translation: Vector2<f64>,
}

impl Default for RigidTransform2d {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform2d {
    /// Create an identity transformation.
    pub fn identity() -> Self {
        Self {
            rotation: Rotation2::identity(),
            translation: Vector2::zeros(),
        }
    }

    /// Create a transformation from a rotation angle (radians) and translation.
    pub fn from_angle(angle: f64, translation: Vector2<f64>) -> Self {
        Self {
            rotation: Rotation2::new(angle),
            translation,
        }
    }

    /// Create a pure translation.
    pub fn from_translation(translation: Vector2<f64>) -> Self {
        Self {
            rotation: Rotation2::identity(),
            translation,
        }
    }

    /// Rotation angle in radians, in `(-PI, PI]`.
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Apply the transformation to a point.
    #[inline]
    pub fn apply(&self, point: &Point2<f64>) -> Point2<f64> {
        self.rotation * point + self.translation
    }

    /// Compose with another transformation (self applied first, then other).
    pub fn then(&self, other: &RigidTransform2d) -> RigidTransform2d {
        RigidTransform2d {
            rotation: other.rotation * self.rotation,
            translation: other.rotation * self.translation + other.translation,
        }
    }

    /// Get the inverse transformation.
    pub fn inverse(&self) -> RigidTransform2d {
        let inv_rotation = self.rotation.inverse();
        RigidTransform2d {
            rotation: inv_rotation,
            translation: inv_rotation * (-self.translation),
        }
    }

    /// Convert to a 3x3 homogeneous transformation matrix.
    pub fn to_homogeneous(&self) -> Matrix3<f64> {
        let r = self.rotation.matrix();
        let mut result = Matrix3::identity();
        for i in 0..2 {
            for j in 0..2 {
                result[(i, j)] = r[(i, j)];
            }
            result[(i, 2)] = self.translation[i];
        }
        result
    }
}

/// Estimate the rigid transformation mapping `model` onto `data`.
///
/// Both slices must have the same length and pair up index-by-index. A single
/// correspondence (or a fully collapsed configuration) leaves the rotation
/// underdetermined; such inputs produce a zero cross-covariance and are
/// rejected as [`AlignError::DegenerateTransform`] rather than silently
/// resolved. Ties between singular values of a nonzero covariance are not
/// special-cased; the SVD's choice stands.
///
/// # Errors
///
/// - [`AlignError::MismatchedLengths`] when the slices differ in length.
/// - [`AlignError::NoCorrespondences`] when the slices are empty.
/// - [`AlignError::DegenerateTransform`] when the cross-covariance norm falls
///   below [`DEGENERATE_COVARIANCE_EPSILON`].
pub fn estimate_rigid_transform(
    model: &[Point2<f64>],
    data: &[Point2<f64>],
) -> AlignResult<RigidTransform2d> {
    if model.len() != data.len() {
        return Err(AlignError::mismatched_lengths(model.len(), data.len()));
    }
    if model.is_empty() {
        return Err(AlignError::no_correspondences(
            "estimator called with empty point sets",
        ));
    }

    let n = model.len() as f64;
    let centroid_model: Vector2<f64> = model.iter().map(|p| p.coords).sum::<Vector2<f64>>() / n;
    let centroid_data: Vector2<f64> = data.iter().map(|p| p.coords).sum::<Vector2<f64>>() / n;

    // Cross-covariance of the centered sets.
    let mut h = Matrix2::zeros();
    for (pm, pd) in model.iter().zip(data.iter()) {
        h += (pm.coords - centroid_model) * (pd.coords - centroid_data).transpose();
    }

    let h_norm = h.norm();
    if h_norm < DEGENERATE_COVARIANCE_EPSILON {
        return Err(AlignError::DegenerateTransform {
            norm: h_norm,
            epsilon: DEGENERATE_COVARIANCE_EPSILON,
        });
    }

    let svd = h.svd(true, true);
    let u = svd.u.expect("2x2 SVD with compute_u always yields U");
    let v_t = svd.v_t.expect("2x2 SVD with compute_v always yields V^T");

    let mut r = v_t.transpose() * u.transpose();

    // A negative determinant means the best orthogonal fit is a reflection;
    // flipping the second column restores a proper rotation.
    if r.determinant() < 0.0 {
        r.set_column(1, &(-r.column(1)));
    }

    let rotation = Rotation2::from_matrix_unchecked(r);
    let translation = centroid_data - rotation * centroid_model;

    debug!(
        target: "cloudmatch::estimate",
        matches = model.len(),
        angle_deg = format!("{:.3}", rotation.angle().to_degrees()),
        tx = format!("{:.4}", translation.x),
        ty = format!("{:.4}", translation.y),
        "Estimated rigid transform"
    );

    Ok(RigidTransform2d {
        rotation,
        translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_3;

    fn sample_model() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.5, 1.5),
            Point2::new(-1.0, 0.5),
        ]
    }

    #[test]
    fn test_identity_recovery() {
        let model = sample_model();
        let tf = estimate_rigid_transform(&model, &model).unwrap();
        assert!(tf.angle().abs() < 1e-12);
        assert!(tf.translation.norm() < 1e-12);
    }

    #[test]
    fn test_known_transform_recovery() {
        let model = sample_model();
        let truth = RigidTransform2d::from_angle(FRAC_PI_3, Vector2::new(4.0, -2.5));
        let data: Vec<_> = model.iter().map(|p| truth.apply(p)).collect();

        let tf = estimate_rigid_transform(&model, &data).unwrap();
        assert!((tf.angle() - FRAC_PI_3).abs() < 1e-9);
        assert!((tf.translation - truth.translation).norm() < 1e-9);

        // Every model point must land on its data point.
        for (pm, pd) in model.iter().zip(data.iter()) {
            assert!((tf.apply(pm) - pd).norm() < 1e-9);
        }
    }

    #[test]
    fn test_reflection_is_rejected() {
        // Mirrored data would be best fit by a reflection; the estimator must
        // still return a proper rotation.
        let model = sample_model();
        let data: Vec<_> = model.iter().map(|p| Point2::new(-p.x, p.y)).collect();

        let tf = estimate_rigid_transform(&model, &data).unwrap();
        assert!(tf.rotation.matrix().determinant() > 0.0);
        assert!((tf.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mismatched_lengths() {
        let model = sample_model();
        let err = estimate_rigid_transform(&model, &model[..3]).unwrap_err();
        assert!(matches!(
            err,
            AlignError::MismatchedLengths { model: 5, data: 3 }
        ));
    }

    #[test]
    fn test_empty_input() {
        let err = estimate_rigid_transform(&[], &[]).unwrap_err();
        assert!(matches!(err, AlignError::NoCorrespondences { .. }));
    }

    #[test]
    fn test_single_match_is_degenerate() {
        let model = vec![Point2::new(1.0, 2.0)];
        let data = vec![Point2::new(3.0, 4.0)];
        let err = estimate_rigid_transform(&model, &data).unwrap_err();
        assert!(matches!(err, AlignError::DegenerateTransform { .. }));
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let model = vec![Point2::new(1.0, 1.0); 4];
        let data = vec![Point2::new(5.0, -3.0); 4];
        let err = estimate_rigid_transform(&model, &data).unwrap_err();
        assert!(matches!(err, AlignError::DegenerateTransform { .. }));
    }

    #[test]
    fn test_compose_and_inverse() {
        let a = RigidTransform2d::from_angle(0.7, Vector2::new(1.0, 2.0));
        let b = RigidTransform2d::from_angle(-0.3, Vector2::new(-4.0, 0.5));

        let p = Point2::new(2.5, -1.5);
        let via_compose = a.then(&b).apply(&p);
        let via_sequence = b.apply(&a.apply(&p));
        assert!((via_compose - via_sequence).norm() < 1e-12);

        let round_trip = a.inverse().apply(&a.apply(&p));
        assert!((round_trip - p).norm() < 1e-12);
    }

    #[test]
    fn test_homogeneous_matrix() {
        let tf = RigidTransform2d::from_angle(0.4, Vector2::new(3.0, -1.0));
        let m = tf.to_homogeneous();

        let p = Point2::new(1.5, 2.5);
        let homogeneous = nalgebra::Vector3::new(p.x, p.y, 1.0);
        let expected = tf.apply(&p);
        let via_matrix = m * homogeneous;

        assert!((via_matrix.x - expected.x).abs() < 1e-12);
        assert!((via_matrix.y - expected.y).abs() < 1e-12);
        assert!((m[(2, 2)] - 1.0).abs() < f64::EPSILON);
    }
}
