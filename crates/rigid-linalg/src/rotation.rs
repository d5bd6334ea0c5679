//! Projection of arbitrary 3x3 blocks onto the rotation group SO(3).

use glam::{DMat3, DVec3};

use crate::svd::svd3;

/// Largest absolute entry of `AᵀA − I`.
///
/// Zero for an exactly orthonormal matrix.
pub fn orthonormality_error(a: &DMat3) -> f64 {
    let residual = a.transpose() * *a - DMat3::IDENTITY;
    residual
        .to_cols_array()
        .iter()
        .fold(0.0f64, |acc, x| acc.max(x.abs()))
}

/// Nearest rotation matrix to `a` in the Frobenius norm.
///
/// Computes `U · diag(1, 1, det(U)·det(V)) · Vᵀ` from the SVD of `a`, which flips the
/// direction of least stretch whenever `a` contains a reflection. Rank deficient blocks are
/// handled as well; the 3x3 matrix of ones projects onto the identity.
///
/// Example:
///
/// ```
/// use glam::{DMat3, DVec3};
/// use rigid_linalg::rotation::project_to_rotation;
///
/// let noisy = DMat3::from_diagonal(DVec3::new(1.01, 0.98, 1.0));
/// let rotation = project_to_rotation(&noisy);
/// assert!(rotation.abs_diff_eq(DMat3::IDENTITY, 1e-12));
/// ```
pub fn project_to_rotation(a: &DMat3) -> DMat3 {
    let svd = svd3(a);
    let u = *svd.u();
    let v = *svd.v();

    let d = (u.determinant() * v.determinant()).signum();
    let correction = DMat3::from_diagonal(DVec3::new(1.0, 1.0, d));

    u * correction * v.transpose()
}
