//! # SE(3) — The Special Euclidean Group in 3D
//!
//! SE(3) is the group of rigid body transformations: a rotation `C ∈ SO(3)` followed by a
//! translation `t ∈ ℝ³`, written as the homogeneous matrix
//!
//! ```text
//! T = | C  t |
//!     | 0  1 |
//! ```
//!
//! The Lie algebra **se(3)** is identified with ℝ⁶ by stacking the translational part first:
//! `ξ = [ρ; φ]` with `ρ = ξ[0..3]` and `φ = ξ[3..6]` (an axis-angle vector).
//!
//! ## The exp/log maps
//!
//! The exponential map factors into the SO(3) map and its left Jacobian:
//!
//! ```text
//! exp(ξ) = | exp(φ)  J(φ)ρ |      log(T) = [ J⁻¹(φ)t ; φ ],  φ = log(C)
//!          |   0       1   |
//! ```
//!
//! so [`exp`] and [`exp_series`] agree term by term with `Σ ξ^ᵏ/k!`.
//!
//! ## Adjoint and Jacobians
//!
//! [`adjoint`] maps algebra vectors through a conjugation, `T·ξ^·T⁻¹ = (Ad(T)·ξ)^`. The
//! SE(3) left Jacobian reuses the SO(3) one on its diagonal and couples the two halves
//! through the `Q(ρ, φ)` block.

use glam::{DMat3, DMat4, DVec3, DVec4};
use rigid_linalg::mat6::{
    identity6, mat6_add, mat6_from_blocks, mat6_mul, mat6_scale, Mat6, Vec6,
};

use crate::so3;
use crate::tolerance::Tolerances;

/// Below this angle the `Q` block coefficients are evaluated by their Taylor expansions.
const Q_SERIES_ANGLE: f64 = 0.1;

/// Split an algebra vector into its translational and rotational halves `(ρ, φ)`.
#[inline]
pub fn split(xi: &Vec6) -> (DVec3, DVec3) {
    (
        DVec3::new(xi[0], xi[1], xi[2]),
        DVec3::new(xi[3], xi[4], xi[5]),
    )
}

/// Stack the translational and rotational halves into `[ρ; φ]`.
#[inline]
pub fn join(rho: DVec3, phi: DVec3) -> Vec6 {
    [rho.x, rho.y, rho.z, phi.x, phi.y, phi.z]
}

/// Assemble a homogeneous matrix from a rotation block and a translation column.
pub fn to_matrix(rotation: &DMat3, translation: DVec3) -> DMat4 {
    DMat4::from_cols(
        rotation.x_axis.extend(0.0),
        rotation.y_axis.extend(0.0),
        rotation.z_axis.extend(0.0),
        translation.extend(1.0),
    )
}

/// Vector space -> Lie algebra: `ξ^ = [[φ^, ρ], [0, 0]]`.
pub fn hat(xi: &Vec6) -> DMat4 {
    let (rho, phi) = split(xi);
    let phi_hat = so3::hat(phi);
    DMat4::from_cols(
        phi_hat.x_axis.extend(0.0),
        phi_hat.y_axis.extend(0.0),
        phi_hat.z_axis.extend(0.0),
        rho.extend(0.0),
    )
}

/// Lie algebra -> vector space: inverse of [`hat`]. The bottom row is ignored.
pub fn vee(xi_hat: &DMat4) -> Vec6 {
    let rho = xi_hat.w_axis.truncate();
    let phi = so3::vee(DMat3::from_mat4(*xi_hat));
    join(rho, phi)
}

/// The 6x6 "curly hat" operator `ξ⋏ = [[φ^, ρ^], [0, φ^]]`, the adjoint of the algebra.
pub fn curlyhat(xi: &Vec6) -> Mat6 {
    let (rho, phi) = split(xi);
    let phi_hat = so3::hat(phi);
    mat6_from_blocks(&phi_hat, &so3::hat(rho), &DMat3::ZERO, &phi_hat)
}

/// The 4x6 matrix `p⊙ = [[w·I, −p^], [0, 0]]` such that `ξ^·p = p⊙·ξ` for a homogeneous point
/// `p = [p; w]`. Row-major.
pub fn point_to_fs(point: DVec4) -> [[f64; 6]; 4] {
    let skew = so3::hat(point.truncate());
    let mut out = [[0.0; 6]; 4];
    for (r, row) in out.iter_mut().take(3).enumerate() {
        row[r] = point.w;
        for c in 0..3 {
            row[3 + c] = -skew.col(c)[r];
        }
    }
    out
}

/// Exponential map se(3) -> SE(3) returned as `(C, t)` with the default [`Tolerances`].
pub fn exp_parts(xi: &Vec6) -> (DMat3, DVec3) {
    exp_parts_with_tolerances(xi, &Tolerances::DEFAULT)
}

/// Exponential map se(3) -> SE(3) returned as `(C, t)`: `C = exp(φ)`, `t = J(φ)ρ`.
pub fn exp_parts_with_tolerances(xi: &Vec6, tolerances: &Tolerances) -> (DMat3, DVec3) {
    let (rho, phi) = split(xi);
    let rotation = so3::exp_with_tolerances(phi, tolerances);
    let translation = so3::left_jacobian_with_tolerances(phi, tolerances) * rho;
    (rotation, translation)
}

/// Exponential map se(3) -> SE(3) as a homogeneous matrix.
pub fn exp(xi: &Vec6) -> DMat4 {
    let (rotation, translation) = exp_parts(xi);
    to_matrix(&rotation, translation)
}

/// Exponential map evaluated by summing `Σₖ₌₀..num_terms ξ^ᵏ/k!`.
pub fn exp_series(xi: &Vec6, num_terms: u32) -> DMat4 {
    let xi_hat = hat(xi);
    let mut term = DMat4::IDENTITY;
    let mut transform = DMat4::IDENTITY;
    for k in 1..=num_terms {
        term = term * xi_hat * (1.0 / k as f64);
        transform += term;
    }
    transform
}

/// Exponential map selecting the evaluation mode: `0` for the closed form, otherwise the
/// series with `num_terms` terms.
pub fn exp_with_terms(xi: &Vec6, num_terms: u32) -> DMat4 {
    if num_terms == 0 {
        exp(xi)
    } else {
        exp_series(xi, num_terms)
    }
}

/// Logarithmic map SE(3) -> se(3) from a rotation block and translation column.
pub fn log_parts(rotation: &DMat3, translation: DVec3) -> Vec6 {
    let phi = so3::log(rotation);
    let rho = so3::left_jacobian_inverse(phi) * translation;
    join(rho, phi)
}

/// Logarithmic map SE(3) -> se(3). The bottom row of `transform` is ignored.
pub fn log(transform: &DMat4) -> Vec6 {
    log_parts(&DMat3::from_mat4(*transform), transform.w_axis.truncate())
}

/// Adjoint `[[C, t^C], [0, C]]` from a rotation block and translation column.
pub fn adjoint_parts(rotation: &DMat3, translation: DVec3) -> Mat6 {
    mat6_from_blocks(
        rotation,
        &(so3::hat(translation) * *rotation),
        &DMat3::ZERO,
        rotation,
    )
}

/// Adjoint of a homogeneous transform.
pub fn adjoint(transform: &DMat4) -> Mat6 {
    adjoint_parts(
        &DMat3::from_mat4(*transform),
        transform.w_axis.truncate(),
    )
}

/// Apply a homogeneous transform to a homogeneous point.
pub fn transform_point(transform: &DMat4, point: DVec4) -> DVec4 {
    *transform * point
}

/// The `Q(ρ, φ)` block coupling rotation and translation in the SE(3) Jacobian.
fn q_block(rho: DVec3, phi: DVec3) -> DMat3 {
    let theta_sq = phi.length_squared();
    let theta = theta_sq.sqrt();

    let rx = so3::hat(rho);
    let px = so3::hat(phi);
    let pxrx = px * rx;
    let rxpx = rx * px;
    let pxrxpx = pxrx * px;

    let (m1, m2, m3) = if theta < Q_SERIES_ANGLE {
        let theta_4 = theta_sq * theta_sq;
        (
            1.0 / 6.0 - theta_sq / 120.0 + theta_4 / 5040.0,
            1.0 / 24.0 - theta_sq / 720.0 + theta_4 / 40320.0,
            1.0 / 120.0 - theta_sq / 2520.0 + theta_4 / 120960.0,
        )
    } else {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let theta_3 = theta_sq * theta;
        (
            (theta - sin_theta) / theta_3,
            (theta_sq + 2.0 * cos_theta - 2.0) / (2.0 * theta_sq * theta_sq),
            (2.0 * theta - 3.0 * sin_theta + theta * cos_theta) / (2.0 * theta_3 * theta_sq),
        )
    };

    0.5 * rx
        + m1 * (pxrx + rxpx + pxrxpx)
        + m2 * (px * pxrx + rxpx * px - 3.0 * pxrxpx)
        + m3 * (pxrxpx * px + px * pxrxpx)
}

/// Left Jacobian of SE(3): `[[J(φ), Q(ρ, φ)], [0, J(φ)]]`.
pub fn left_jacobian(xi: &Vec6) -> Mat6 {
    let (rho, phi) = split(xi);
    let j = so3::left_jacobian(phi);
    mat6_from_blocks(&j, &q_block(rho, phi), &DMat3::ZERO, &j)
}

/// Inverse of the left Jacobian of SE(3): `[[J⁻¹, −J⁻¹QJ⁻¹], [0, J⁻¹]]`.
pub fn left_jacobian_inverse(xi: &Vec6) -> Mat6 {
    let (rho, phi) = split(xi);
    let j_inv = so3::left_jacobian_inverse(phi);
    let coupling = -(j_inv * q_block(rho, phi) * j_inv);
    mat6_from_blocks(&j_inv, &coupling, &DMat3::ZERO, &j_inv)
}

/// Left Jacobian evaluated from its series `Σₖ₌₀..num_terms (ξ⋏)ᵏ/(k+1)!`.
pub fn left_jacobian_series(xi: &Vec6, num_terms: u32) -> Mat6 {
    let xi_curly = curlyhat(xi);
    let mut term = identity6();
    let mut jacobian = identity6();
    for k in 1..=num_terms {
        term = mat6_scale(&mat6_mul(&term, &xi_curly), 1.0 / (k + 1) as f64);
        jacobian = mat6_add(&jacobian, &term);
    }
    jacobian
}
