//! # SO(3) — The Special Orthogonal Group in 3D
//!
//! SO(3) is the group of 3D rotations: 3×3 orthogonal matrices with determinant +1.
//! Rotations are stored directly as [`DMat3`] and the Lie algebra **so(3)** is identified
//! with ℝ³ through the [`hat`] operator. A vector `φ ∈ ℝ³` is an axis-angle rotation:
//! the direction is the rotation axis, the magnitude `θ = ‖φ‖` is the angle in radians.
//!
//! ## The exp/log maps
//!
//! - [`exp`]: `C = cos θ·I + (sin θ/θ)·φ^ + ((1 − cos θ)/θ²)·φφᵀ` (Rodrigues).
//! - [`log`]: inverse of [`exp`] on angles in `[0, π]`.
//!
//! The map is many-to-one: `φ` and `φ + 2πk·φ/θ` give the same rotation, and at `θ = π` the
//! axis sign is ambiguous. [`log`] always returns the representative with `θ ∈ [0, π]`.
//!
//! ## Numerical regimes
//!
//! Both maps have removable `0/0` singularities at `θ = 0`, and the axis extraction in
//! [`log`] degenerates at `θ = π` where `sin θ → 0`. Each formula therefore dispatches on
//! the angle using the thresholds in [`Tolerances`]:
//!
//! | regime | exp | log |
//! |--------|-----|-----|
//! | `θ < small_angle` | `I + φ^ + ½φ^²` | skew part, first order |
//! | generic | Rodrigues | `θ/(2 sin θ)·vee(C − Cᵀ)` |
//! | `π − θ < near_pi` | Rodrigues | axis from the symmetric part `(C + Cᵀ)/2` |
//!
//! ## Jacobians
//!
//! The left Jacobian `J(φ)` couples an increment of `φ` with the corresponding increment of
//! the rotation, and appears in the translation block of the SE(3) exponential map. Its
//! coefficients switch to Taylor expansions below `jacobian_small_angle`.

use glam::{DMat3, DVec3};
use rigid_linalg::rotation::{orthonormality_error, project_to_rotation};

use crate::tolerance::{Tolerances, REPROJECTION_TOLERANCE};

/// Vector space -> Lie algebra: the skew-symmetric cross-product matrix, `hat(a) * b == a × b`.
pub fn hat(v: DVec3) -> DMat3 {
    DMat3::from_cols_array(&[0.0, v.z, -v.y, -v.z, 0.0, v.x, v.y, -v.x, 0.0])
}

/// Lie algebra -> vector space: inverse of [`hat`].
pub fn vee(omega: DMat3) -> DVec3 {
    DVec3::new(omega.y_axis.z, omega.z_axis.x, omega.x_axis.y)
}

/// Outer product `a bᵀ`.
#[inline]
fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// `1 − cos θ` without cancellation for small angles.
#[inline]
fn one_minus_cos(theta: f64) -> f64 {
    let half_sin = (0.5 * theta).sin();
    2.0 * half_sin * half_sin
}

/// Exponential map so(3) -> SO(3) using the closed form and the default [`Tolerances`].
pub fn exp(phi: DVec3) -> DMat3 {
    exp_with_tolerances(phi, &Tolerances::DEFAULT)
}

/// Exponential map so(3) -> SO(3) using the closed form.
///
/// Below `tolerances.small_angle` the truncated series `I + φ^ + ½φ^²` is used instead.
pub fn exp_with_tolerances(phi: DVec3, tolerances: &Tolerances) -> DMat3 {
    let theta_sq = phi.length_squared();
    let theta = theta_sq.sqrt();
    let phi_hat = hat(phi);

    if theta < tolerances.small_angle {
        // using the taylor series expansion of the matrix exponential around 0
        return DMat3::IDENTITY + phi_hat + 0.5 * (phi_hat * phi_hat);
    }

    let (sin_theta, cos_theta) = theta.sin_cos();
    cos_theta * DMat3::IDENTITY
        + (sin_theta / theta) * phi_hat
        + (one_minus_cos(theta) / theta_sq) * outer(phi, phi)
}

/// Exponential map evaluated by summing the matrix exponential series.
///
/// Exactly `num_terms` terms after the identity are added: `Σₖ₌₀..num_terms φ^ᵏ/k!`.
/// Meant to cross-check [`exp`]; the closed form is both faster and more accurate.
pub fn exp_series(phi: DVec3, num_terms: u32) -> DMat3 {
    let phi_hat = hat(phi);
    let mut term = DMat3::IDENTITY;
    let mut rotation = DMat3::IDENTITY;
    for k in 1..=num_terms {
        term = term * phi_hat * (1.0 / k as f64);
        rotation += term;
    }
    rotation
}

/// Exponential map selecting the evaluation mode: `0` for the closed form, otherwise the
/// series with `num_terms` terms.
pub fn exp_with_terms(phi: DVec3, num_terms: u32) -> DMat3 {
    if num_terms == 0 {
        exp(phi)
    } else {
        exp_series(phi, num_terms)
    }
}

/// Logarithmic map SO(3) -> so(3) using the default [`Tolerances`].
pub fn log(rotation: &DMat3) -> DVec3 {
    log_with_tolerances(rotation, &Tolerances::DEFAULT)
}

/// Logarithmic map SO(3) -> so(3).
///
/// The returned vector has angle in `[0, π]`. The angle is `acos((tr(C) − 1)/2)` with the
/// cosine clamped to `[−1, 1]`, evaluated together with the length of the skew part through
/// `atan2` so it keeps full precision near both `0` and `π`.
pub fn log_with_tolerances(rotation: &DMat3, tolerances: &Tolerances) -> DVec3 {
    let c = *rotation;

    // vee of the skew-symmetric part is sin(θ)·axis
    let sin_axis = vee(0.5 * (c - c.transpose()));
    let sin_theta = sin_axis.length();
    let cos_theta = (0.5 * (c.x_axis.x + c.y_axis.y + c.z_axis.z - 1.0)).clamp(-1.0, 1.0);
    let theta = sin_theta.atan2(cos_theta);

    if theta < tolerances.small_angle {
        // θ/sin(θ) ≈ 1 + θ²/6
        return sin_axis * (1.0 + theta * theta / 6.0);
    }

    if std::f64::consts::PI - theta < tolerances.near_pi {
        return log_near_pi(&c, theta, cos_theta, sin_axis);
    }

    sin_axis * (theta / sin_theta)
}

/// Recovers the rotation vector from the symmetric part of `C` when `θ` is close to `π`.
///
/// `(C + Cᵀ)/2 = cos θ·I + (1 − cos θ)·a aᵀ`, so the outer product of the axis with itself
/// is available without dividing by `sin θ`. Its largest diagonal entry fixes one component
/// of the axis, the matching column gives the others, and the skew part resolves the sign.
fn log_near_pi(c: &DMat3, theta: f64, cos_theta: f64, sin_axis: DVec3) -> DVec3 {
    log::trace!("rotation angle {theta} is close to pi, using the symmetric part");

    let symmetric = 0.5 * (*c + c.transpose());
    let axis_outer = (symmetric - cos_theta * DMat3::IDENTITY) * (1.0 / (1.0 - cos_theta));

    let diagonal = DVec3::new(
        axis_outer.x_axis.x,
        axis_outer.y_axis.y,
        axis_outer.z_axis.z,
    );
    let k = if diagonal.x >= diagonal.y && diagonal.x >= diagonal.z {
        0
    } else if diagonal.y >= diagonal.z {
        1
    } else {
        2
    };

    // column k of a·aᵀ is a·a_k, and a_k² ≥ 1/3 for the largest diagonal entry
    let a_k = diagonal[k].max(0.0).sqrt();
    let mut axis = (axis_outer.col(k) / a_k).normalize();
    if axis.dot(sin_axis) < 0.0 {
        axis = -axis;
    }

    axis * theta
}

/// Coefficients `(1 − cos θ)/θ²` and `(θ − sin θ)/θ³` shared by the left and right Jacobians.
fn jacobian_coefficients(theta_sq: f64, tolerances: &Tolerances) -> (f64, f64) {
    let theta = theta_sq.sqrt();
    if theta < tolerances.jacobian_small_angle {
        let theta_4 = theta_sq * theta_sq;
        (
            0.5 - theta_sq / 24.0 + theta_4 / 720.0,
            1.0 / 6.0 - theta_sq / 120.0 + theta_4 / 5040.0,
        )
    } else {
        (
            one_minus_cos(theta) / theta_sq,
            (theta - theta.sin()) / (theta_sq * theta),
        )
    }
}

/// Left Jacobian of SO(3) with the default [`Tolerances`].
pub fn left_jacobian(phi: DVec3) -> DMat3 {
    left_jacobian_with_tolerances(phi, &Tolerances::DEFAULT)
}

/// Left Jacobian of SO(3): `J = I + ((1 − cos θ)/θ²)·φ^ + ((θ − sin θ)/θ³)·φ^²`.
pub fn left_jacobian_with_tolerances(phi: DVec3, tolerances: &Tolerances) -> DMat3 {
    let skew = hat(phi);
    let (a, b) = jacobian_coefficients(phi.length_squared(), tolerances);
    DMat3::IDENTITY + a * skew + b * (skew * skew)
}

/// Left Jacobian evaluated from its series `Σₖ₌₀..num_terms φ^ᵏ/(k+1)!`.
pub fn left_jacobian_series(phi: DVec3, num_terms: u32) -> DMat3 {
    let phi_hat = hat(phi);
    let mut term = DMat3::IDENTITY;
    let mut jacobian = DMat3::IDENTITY;
    for k in 1..=num_terms {
        term = term * phi_hat * (1.0 / (k + 1) as f64);
        jacobian += term;
    }
    jacobian
}

/// Inverse of the left Jacobian of SO(3) with the default [`Tolerances`].
pub fn left_jacobian_inverse(phi: DVec3) -> DMat3 {
    left_jacobian_inverse_with_tolerances(phi, &Tolerances::DEFAULT)
}

/// Inverse of the left Jacobian: `J⁻¹ = I − ½φ^ + (1/θ² − cot(θ/2)/(2θ))·φ^²`.
///
/// The half-angle form stays finite at `θ = π`. The Jacobian itself is singular at
/// `θ = 2π`, which [`log`] never produces.
pub fn left_jacobian_inverse_with_tolerances(phi: DVec3, tolerances: &Tolerances) -> DMat3 {
    let skew = hat(phi);
    let theta_sq = phi.length_squared();
    let theta = theta_sq.sqrt();

    let c = if theta < tolerances.jacobian_small_angle {
        1.0 / 12.0 + theta_sq / 720.0 + theta_sq * theta_sq / 30240.0
    } else {
        let (half_sin, half_cos) = (0.5 * theta).sin_cos();
        1.0 / theta_sq - half_cos / (2.0 * theta * half_sin)
    };

    DMat3::IDENTITY - 0.5 * skew + c * (skew * skew)
}

/// Right Jacobian of SO(3), `J_r(φ) = J(−φ)`.
pub fn right_jacobian(phi: DVec3) -> DMat3 {
    left_jacobian(-phi)
}

/// Inverse of the right Jacobian of SO(3), `J_r⁻¹(φ) = J⁻¹(−φ)`.
pub fn right_jacobian_inverse(phi: DVec3) -> DMat3 {
    left_jacobian_inverse(-phi)
}

/// Nearest rotation to `c`, logging when the projection had to correct it.
pub(crate) fn project_logged(c: &DMat3) -> DMat3 {
    let error = orthonormality_error(c);
    if error > REPROJECTION_TOLERANCE {
        log::debug!("projecting matrix with orthonormality error {error:e} onto SO(3)");
    }
    project_to_rotation(c)
}
