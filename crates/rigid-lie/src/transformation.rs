//! A rigid body transformation stored as a rotation block and a translation column.

use std::fmt;
use std::ops::{Div, DivAssign, Mul, MulAssign};

use glam::{DMat3, DMat4, DVec3, DVec4};
use rand::Rng;
use rigid_linalg::mat6::{Mat6, Vec6};
use rigid_linalg::rotation::orthonormality_error;

use crate::error::LieError;
use crate::random::random_vec6;
use crate::se3;
use crate::so3::project_logged;
use crate::tolerance::REPROJECTION_TOLERANCE;

/// A member of SE(3), the transformation `T_ba` taking coordinates in frame `a` to frame `b`.
///
/// The homogeneous matrix is
///
/// ```text
/// T_ba = | C_ba  r_ab_inb |
///        |  0       1     |
/// ```
///
/// where `C_ba` is the rotation from `a` to `b` and `r_ab_inb` the position of `a`'s origin
/// expressed in `b`. The translation from `b` to `a` expressed in `a` is `r_ba_ina = −C_baᵀ·r_ab_inb`.
///
/// Every constructor leaves `C_ba` a proper rotation: raw matrices are projected onto SO(3)
/// and every composition, including the `*` and `/` operators, re-projects once the drift of
/// the product exceeds [`REPROJECTION_TOLERANCE`].
///
/// Example:
///
/// ```
/// use glam::DVec4;
/// use rigid_lie::transformation::Transformation;
///
/// let t_ba = Transformation::from_vec(&[1.0, 0.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2]);
/// let t_ab = t_ba.inverse();
/// let round_trip = t_ab * t_ba;
/// assert!(round_trip.matrix().abs_diff_eq(glam::DMat4::IDENTITY, 1e-12));
///
/// let p_b = t_ba * DVec4::new(1.0, 0.0, 0.0, 1.0);
/// assert!((p_b.w - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    c_ba: DMat3,
    r_ab_inb: DVec3,
}

impl Transformation {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        c_ba: DMat3::IDENTITY,
        r_ab_inb: DVec3::ZERO,
    };

    /// Create the identity transformation.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create a transformation from a homogeneous matrix.
    ///
    /// The rotation block is projected onto SO(3) and the translation column is kept as is.
    /// The bottom row is ignored.
    pub fn from_matrix(matrix: &DMat4) -> Self {
        let mut transform = Self {
            c_ba: DMat3::from_mat4(*matrix),
            r_ab_inb: matrix.w_axis.truncate(),
        };
        transform.reproject(true);
        transform
    }

    /// Create a transformation from a rotation `C_ba` and the translation `r_ba_ina` from `b`
    /// to `a` expressed in `a`. The rotation is projected onto SO(3) first.
    pub fn from_rotation_translation(c_ba: &DMat3, r_ba_ina: DVec3) -> Self {
        let c_ba = project_logged(c_ba);
        Self {
            c_ba,
            r_ab_inb: -(c_ba * r_ba_ina),
        }
    }

    /// Create a transformation through the exponential map of `ξ = [ρ; φ]`.
    pub fn from_vec(xi: &Vec6) -> Self {
        let (c_ba, r_ab_inb) = se3::exp_parts(xi);
        Self { c_ba, r_ab_inb }
    }

    /// Create a transformation through the exponential map evaluated with `num_terms` series
    /// terms, or the closed form when `num_terms` is `0`.
    pub fn from_vec_with_terms(xi: &Vec6, num_terms: u32) -> Self {
        if num_terms == 0 {
            Self::from_vec(xi)
        } else {
            Self::from_matrix(&se3::exp_series(xi, num_terms))
        }
    }

    /// Create a transformation from a slice holding `ξ = [ρ; φ]`.
    ///
    /// # Errors
    ///
    /// [`LieError::DimensionMismatch`] if the slice does not have exactly six elements.
    pub fn try_from_slice(xi: &[f64]) -> Result<Self, LieError> {
        let xi: Vec6 = xi.try_into().map_err(|_| LieError::DimensionMismatch {
            expected: 6,
            got: xi.len(),
        })?;
        Ok(Self::from_vec(&xi))
    }

    /// Draw a transformation from the exponential map of a vector uniform in `[-1, 1]⁶`.
    pub fn from_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_vec(&random_vec6(rng))
    }

    /// The 4x4 homogeneous matrix.
    pub fn matrix(&self) -> DMat4 {
        se3::to_matrix(&self.c_ba, self.r_ab_inb)
    }

    /// The rotation `C_ba`.
    pub fn c_ba(&self) -> DMat3 {
        self.c_ba
    }

    /// The translation column `r_ab_inb`.
    pub fn r_ab_inb(&self) -> DVec3 {
        self.r_ab_inb
    }

    /// The translation `r_ba_ina = −C_baᵀ·r_ab_inb`.
    pub fn r_ba_ina(&self) -> DVec3 {
        -(self.c_ba.transpose() * self.r_ab_inb)
    }

    /// The logarithmic map `ξ = [ρ; φ]` of this transformation, with `‖φ‖ ∈ [0, π]`.
    pub fn vec(&self) -> Vec6 {
        se3::log_parts(&self.c_ba, self.r_ab_inb)
    }

    /// The inverse transformation `T_ab`.
    pub fn inverse(&self) -> Self {
        let c_ab = self.c_ba.transpose();
        Self {
            c_ba: c_ab,
            r_ab_inb: -(c_ab * self.r_ab_inb),
        }
    }

    /// The 6x6 adjoint `Ad(T)`.
    pub fn adjoint(&self) -> Mat6 {
        se3::adjoint_parts(&self.c_ba, self.r_ab_inb)
    }

    /// Apply the transformation to a homogeneous point.
    pub fn transform_point(&self, point: DVec4) -> DVec4 {
        se3::transform_point(&self.matrix(), point)
    }

    /// The product `self · other`, re-projecting the rotation if it drifted.
    pub fn compose(&self, other: &Self) -> Self {
        let mut product = Self {
            c_ba: self.c_ba * other.c_ba,
            r_ab_inb: self.c_ba * other.r_ab_inb + self.r_ab_inb,
        };
        product.reproject(false);
        product
    }

    /// The product `self · other⁻¹`, re-projecting the rotation if it drifted.
    pub fn compose_with_inverse(&self, other: &Self) -> Self {
        let c_ba = self.c_ba * other.c_ba.transpose();
        let mut product = Self {
            c_ba,
            r_ab_inb: self.r_ab_inb - c_ba * other.r_ab_inb,
        };
        product.reproject(false);
        product
    }

    /// Replace `self` with `self · other`.
    pub fn compose_in_place(&mut self, other: &Self) {
        *self = self.compose(other);
    }

    /// Replace `self` with `self · other⁻¹`.
    pub fn compose_with_inverse_in_place(&mut self, other: &Self) {
        *self = self.compose_with_inverse(other);
    }

    /// Project the rotation block back onto SO(3).
    ///
    /// Unless `force` is set, the projection only runs when the orthonormality error exceeds
    /// [`REPROJECTION_TOLERANCE`]. The translation column is left untouched.
    pub fn reproject(&mut self, force: bool) {
        if force || orthonormality_error(&self.c_ba) > REPROJECTION_TOLERANCE {
            self.c_ba = project_logged(&self.c_ba);
        }
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<&[f64]> for Transformation {
    type Error = LieError;

    fn try_from(xi: &[f64]) -> Result<Self, Self::Error> {
        Self::try_from_slice(xi)
    }
}

impl From<&Vec6> for Transformation {
    fn from(xi: &Vec6) -> Self {
        Self::from_vec(xi)
    }
}

impl Mul for Transformation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl MulAssign for Transformation {
    fn mul_assign(&mut self, rhs: Self) {
        self.compose_in_place(&rhs);
    }
}

impl Div for Transformation {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.compose_with_inverse(&rhs)
    }
}

impl DivAssign for Transformation {
    fn div_assign(&mut self, rhs: Self) {
        self.compose_with_inverse_in_place(&rhs);
    }
}

impl Mul<DVec4> for Transformation {
    type Output = DVec4;

    fn mul(self, rhs: DVec4) -> Self::Output {
        self.transform_point(rhs)
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix();
        for r in 0..4 {
            let row = m.row(r);
            if r > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{:>12.6} {:>12.6} {:>12.6} {:>12.6}]",
                row.x, row.y, row.z, row.w
            )?;
        }
        Ok(())
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Transformation {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.matrix().abs_diff_eq(other.matrix(), epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for Transformation {
    fn default_max_relative() -> Self::Epsilon {
        f64::EPSILON
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.matrix()
            .to_cols_array()
            .iter()
            .zip(other.matrix().to_cols_array().iter())
            .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
    }
}
