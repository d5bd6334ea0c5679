//! A rotation stored as a 3x3 matrix.

use std::fmt;
use std::ops::{Div, DivAssign, Mul, MulAssign};

use glam::{DMat3, DVec3};
use rand::Rng;
use rigid_linalg::rotation::orthonormality_error;

use crate::error::LieError;
use crate::random::random_vec3;
use crate::so3::{self, project_logged};
use crate::tolerance::REPROJECTION_TOLERANCE;

/// A member of SO(3), the rotation `C_ba` taking directions in frame `a` to frame `b`.
///
/// Construction from a raw matrix projects it onto SO(3), and every composition, including the
/// `*` and `/` operators, re-projects when the drift of the product exceeds
/// [`REPROJECTION_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    c_ba: DMat3,
}

impl Rotation {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        c_ba: DMat3::IDENTITY,
    };

    /// Create the identity rotation.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create a rotation from the nearest rotation matrix to `c_ba`.
    pub fn from_matrix(c_ba: &DMat3) -> Self {
        Self {
            c_ba: project_logged(c_ba),
        }
    }

    /// Create a rotation through the exponential map of the axis-angle vector `phi`.
    pub fn from_vec(phi: DVec3) -> Self {
        Self {
            c_ba: so3::exp(phi),
        }
    }

    /// Create a rotation through the exponential map evaluated with `num_terms` series terms,
    /// or the closed form when `num_terms` is `0`.
    pub fn from_vec_with_terms(phi: DVec3, num_terms: u32) -> Self {
        if num_terms == 0 {
            Self::from_vec(phi)
        } else {
            Self::from_matrix(&so3::exp_series(phi, num_terms))
        }
    }

    /// Create a rotation from a slice holding an axis-angle vector.
    ///
    /// # Errors
    ///
    /// [`LieError::DimensionMismatch`] if the slice does not have exactly three elements.
    pub fn try_from_slice(phi: &[f64]) -> Result<Self, LieError> {
        let phi: [f64; 3] = phi.try_into().map_err(|_| LieError::DimensionMismatch {
            expected: 3,
            got: phi.len(),
        })?;
        Ok(Self::from_vec(DVec3::from_array(phi)))
    }

    /// Draw a rotation from the exponential map of a vector uniform in `[-1, 1]³`.
    pub fn from_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_vec(random_vec3(rng))
    }

    /// The rotation matrix `C_ba`.
    pub fn matrix(&self) -> DMat3 {
        self.c_ba
    }

    /// The axis-angle vector of this rotation, with angle in `[0, π]`.
    pub fn vec(&self) -> DVec3 {
        so3::log(&self.c_ba)
    }

    /// The inverse rotation `C_ab`.
    pub fn inverse(&self) -> Self {
        Self {
            c_ba: self.c_ba.transpose(),
        }
    }

    /// The adjoint of a rotation is the rotation matrix itself.
    pub fn adjoint(&self) -> DMat3 {
        self.c_ba
    }

    /// Rotate a direction.
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        self.c_ba * v
    }

    /// The product `self · other`, re-projecting if the result drifted.
    pub fn compose(&self, other: &Self) -> Self {
        let mut product = Self {
            c_ba: self.c_ba * other.c_ba,
        };
        product.reproject(false);
        product
    }

    /// The product `self · other⁻¹`, re-projecting if the result drifted.
    pub fn compose_with_inverse(&self, other: &Self) -> Self {
        let mut product = Self {
            c_ba: self.c_ba * other.c_ba.transpose(),
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

    /// Project the matrix back onto SO(3), always when `force` is set and otherwise only when
    /// the orthonormality error exceeds [`REPROJECTION_TOLERANCE`].
    pub fn reproject(&mut self, force: bool) {
        if force || orthonormality_error(&self.c_ba) > REPROJECTION_TOLERANCE {
            self.c_ba = project_logged(&self.c_ba);
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<&[f64]> for Rotation {
    type Error = LieError;

    fn try_from(phi: &[f64]) -> Result<Self, Self::Error> {
        Self::try_from_slice(phi)
    }
}

impl From<DVec3> for Rotation {
    fn from(phi: DVec3) -> Self {
        Self::from_vec(phi)
    }
}

impl Mul for Rotation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl MulAssign for Rotation {
    fn mul_assign(&mut self, rhs: Self) {
        self.compose_in_place(&rhs);
    }
}

impl Div for Rotation {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.compose_with_inverse(&rhs)
    }
}

impl DivAssign for Rotation {
    fn div_assign(&mut self, rhs: Self) {
        self.compose_with_inverse_in_place(&rhs);
    }
}

impl Mul<DVec3> for Rotation {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.rotate(rhs)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..3 {
            let row = self.c_ba.row(r);
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:>12.6} {:>12.6} {:>12.6}]", row.x, row.y, row.z)?;
        }
        Ok(())
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Rotation {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.c_ba.abs_diff_eq(other.c_ba, epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for Rotation {
    fn default_max_relative() -> Self::Epsilon {
        f64::EPSILON
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.c_ba
            .to_cols_array()
            .iter()
            .zip(other.c_ba.to_cols_array().iter())
            .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{near_equal_axis_angle, near_equal_mat3};
    use rand::{rngs::StdRng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_rotate_quarter_turn() {
        let r = Rotation::from_vec(DVec3::new(0.0, 0.0, FRAC_PI_2));
        assert!((r * DVec3::X).abs_diff_eq(DVec3::Y, EPSILON));
        assert!((r.inverse() * DVec3::Y).abs_diff_eq(DVec3::X, EPSILON));
        assert_eq!(r.adjoint(), r.matrix());
    }

    #[test]
    fn test_try_from_slice() {
        assert!(Rotation::try_from(&[0.1, 0.2, 0.3][..]).is_ok());
        assert_eq!(
            Rotation::try_from_slice(&[0.0; 6]),
            Err(LieError::DimensionMismatch {
                expected: 3,
                got: 6
            })
        );
    }

    #[test]
    fn test_compose_and_divide() {
        let mut rng = StdRng::seed_from_u64(73);
        let r1 = Rotation::from_random(&mut rng);
        let r2 = Rotation::from_random(&mut rng);
        assert!(near_equal_mat3(
            &(r1 * r2).matrix(),
            &(r1.matrix() * r2.matrix()),
            EPSILON
        ));
        assert!(near_equal_mat3(
            &(r1 / r2).matrix(),
            &(r1.matrix() * r2.matrix().transpose()),
            EPSILON
        ));

        let mut r3 = r1;
        r3 *= r2;
        r3 /= r2;
        assert!(near_equal_mat3(&r3.matrix(), &r1.matrix(), EPSILON));
    }

    #[test]
    fn test_vec_roundtrip() {
        let mut rng = StdRng::seed_from_u64(79);
        for _ in 0..10 {
            let phi = random_vec3(&mut rng);
            let r = Rotation::from(phi);
            assert!(near_equal_axis_angle(r.vec(), phi, EPSILON));
            let series = Rotation::from_vec_with_terms(phi, 20);
            assert!(near_equal_mat3(&series.matrix(), &r.matrix(), EPSILON));
        }
    }

    #[test]
    fn test_from_matrix_projects() {
        let noisy = so3::exp(DVec3::new(0.4, 0.1, -0.2)) * 1.001;
        let r = Rotation::from_matrix(&noisy);
        assert!(orthonormality_error(&r.matrix()) < 1e-12);
        assert!(near_equal_mat3(&r.matrix(), &(noisy * (1.0 / 1.001)), EPSILON));
    }

    #[test]
    fn test_operator_chains_stay_orthonormal() {
        let mut step = Rotation::from_vec(DVec3::new(0.013, -0.021, 0.017));
        step.c_ba.y_axis *= 1.0 + 1e-11;

        let mut forward = Rotation::identity();
        let mut backward = Rotation::identity();
        for _ in 0..10_000 {
            forward = forward * step;
            backward = backward / step;
            assert!(orthonormality_error(&forward.matrix()) <= REPROJECTION_TOLERANCE);
            assert!(orthonormality_error(&backward.matrix()) <= REPROJECTION_TOLERANCE);
        }
    }
}
