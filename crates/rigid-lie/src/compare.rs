//! Tolerance comparisons for vectors, matrices and Lie algebra elements.
//!
//! Every comparison is an absolute, component-wise check: `|a − b| ≤ tolerance`. The axis-angle
//! comparisons additionally treat two rotation vectors as equal when they describe the same
//! rotation, since the exponential map is periodic in the angle.

use std::f64::consts::TAU;

use glam::{DMat3, DMat4, DVec3};
use rigid_linalg::mat6::{Mat6, Vec6};

/// Component-wise absolute comparison. Slices of different lengths never compare equal.
pub fn near_equal(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

/// Component-wise absolute comparison of 3x3 matrices.
pub fn near_equal_mat3(a: &DMat3, b: &DMat3, tolerance: f64) -> bool {
    near_equal(&a.to_cols_array(), &b.to_cols_array(), tolerance)
}

/// Component-wise absolute comparison of 4x4 matrices.
pub fn near_equal_mat4(a: &DMat4, b: &DMat4, tolerance: f64) -> bool {
    near_equal(&a.to_cols_array(), &b.to_cols_array(), tolerance)
}

/// Component-wise absolute comparison of 6x6 matrices.
pub fn near_equal_mat6(a: &Mat6, b: &Mat6, tolerance: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(row_a, row_b)| near_equal(row_a, row_b, tolerance))
}

/// Distance from `angle` to the nearest multiple of `2π`.
fn wrapped_distance(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    r.min(TAU - r)
}

/// Compare two axis-angle vectors as rotations.
///
/// They are equal when any of the following holds:
///
/// - the vectors are component-wise within `tolerance`,
/// - both angles are within `tolerance` of zero,
/// - the axes agree and the angles differ by a multiple of `2π`,
/// - the axes are opposite and the angles sum to a multiple of `2π`.
pub fn near_equal_axis_angle(a: DVec3, b: DVec3, tolerance: f64) -> bool {
    if near_equal(&a.to_array(), &b.to_array(), tolerance) {
        return true;
    }

    let angle_a = a.length();
    let angle_b = b.length();
    if angle_a < tolerance && angle_b < tolerance {
        return true;
    }

    // a null rotation has no axis, so the other angle must wrap to zero
    if angle_a < tolerance || angle_b < tolerance {
        return wrapped_distance(angle_a.max(angle_b)) < tolerance;
    }

    let axis_a = a / angle_a;
    let axis_b = b / angle_b;
    if near_equal(&axis_a.to_array(), &axis_b.to_array(), tolerance) {
        return wrapped_distance(angle_a - angle_b) < tolerance;
    }
    if near_equal(&axis_a.to_array(), &(-axis_b).to_array(), tolerance) {
        return wrapped_distance(angle_a + angle_b) < tolerance;
    }
    false
}

/// Compare two se(3) vectors: the translational halves component-wise, the rotational halves
/// with [`near_equal_axis_angle`].
pub fn near_equal_lie_alg(a: &Vec6, b: &Vec6, tolerance: f64) -> bool {
    near_equal(&a[..3], &b[..3], tolerance)
        && near_equal_axis_angle(
            DVec3::from_slice(&a[3..]),
            DVec3::from_slice(&b[3..]),
            tolerance,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_near_equal() {
        assert!(near_equal(&[1.0, 2.0], &[1.0 + 1e-7, 2.0], 1e-6));
        assert!(!near_equal(&[1.0, 2.0], &[1.0 + 1e-5, 2.0], 1e-6));
        assert!(!near_equal(&[1.0, 2.0], &[1.0, 2.0, 3.0], 1.0));
        assert!(near_equal(&[], &[], 0.0));
    }

    #[test]
    fn test_near_equal_matrices() {
        let a = DMat3::from_rotation_x(0.2);
        assert!(near_equal_mat3(&a, &(a + DMat3::from_diagonal(DVec3::splat(1e-9))), 1e-8));
        assert!(!near_equal_mat4(&DMat4::IDENTITY, &DMat4::ZERO, 0.5));

        let mut m = [[0.0; 6]; 6];
        assert!(near_equal_mat6(&m, &m, 0.0));
        m[5][2] = 1e-3;
        assert!(!near_equal_mat6(&m, &[[0.0; 6]; 6], 1e-4));
    }

    #[test]
    fn test_axis_angle_periodicity() {
        let axis = DVec3::new(1.0, 2.0, 2.0) / 3.0;
        let tol = 1e-9;

        assert!(near_equal_axis_angle(axis * 0.5, axis * (0.5 + 2.0 * PI), tol));
        assert!(near_equal_axis_angle(axis * PI, -axis * PI, tol));
        assert!(near_equal_axis_angle(axis * 0.5, -axis * (2.0 * PI - 0.5), tol));
        assert!(near_equal_axis_angle(DVec3::ZERO, axis * (2.0 * PI), tol));
        assert!(near_equal_axis_angle(DVec3::ZERO, DVec3::splat(1e-12), tol));

        assert!(!near_equal_axis_angle(axis * 0.5, axis * 0.6, tol));
        assert!(!near_equal_axis_angle(axis * 0.5, -axis * 0.5, tol));
        assert!(!near_equal_axis_angle(DVec3::ZERO, axis * PI, tol));
        assert!(!near_equal_axis_angle(DVec3::X, DVec3::Y, tol));
    }

    #[test]
    fn test_near_equal_lie_alg() {
        let a = [1.0, 2.0, 3.0, PI, 0.0, 0.0];
        let b = [1.0, 2.0, 3.0, -PI, 0.0, 0.0];
        assert!(near_equal_lie_alg(&a, &b, 1e-9));

        let c = [1.5, 2.0, 3.0, PI, 0.0, 0.0];
        assert!(!near_equal_lie_alg(&a, &c, 1e-9));
    }
}
