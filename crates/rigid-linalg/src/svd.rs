//! 3×3 Singular Value Decomposition (SVD) in double precision.
//!
//! The decomposition is needed to project noisy rotation blocks back onto SO(3), where a
//! result accurate to machine precision matters more than raw throughput.
//!
//! # Mathematical Background
//!
//! For any matrix A ∈ ℝ³ˣ³, the SVD decomposes it into three matrices:
//!
//! ```text
//! A = U Σ Vᵀ
//! ```
//!
//! where:
//! * U ∈ ℝ³ˣ³ is an orthogonal matrix (left singular vectors)
//! * Σ ∈ ℝ³ˣ³ is a diagonal matrix of singular values (σ₁ ≥ σ₂ ≥ σ₃ ≥ 0)
//! * V ∈ ℝ³ˣ³ is an orthogonal matrix (right singular vectors)
//!
//! # Implementation Details
//!
//! * V is obtained from a cyclic Jacobi eigenanalysis of the symmetric matrix AᵀA, using
//!   exact Givens angles rather than the fixed-angle approximation common in f32 code.
//! * U is built column by column from A·vᵢ / σᵢ and re-orthogonalised with Gram-Schmidt.
//!   Columns with a negligible singular value are completed from the matching right
//!   singular vector, so rank deficient inputs still yield an orthonormal U.
//!
//! # Example
//!
//! ```
//! use glam::DMat3;
//! use rigid_linalg::svd::svd3;
//!
//! let matrix = DMat3::from_cols_array(&[
//!     1.0, 0.0, 0.0,
//!     0.0, 2.0, 0.0,
//!     0.0, 0.0, 3.0,
//! ]);
//!
//! let svd_result = svd3(&matrix);
//! let u = svd_result.u();
//! let s = svd_result.s();
//! let v = svd_result.v();
//! assert!((*u * *s * v.transpose()).abs_diff_eq(matrix, 1e-12));
//! ```
//!
//! # See also
//!
//! * [`crate::rotation`] for the projection onto SO(3) built on top of this module

use glam::{DMat3, DVec3};

/// Maximum number of cyclic Jacobi sweeps. Three by three matrices converge in far fewer.
const MAX_SWEEPS: usize = 32;

/// Relative size below which a singular value is treated as zero when building U.
const SVD3_RANK_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
/// A simple symmetric 3x3 matrix (contains no storage for (0, 1) (0, 2) and (1, 2))
struct Symmetric3x3 {
    /// The element at row 0, column 0, first diagonal element.
    m_00: f64,

    /// The element at row 1, column 0. equivalent to `m_01`.
    m_10: f64,

    /// The element at row 1, column 1, the second diagonal element.
    m_11: f64,

    /// The element at row 2, column 0. equivalent to `m_02`.
    m_20: f64,

    /// The element at row 2, column 1. equivalent to `m_12`.
    m_21: f64,

    /// The element at row 2, column 2, the third diagonal element.
    m_22: f64,
}

impl Symmetric3x3 {
    /// Reads the lower triangle of a matrix that is assumed symmetric.
    fn from_mat3(mat: &DMat3) -> Self {
        Symmetric3x3 {
            m_00: mat.x_axis.x,
            m_10: mat.x_axis.y,
            m_11: mat.y_axis.y,
            m_20: mat.x_axis.z,
            m_21: mat.y_axis.z,
            m_22: mat.z_axis.z,
        }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        match (row.max(col), row.min(col)) {
            (0, 0) => self.m_00,
            (1, 0) => self.m_10,
            (1, 1) => self.m_11,
            (2, 0) => self.m_20,
            (2, 1) => self.m_21,
            _ => self.m_22,
        }
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        match (row.max(col), row.min(col)) {
            (0, 0) => self.m_00 = value,
            (1, 0) => self.m_10 = value,
            (1, 1) => self.m_11 = value,
            (2, 0) => self.m_20 = value,
            (2, 1) => self.m_21 = value,
            _ => self.m_22 = value,
        }
    }

    fn off_diagonal_norm_sq(&self) -> f64 {
        self.m_10 * self.m_10 + self.m_20 * self.m_20 + self.m_21 * self.m_21
    }

    fn diagonal_norm_sq(&self) -> f64 {
        self.m_00 * self.m_00 + self.m_11 * self.m_11 + self.m_22 * self.m_22
    }

    fn diagonal(&self) -> DVec3 {
        DVec3::new(self.m_00, self.m_11, self.m_22)
    }
}

#[derive(Debug)]
/// Helper struct to store 2 floats to avoid OUT parameters on functions
struct Givens {
    /// The cosine of the angle in the Givens rotation.
    cos_theta: f64,

    /// The sine of the angle in the Givens rotation.
    sin_theta: f64,
}

/// Result of [`svd3`].
#[derive(Debug, Clone, Copy)]
pub struct SVD3Set {
    /// The matrix of left singular vectors.
    u: DMat3,

    /// The diagonal matrix of singular values.
    s: DMat3,

    /// The matrix of right singular vectors.
    v: DMat3,
}

impl SVD3Set {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &DMat3 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat3 {
        &self.v
    }

    /// Singular values in descending order.
    #[inline]
    pub fn singular_values(&self) -> DVec3 {
        DVec3::new(self.s.x_axis.x, self.s.y_axis.y, self.s.z_axis.z)
    }
}

/// Exact Jacobi rotation that annihilates the (p, q) entry of a symmetric matrix.
///
/// See Numerical Recipes, section 11.1. The smaller of the two possible angles is chosen.
#[inline]
fn givens_parameters(s_pp: f64, s_qq: f64, s_pq: f64) -> Givens {
    let theta = (s_qq - s_pp) / (2.0 * s_pq);
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
    };
    let cos_theta = 1.0 / (t * t + 1.0).sqrt();
    Givens {
        cos_theta,
        sin_theta: t * cos_theta,
    }
}

/// Conjugates `s` by the Givens rotation acting on the (p, q) plane and accumulates it in `v`.
fn conjugate(s: &mut Symmetric3x3, v: &mut DMat3, p: usize, q: usize) {
    let s_pq = s.get(p, q);
    if s_pq == 0.0 {
        return;
    }
    let g = givens_parameters(s.get(p, p), s.get(q, q), s_pq);
    let (c, sn) = (g.cos_theta, g.sin_theta);

    // index of the axis left untouched by the rotation
    let r = 3 - p - q;

    let s_pp = s.get(p, p);
    let s_qq = s.get(q, q);
    let s_rp = s.get(r, p);
    let s_rq = s.get(r, q);

    s.set(p, p, c * c * s_pp - 2.0 * sn * c * s_pq + sn * sn * s_qq);
    s.set(q, q, sn * sn * s_pp + 2.0 * sn * c * s_pq + c * c * s_qq);
    s.set(p, q, 0.0);
    s.set(r, p, c * s_rp - sn * s_rq);
    s.set(r, q, sn * s_rp + c * s_rq);

    let v_p = v.col(p);
    let v_q = v.col(q);
    *v.col_mut(p) = c * v_p - sn * v_q;
    *v.col_mut(q) = sn * v_p + c * v_q;
}

/// Eigen-decomposition of a symmetric matrix: returns the eigenvalues and the eigenvectors
/// stored as the columns of an orthonormal matrix, in no particular order.
fn jacobi_eigenanalysis(mut s: Symmetric3x3) -> (DVec3, DMat3) {
    let mut v = DMat3::IDENTITY;
    for _ in 0..MAX_SWEEPS {
        let off_diag_norm_sq = s.off_diagonal_norm_sq();
        if off_diag_norm_sq <= f64::EPSILON * f64::EPSILON * s.diagonal_norm_sq()
            || off_diag_norm_sq < f64::MIN_POSITIVE
        {
            break;
        }
        conjugate(&mut s, &mut v, 0, 1);
        conjugate(&mut s, &mut v, 1, 2);
        conjugate(&mut s, &mut v, 0, 2);
    }
    (s.diagonal(), v)
}

/// Sorts the eigenvalues in descending order and permutes the eigenvectors accordingly
#[inline]
fn sort_eigenpairs(values: &mut DVec3, v: &mut DMat3) {
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        if values[i] < values[j] {
            let tmp = values[i];
            values[i] = values[j];
            values[j] = tmp;

            let col_i = v.col(i);
            *v.col_mut(i) = v.col(j);
            *v.col_mut(j) = col_i;
        }
    }
}

/// Removes from `x` its components along the unit vectors in `basis`.
#[inline]
fn orthogonalize(x: DVec3, basis: &[DVec3]) -> DVec3 {
    basis.iter().fold(x, |acc, b| acc - acc.dot(*b) * *b)
}

/// Any unit vector orthogonal to `x`, which must be a unit vector.
#[inline]
fn any_orthogonal(x: DVec3) -> DVec3 {
    let pick = if x.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    orthogonalize(pick, &[x]).normalize()
}

/// Compute the singular value decomposition of a 3x3 matrix.
///
/// The singular values are sorted in descending order and are non-negative. Both U and V
/// are orthonormal; U has determinant +1 whenever A is rank deficient.
pub fn svd3(a: &DMat3) -> SVD3Set {
    // right singular vectors: eigenvectors of AᵀA
    let ata = a.transpose() * *a;
    let (mut eigenvalues, mut v) = jacobi_eigenanalysis(Symmetric3x3::from_mat3(&ata));
    sort_eigenpairs(&mut eigenvalues, &mut v);

    let sigma = DVec3::new(
        eigenvalues.x.max(0.0).sqrt(),
        eigenvalues.y.max(0.0).sqrt(),
        eigenvalues.z.max(0.0).sqrt(),
    );

    // numerical rank threshold, relative to the largest singular value
    let rank_tol = SVD3_RANK_EPSILON * sigma.x.max(f64::MIN_POSITIVE);

    // left singular vectors u_i = A v_i / σ_i, completed where σ_i vanishes
    let mut u_cols: [DVec3; 2] = [DVec3::ZERO; 2];
    for i in 0..2 {
        let previous = &u_cols[..i];
        let candidate = orthogonalize(*a * v.col(i), previous);
        let length = candidate.length();
        u_cols[i] = if length > rank_tol {
            candidate / length
        } else {
            let fallback = orthogonalize(v.col(i), previous);
            let fallback_length = fallback.length();
            if fallback_length > SVD3_RANK_EPSILON {
                fallback / fallback_length
            } else if i == 0 {
                DVec3::X
            } else {
                any_orthogonal(u_cols[0])
            }
        };
    }
    let mut u_2 = u_cols[0].cross(u_cols[1]);
    if sigma.z > rank_tol && u_2.dot(*a * v.col(2)) < 0.0 {
        u_2 = -u_2;
    }

    let u = DMat3::from_cols(u_cols[0], u_cols[1], u_2);
    let s = DMat3::from_diagonal(sigma);

    SVD3Set { u, s, v }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVD3_EPSILON: f64 = 1e-10;

    /// Helper function to validate all critical SVD properties
    fn verify_svd_properties(a: &DMat3, svd: &SVD3Set, epsilon: f64) {
        let u = svd.u;
        let s = svd.s;
        let v = svd.v;

        // Property 1: Reconstruction (A = U * S * V.T)
        let reconstruction = u * s * v.transpose();
        assert!(
            a.abs_diff_eq(reconstruction, epsilon),
            "Reconstruction failed: A != U*S*V.T\nA:\n{}\nReconstruction:\n{}",
            a,
            reconstruction
        );

        // Property 2: U is Orthogonal (U.T * U = I)
        let u_t_u = u.transpose() * u;
        assert!(
            DMat3::IDENTITY.abs_diff_eq(u_t_u, epsilon),
            "U is not orthogonal: U.T*U != I\nU.T*U:\n{}",
            u_t_u
        );

        // Property 3: V is Orthogonal (V.T * V = I)
        let v_t_v = v.transpose() * v;
        assert!(
            DMat3::IDENTITY.abs_diff_eq(v_t_v, epsilon),
            "V is not orthogonal: V.T*V != I\nV.T*V:\n{}",
            v_t_v
        );

        // Property 4: S is Diagonal, non-negative and sorted
        let s_diag = svd.singular_values();
        assert!(
            s_diag.x >= 0.0 && s_diag.y >= 0.0 && s_diag.z >= 0.0,
            "Singular values are not non-negative: {:?}",
            s_diag
        );
        assert!(
            s_diag.x >= s_diag.y - epsilon && s_diag.y >= s_diag.z - epsilon,
            "Singular values are not sorted: {:?}",
            s_diag
        );
    }

    #[test]
    fn test_svd3_diagonal_sorted() {
        let a = DMat3::from_diagonal(DVec3::new(3.0, 2.0, 1.0));
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result
            .singular_values()
            .abs_diff_eq(DVec3::new(3.0, 2.0, 1.0), SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_diagonal_unsorted() {
        let a = DMat3::from_diagonal(DVec3::new(2.0, 3.0, 1.0));
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result
            .singular_values()
            .abs_diff_eq(DVec3::new(3.0, 2.0, 1.0), SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_zero() {
        let a = DMat3::ZERO;
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result.s.abs_diff_eq(DMat3::ZERO, SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_identity() {
        let a = DMat3::IDENTITY;
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result.s.abs_diff_eq(DMat3::IDENTITY, SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_ones_rank1() {
        let a = DMat3::from_cols(DVec3::ONE, DVec3::ONE, DVec3::ONE);
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, 1e-6);

        let s_diag = svd_result.singular_values();
        assert!((s_diag.x - 3.0).abs() < 1e-12);
        assert!(s_diag.y.abs() < 1e-6);
        assert!(s_diag.z.abs() < 1e-6);
    }

    #[test]
    fn test_svd3_singular_rank1() {
        let a = DMat3::from_cols(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(2.0, 4.0, 6.0),
            DVec3::new(3.0, 6.0, 9.0),
        );
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, 1e-6);

        let s_diag = svd_result.singular_values();
        assert!(s_diag.x > SVD3_EPSILON);
        assert!(s_diag.y.abs() < 1e-6);
        assert!(s_diag.z.abs() < 1e-6);
    }

    #[test]
    fn test_svd3_singular_rank2() {
        let a = DMat3::from_cols(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(4.0, 5.0, 6.0),
            DVec3::new(5.0, 7.0, 9.0), // c0 + c1
        );
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, 1e-6);

        let s_diag = svd_result.singular_values();
        assert!(s_diag.x > SVD3_EPSILON);
        assert!(s_diag.y > SVD3_EPSILON);
        assert!(s_diag.z.abs() < 1e-6);
    }

    #[test]
    fn test_svd3_rotation_matrix() {
        let a = DMat3::from_rotation_y(std::f64::consts::FRAC_PI_4);
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result.singular_values().abs_diff_eq(DVec3::ONE, SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_reflection_matrix() {
        let a = DMat3::from_diagonal(DVec3::new(1.0, -1.0, 1.0));
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result.singular_values().abs_diff_eq(DVec3::ONE, SVD3_EPSILON));
    }

    #[test]
    fn test_svd3_general_full_rank() {
        let a = DMat3::from_cols(
            DVec3::new(1.0, 4.0, 7.0),
            DVec3::new(2.0, 5.0, 8.0),
            DVec3::new(3.0, 6.0, 10.0),
        );
        let svd_result = svd3(&a);
        verify_svd_properties(&a, &svd_result, SVD3_EPSILON);
        assert!(svd_result.singular_values().min_element() > SVD3_EPSILON);
    }

    #[test]
    fn test_jacobi_eigenanalysis_symmetric() {
        let a = DMat3::from_cols(
            DVec3::new(4.0, 1.0, -2.0),
            DVec3::new(1.0, 3.0, 0.5),
            DVec3::new(-2.0, 0.5, 1.0),
        );
        let (values, vectors) = jacobi_eigenanalysis(Symmetric3x3::from_mat3(&a));
        for i in 0..3 {
            let lhs = a * vectors.col(i);
            let rhs = values[i] * vectors.col(i);
            assert!(lhs.abs_diff_eq(rhs, 1e-12));
        }
    }
}
