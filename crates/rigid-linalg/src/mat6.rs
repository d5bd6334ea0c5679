//! Fixed size 6-vector and 6x6 matrix helpers.
//!
//! glam stops at four dimensions, so six dimensional quantities (twists, adjoints and SE(3)
//! Jacobians) are plain row-major arrays assembled from 3x3 blocks.

use glam::DMat3;

/// A 6-vector.
pub type Vec6 = [f64; 6];

/// A row-major 6x6 matrix.
pub type Mat6 = [[f64; 6]; 6];

/// The 6x6 zero matrix.
pub const ZERO6: Mat6 = [[0.0; 6]; 6];

/// The 6x6 identity matrix.
pub fn identity6() -> Mat6 {
    let mut m = ZERO6;
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

/// Assemble a 6x6 matrix from four 3x3 blocks: `[[top_left, top_right], [bottom_left, bottom_right]]`.
pub fn mat6_from_blocks(
    top_left: &DMat3,
    top_right: &DMat3,
    bottom_left: &DMat3,
    bottom_right: &DMat3,
) -> Mat6 {
    let mut m = ZERO6;
    for (block, row0, col0) in [
        (top_left, 0, 0),
        (top_right, 0, 3),
        (bottom_left, 3, 0),
        (bottom_right, 3, 3),
    ] {
        for r in 0..3 {
            for c in 0..3 {
                // glam is column-major: col(c)[r] is the entry at row r, column c
                m[row0 + r][col0 + c] = block.col(c)[r];
            }
        }
    }
    m
}

/// Matrix product `a * b`.
pub fn mat6_mul(a: &Mat6, b: &Mat6) -> Mat6 {
    let mut out = ZERO6;
    for (i, out_row) in out.iter_mut().enumerate() {
        for (j, entry) in out_row.iter_mut().enumerate() {
            *entry = (0..6).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Matrix-vector product `a * x`.
pub fn mat6_mul_vec6(a: &Mat6, x: &Vec6) -> Vec6 {
    let mut out = [0.0; 6];
    for (row, entry) in a.iter().zip(out.iter_mut()) {
        *entry = row.iter().zip(x.iter()).map(|(r, v)| r * v).sum();
    }
    out
}

/// Element-wise sum `a + b`.
pub fn mat6_add(a: &Mat6, b: &Mat6) -> Mat6 {
    let mut out = *a;
    for (out_row, b_row) in out.iter_mut().zip(b.iter()) {
        for (entry, b_entry) in out_row.iter_mut().zip(b_row.iter()) {
            *entry += b_entry;
        }
    }
    out
}

/// Scalar product `s * a`.
pub fn mat6_scale(a: &Mat6, s: f64) -> Mat6 {
    let mut out = *a;
    out.iter_mut().flatten().for_each(|entry| *entry *= s);
    out
}
