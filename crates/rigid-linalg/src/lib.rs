#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Module with fixed size 6-vector and 6x6 matrix helpers
pub mod mat6;

/// Module to project 3x3 matrices onto the rotation group
pub mod rotation;

/// Module to calculate SVD of a 3x3 matrix
pub mod svd;
