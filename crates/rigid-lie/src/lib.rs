#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Rigid Lie Groups
//!
//! This crate provides the SO(3) and SE(3) machinery used to represent rotations and rigid
//! body transformations in state estimation: exponential and logarithmic maps, left and right
//! Jacobians, adjoints, and value types that keep their rotation block on the group.
//!
//! ## Conventions
//!
//! - Rotations are active: `C = exp(φ^)` rotates vectors by `‖φ‖` about `φ`.
//! - se(3) vectors are `ξ = [ρ; φ]`, translation first, as `[f64; 6]`.
//! - 6x6 quantities are row-major `[[f64; 6]; 6]`.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec4;
//! use rigid_lie::transformation::Transformation;
//!
//! // Create a transformation from its Lie algebra vector
//! let xi = [1.0, 0.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2];
//! let t_ba = Transformation::from_vec(&xi);
//!
//! // Apply it to a homogeneous point and recover the algebra vector
//! let p_b = t_ba * DVec4::new(0.0, 0.0, 1.0, 1.0);
//! let recovered = t_ba.vec();
//! assert!((recovered[5] - xi[5]).abs() < 1e-12);
//! # let _ = p_b;
//! ```

/// Tolerance comparisons for vectors, matrices and axis-angle rotations.
pub mod compare;

/// Error types.
pub mod error;

/// Uniform random vectors.
pub mod random;

/// The rotation value type.
pub mod rotation;

/// Special Euclidean group SE(3) for 3D rigid transformations.
pub mod se3;

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;

/// Numerical thresholds.
pub mod tolerance;

/// The rigid body transformation value type.
pub mod transformation;

pub use error::LieError;
pub use rigid_linalg::mat6::{Mat6, Vec6};
pub use rotation::Rotation;
pub use tolerance::Tolerances;
pub use transformation::Transformation;
