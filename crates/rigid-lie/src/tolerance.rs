//! Angle thresholds selecting between the closed forms and their Taylor expansions.

/// Orthonormality error of the rotation block above which an in-place composition re-projects its
/// rotation block.
pub const REPROJECTION_TOLERANCE: f64 = 1e-10;

/// Angle thresholds (radians) for the numerical regimes of the SO(3) and SE(3) maps.
///
/// The defaults are accurate to full double precision. Larger values trade accuracy for
/// fewer trigonometric evaluations; smaller values risk cancellation in the closed forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Below this angle `exp` and `log` use their first order expansions.
    pub small_angle: f64,
    /// Below this angle the Jacobian coefficients use their Taylor expansions.
    pub jacobian_small_angle: f64,
    /// `log` switches to the symmetric part extraction when `π − θ` is below this value.
    pub near_pi: f64,
}

impl Tolerances {
    /// The default thresholds.
    pub const DEFAULT: Self = Self {
        small_angle: 1e-6,
        jacobian_small_angle: 1e-4,
        near_pi: 1e-3,
    };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::DEFAULT
    }
}
