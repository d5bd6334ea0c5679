/// Errors raised when building group elements from raw slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LieError {
    /// The slice length does not match the dimension of the Lie algebra.
    #[error("algebra vector must have {expected} components, got {got}")]
    DimensionMismatch {
        /// Dimension of the algebra.
        expected: usize,
        /// Length of the slice that was passed.
        got: usize,
    },
}
