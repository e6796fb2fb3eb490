use crate::shape::Shape;

/// All errors that can occur within tensile.
///
/// Every failure is a deterministic input-contract violation detected at the
/// start of the operation that would otherwise break an invariant. None are
/// retried, none produce partial results; callers decide whether they are
/// fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Element counts or paired shapes disagree (e.g. reshape to a shape with
    /// a different product, or matmul inner dimensions).
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Operation requires a specific rank (number of dimensions).
    #[error("rank mismatch: expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Axis argument exceeds the tensor's rank.
    #[error("axis {axis} is out of range for a tensor of rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    /// Index exceeds the extent of its dimension.
    #[error("index {index} is out of range for axis {axis} of size {size}")]
    IndexOutOfRange {
        index: usize,
        axis: usize,
        size: usize,
    },

    /// Shapes are not broadcast-compatible (unequal dimensions, neither 1).
    #[error("cannot broadcast shapes {lhs} and {rhs}")]
    BroadcastError { lhs: Shape, rhs: Shape },
}

/// Convenience Result type used throughout tensile.
pub type Result<T> = std::result::Result<T, Error>;
