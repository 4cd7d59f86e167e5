use thiserror::Error as ThisError;

/// Status returned by every public entry point. Never thrown: internal
/// allocation failures and solver faults are converted to a variant here
/// before crossing the API boundary.
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed descriptor, NaN/non-finite input, or an out-of-range value.
    #[error("invalid parameter")]
    InvalidParameter,

    /// Handle is zero, unknown, or was already destroyed.
    #[error("invalid handle")]
    InvalidHandle,

    /// Call made from a context that forbids it (see `ExecutionContext`).
    #[error("invalid execution state for this call")]
    InvalidState,

    /// Entry has outstanding references; retry after release.
    #[error("resource busy")]
    Busy,

    /// Caller-supplied output buffer is smaller than the true result count.
    #[error("buffer too small")]
    BufferTooSmall,

    /// Allocation failed while copying a mesh, building a BVH, or growing
    /// broadphase scratch space.
    #[error("out of memory")]
    OutOfMemory,

    /// No dispatch path exists for the requested operation on this handle.
    #[error("operation not supported for this geometry kind")]
    NotSupported,

    /// Solver invariant violated; should not occur on validated input.
    #[error("internal error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, Error>;
