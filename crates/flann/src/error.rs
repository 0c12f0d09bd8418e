//! The error taxonomy for this crate.

/// Errors that a `flann` operation can return.
///
/// Traversal budget exhaustion is never reported here: a search that runs out of `checks` simply
/// returns whatever the result set accumulated, per the designed stop condition.
#[derive(Debug, thiserror::Error)]
pub enum FlannError {
    /// A parameter was missing, out of its domain, or incompatible with the chosen algorithm
    /// (e.g. `kdtree` paired with a distance that is not dimensionwise-additive).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam {
        /// The offending parameter's name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A query's, or a loaded index's, dimensionality did not match what was expected.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The dimension the index was built with.
        expected: usize,
        /// The dimension actually supplied.
        found: usize,
    },

    /// A requested size exceeded what the dataset or result set can hold.
    #[error("capacity exceeded: {reason}")]
    CapacityExceeded {
        /// What made the request too large.
        reason: String,
    },

    /// Persisted index data could not be read or written.
    #[error("io failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// A persisted index's header was unreadable: wrong magic, unsupported element type, or an
    /// incompatible major version. A minor version mismatch is a log warning, not this error.
    #[error("corrupted or incompatible index header: {reason}")]
    CorruptHeader {
        /// What about the header was wrong.
        reason: String,
    },

    /// Encoding or decoding the node stream with `bincode` failed.
    #[error("(de)serialization failure: {0}")]
    Codec(#[from] bincode::Error),

    /// The index could not be built: k-means center selection collapsed to fewer than two
    /// distinct points, or some other structural precondition of the build failed.
    #[error("build failed: {reason}")]
    BuildFailure {
        /// What went wrong during the build.
        reason: String,
    },

    /// The requested operation is not implemented for this index variant.
    #[error("operation `{operation}` is not supported by the `{variant}` index")]
    NotSupported {
        /// The requested operation's name.
        operation: &'static str,
        /// The index variant it was requested on.
        variant: &'static str,
    },
}

/// A convenience alias for `Result<T, FlannError>`.
pub type Result<T> = std::result::Result<T, FlannError>;
