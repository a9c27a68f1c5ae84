use thiserror::Error;

/// Unified error type for the grappolo workspace.
///
/// Construction errors and caller sequencing bugs propagate; algorithmic
/// edge cases (empty stores, empty groups, boundary scales) never error and
/// yield empty sequences instead.
#[derive(Debug, Error)]
pub enum GrappoloError {
    /// Invalid input argument, e.g. constructing a cluster without members.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A caller sequencing bug surfaced, e.g. attaching a cluster whose
    /// member no longer exists in the store. Not recovered.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl GrappoloError {
    /// Helper: build an `InvalidArg` error from any message.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build an `Invariant` error from any message.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}
