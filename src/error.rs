//! Error types for ranking-function operations.

use thiserror::Error;

/// Error variants for ranking operations.
///
/// The enum is `Clone + PartialEq` because a failed suspension stores its
/// error and must hand back an observably identical error on every
/// subsequent force.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument was outside its domain (null handle, bad cast, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A finite rank was requested above the representable maximum (2^63 - 1).
    #[error("rank value {0} exceeds the finite maximum")]
    RankOutOfRange(u64),

    /// Rank addition overflowed the finite range.
    #[error("rank addition overflow")]
    RankOverflow,

    /// Rank subtraction would have produced a negative rank.
    #[error("rank subtraction underflow")]
    RankUnderflow,

    /// A finite value was requested from an infinite rank, or an infinite
    /// rank was used where only finite ranks are defined.
    #[error("rank is not finite")]
    NotFinite,

    /// An operation needed a capability the value type does not have,
    /// e.g. equality on an erased type with no registered comparator.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A user-supplied closure or callback reported a failure. The error is
    /// stored by the suspension that ran the closure and re-surfaced
    /// verbatim on every later force.
    #[error("callback failed: {0}")]
    Callback(String),

    /// A caller-provided buffer was too small for the requested prefix
    /// (C interface only).
    #[error("insufficient buffer: need {needed}, have {capacity}")]
    InsufficientBuffer {
        /// Number of slots the call required.
        needed: usize,
        /// Number of slots the caller provided.
        capacity: usize,
    },
}

impl Error {
    /// Build a [`Error::Callback`] from any displayable reason.
    pub fn callback(reason: impl std::fmt::Display) -> Self {
        Error::Callback(reason.to_string())
    }

    /// Build a [`Error::InvalidArgument`] from any displayable reason.
    pub fn invalid(reason: impl std::fmt::Display) -> Self {
        Error::InvalidArgument(reason.to_string())
    }
}

/// A specialized Result type for ranking operations.
pub type Result<T> = std::result::Result<T, Error>;
