//! Error types returned by [`crate::GeneralSolver`].
//!
//! Every fallible entry point returns `Result<_, SolverError>`. The variants
//! mirror the five error kinds a caller can actually cause (or, in the case
//! of `Internal`, a bug in this crate): bad configuration, a malformed
//! topology, a malformed problem, calling `solution` before `problem`, or an
//! invariant violation.

use thiserror::Error;

/// Everything that can go wrong while configuring or driving a
/// [`crate::GeneralSolver`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A bad value was given for a named configuration attribute, an
    /// unknown attribute name was used, or two configured names collide
    /// (e.g. an allowed-symbol-set name equal to an alphabet token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The topology is internally fine but cannot support the current
    /// alphabet (its largest set needs more non-empty symbols than the
    /// alphabet provides).
    #[error("topology error: {0}")]
    Topology(String),

    /// The problem string doesn't match the topology, or places the same
    /// symbol twice in one set.
    #[error("problem error: {0}")]
    Problem(String),

    /// A method was called out of order, e.g. `solution` before `problem`.
    #[error("usage error: {0}")]
    Usage(String),

    /// An invariant that this crate is responsible for maintaining was
    /// violated. This should be unreachable; seeing it means there is a
    /// bug in the engine, not in the caller's input.
    #[error("internal error (this is a bug): {0}")]
    Internal(String),
}

impl SolverError {
    pub(crate) fn configuration(msg: impl Into<String>) -> SolverError {
        SolverError::Configuration(msg.into())
    }

    pub(crate) fn topology(msg: impl Into<String>) -> SolverError {
        SolverError::Topology(msg.into())
    }

    pub(crate) fn problem(msg: impl Into<String>) -> SolverError {
        SolverError::Problem(msg.into())
    }

    pub(crate) fn usage(msg: impl Into<String>) -> SolverError {
        SolverError::Usage(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> SolverError {
        SolverError::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
