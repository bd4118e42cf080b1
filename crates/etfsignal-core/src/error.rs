use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors exposed by `etfsignal-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("fund code cannot be empty")]
    EmptyFundCode,
    #[error("fund code must be {expected} digits, got {len}")]
    FundCodeLength { len: usize, expected: usize },
    #[error("fund code contains non-digit character '{ch}' at index {index}")]
    FundCodeInvalidChar { ch: char, index: usize },

    #[error("date must be ISO YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,
}

/// Classification of a provider fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Network-level trouble (timeout, connect, 5xx); worth retrying.
    Transient,
    /// The provider does not know this fund; retrying cannot help.
    NotFound,
    /// The provider answered, but with a payload we cannot use.
    InvalidResponse,
}

/// Structured per-fund fetch error.
///
/// One fund's fetch failure is reported to the orchestrator as a value, never
/// raised across the batch; only the kind decides whether the retry policy
/// re-attempts the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Transient)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transient => "fetch.transient",
            FetchErrorKind::NotFound => "fetch.not_found",
            FetchErrorKind::InvalidResponse => "fetch.invalid_response",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Batch-level failures from the orchestrator.
///
/// Per-fund failures stay inside the run report; only these terminate a run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("fund universe is empty")]
    EmptyUniverse,

    #[error("all {attempted} funds failed; first failure: {first_reason}")]
    AllFundsFailed {
        attempted: usize,
        first_reason: String,
    },
}
