//! Error types returned by the Pokemon service.
//!
//! Store failures never reach callers raw: [`ResolverError`] keeps the uniqueness
//! violation (which the caller can fix) apart from everything else (which it cannot),
//! and [`ErrorClass`] tells a request handler which status to answer with.

use thiserror::Error;

use pokedex_core::error::DocumentStoreError;

/// Errors reported by [`PokemonResolver`](crate::resolver::PokemonResolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// No record matched the term or identifier.
    #[error("Pokemon with id, name or no \"{term}\" not found")]
    NotFound { term: String },
    /// A write collided with an existing record on a unique field.
    #[error("Pokemon already exists in db {key}")]
    DuplicateEntry { key: String },
    /// The store failed for a reason the caller cannot act on.
    #[error("Can't {operation} Pokemon - check server logs")]
    StorageFailure { operation: &'static str },
    /// A caller-supplied store identifier is malformed.
    #[error("{value} is not a valid store identifier")]
    InvalidId { value: String },
}

/// Transport-agnostic category of a [`ResolverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    Internal,
}

impl ErrorClass {
    /// HTTP status code conventionally used for this class.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorClass::NotFound => 404,
            ErrorClass::BadRequest => 400,
            ErrorClass::Internal => 500,
        }
    }
}

impl ResolverError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ResolverError::NotFound { .. } => ErrorClass::NotFound,
            ResolverError::DuplicateEntry { .. } | ResolverError::InvalidId { .. } => ErrorClass::BadRequest,
            ResolverError::StorageFailure { .. } => ErrorClass::Internal,
        }
    }

    pub(crate) fn not_found(term: impl Into<String>) -> Self {
        ResolverError::NotFound { term: term.into() }
    }

    /// Classifies a store failure raised while running `operation`.
    ///
    /// Only `DuplicateKey` keeps its detail; every other failure becomes an opaque
    /// `StorageFailure`, so callers must log `err` themselves before discarding it.
    pub(crate) fn from_store(err: &DocumentStoreError, operation: &'static str) -> Self {
        match err {
            DocumentStoreError::DuplicateKey { key, .. } => ResolverError::DuplicateEntry { key: key.clone() },
            _ => ResolverError::StorageFailure { operation },
        }
    }
}

/// A specialized `Result` type for Pokemon service operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
