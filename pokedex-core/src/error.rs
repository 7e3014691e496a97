//! Error types and result types for document store operations.
//!
//! Every backend reports failures through [`DocumentStoreError`]. Callers that need to
//! tell uniqueness violations apart from everything else match on
//! [`DocumentStoreError::DuplicateKey`] or use [`DocumentStoreError::is_duplicate_key`].

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A write would violate a unique index of the collection.
    ///
    /// `key` describes the colliding field and value, e.g. `name: "pikachu"`.
    #[error("Duplicate key in collection {collection}: {key}")]
    DuplicateKey {
        collection: String,
        key: String,
    },
    /// The document violates schema constraints or has invalid structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl DocumentStoreError {
    /// Returns `true` when this error is a unique index violation.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, DocumentStoreError::DuplicateKey { .. })
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
