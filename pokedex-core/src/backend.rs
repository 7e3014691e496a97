//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the whole capability the service layer consumes from a
//! storage engine: single document inserts, lookups by filter or by identifier, paged
//! queries, partial updates and deletes, plus unique index declaration. Implementations
//! must be thread-safe (`Send + Sync`) and support concurrent access.
//!
//! ```ignore
//! use pokedex_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//!
//! let stored = backend.insert_one(doc! { "name": "bulbasaur", "no": 1 }, "pokemons").await?;
//! let id = stored.get_object_id("_id")?;
//! assert!(backend.find_by_id(&id, "pokemons").await?.is_some());
//! ```

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// Outcome of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Number of documents removed from the collection.
    pub deleted_count: u64,
}

/// Abstract interface for document storage backends.
///
/// # Identifiers and revisions
///
/// Backends assign a fresh [`ObjectId`] to every inserted document under the
/// [`ID_FIELD`](crate::document::ID_FIELD) key and initialize the
/// [`REVISION_FIELD`](crate::document::REVISION_FIELD) to `0`. Identifiers never change
/// afterwards.
///
/// # Uniqueness
///
/// Writes that would give two documents the same value in a field covered by a unique
/// index fail with [`DocumentStoreError::DuplicateKey`](crate::error::DocumentStoreError::DuplicateKey).
/// This is the only consistency guarantee the service layer relies on.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a single document and returns it as stored, identifier included.
    ///
    /// The collection is created implicitly if it doesn't exist. Any `_id` present in
    /// `document` is replaced by a store-generated one.
    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<Document>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>>;

    /// Returns the document with the given identifier, if any.
    async fn find_by_id(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<Option<Document>>;

    /// Queries documents using a structured query.
    ///
    /// Applies the filter, then the sort, then `offset` and `limit`, and finally removes
    /// the excluded fields from every returned document.
    async fn find(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>>;

    /// Merges `patch` into the document with the given identifier.
    ///
    /// Fields present in `patch` overwrite the stored ones, every other field is left
    /// untouched. Returns the document after the update, or `None` if no document has
    /// that identifier.
    async fn update_one(
        &self,
        id: &ObjectId,
        patch: Document,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;

    /// Deletes the document with the given identifier, reporting how many were removed.
    async fn delete_one(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<DeleteOutcome>;

    /// Creates an index on a field in a collection.
    ///
    /// With `unique` set, later writes that would duplicate a value of `field` fail with
    /// `DuplicateKey`. Declaring the same index twice is not an error.
    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends holding connections override it.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<Document> {
        (*self)
            .insert_one(document, collection)
            .await
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        (*self)
            .find_one(filter, collection)
            .await
    }

    async fn find_by_id(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<Option<Document>> {
        (*self)
            .find_by_id(id, collection)
            .await
    }

    async fn find(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .find(query, collection)
            .await
    }

    async fn update_one(
        &self,
        id: &ObjectId,
        patch: Document,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (*self)
            .update_one(id, patch, collection)
            .await
    }

    async fn delete_one(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<DeleteOutcome> {
        (*self)
            .delete_one(id, collection)
            .await
    }

    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        (*self)
            .create_index(collection, field, unique)
            .await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
