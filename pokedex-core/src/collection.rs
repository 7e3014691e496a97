//! Typed collection handle for document store operations.
//!
//! A [`TypedCollection`] binds a backend to the collection of one [`Document`] type and
//! converts between that type and raw BSON on every call.
//!
//! ```ignore
//! let pokemons = store.typed_collection::<Pokemon>();
//! let created = pokemons.insert(&CreatePokemon::new("bulbasaur", 1)).await?;
//! let same = pokemons.find_by_id(created.id()).await?;
//! ```

use bson::oid::ObjectId;
use serde::Serialize;
use std::marker::PhantomData;

use crate::{
    backend::{DeleteOutcome, StoreBackend},
    document::{Document, DocumentExt, payload_to_document},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// A type-safe collection for a specific document type.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
/// * `D` - The record type read from the collection
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a payload and returns the stored record.
    ///
    /// The payload is any serializable map; the store adds the identifier and revision.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DuplicateKey`](crate::error::DocumentStoreError::DuplicateKey)
    /// when the payload collides with a unique index.
    pub async fn insert<P>(&self, payload: &P) -> DocumentStoreResult<D>
    where
        P: Serialize + Sync + ?Sized,
    {
        let stored = self
            .backend
            .insert_one(payload_to_document(payload)?, self.name())
            .await?;

        D::from_document(stored)
    }

    /// Returns the first record matching `filter`.
    pub async fn find_one(&self, filter: Expr) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_one(filter, self.name())
            .await?
            .map(D::from_document)
            .transpose()
    }

    /// Returns the record with the given identifier.
    pub async fn find_by_id(&self, id: &ObjectId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_by_id(id, self.name())
            .await?
            .map(D::from_document)
            .transpose()
    }

    /// Queries records using a structured query.
    ///
    /// Excluded fields must be optional in `D`, otherwise deserialization fails.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .find(query, self.name())
            .await?
            .into_iter()
            .map(D::from_document)
            .collect()
    }

    /// Merges a patch into the record with the given identifier.
    ///
    /// Returns the record as persisted after the update, or `None` if it does not exist.
    pub async fn update_one<P>(&self, id: &ObjectId, patch: &P) -> DocumentStoreResult<Option<D>>
    where
        P: Serialize + Sync + ?Sized,
    {
        self.backend
            .update_one(id, payload_to_document(patch)?, self.name())
            .await?
            .map(D::from_document)
            .transpose()
    }

    /// Deletes the record with the given identifier.
    pub async fn delete_one(&self, id: &ObjectId) -> DocumentStoreResult<DeleteOutcome> {
        self.backend
            .delete_one(id, self.name())
            .await
    }
}
