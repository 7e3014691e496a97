//! The main document store interface.
//!
//! [`DocumentStore`] wraps a [`StoreBackend`] and hands out [`TypedCollection`]s. It is
//! the value a service receives through its constructor.

use tracing::debug;

use crate::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
///
/// # Example
///
/// ```ignore
/// let store = DocumentStore::new(InMemoryStore::new());
/// store.ensure_indexes::<Pokemon>().await?;
/// let pokemons = store.typed_collection::<Pokemon>();
/// ```
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a typed collection for the given document type.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Declares a unique index for every field listed in [`Document::unique_fields`].
    pub async fn ensure_indexes<D: Document>(&self) -> DocumentStoreResult<()> {
        for field in D::unique_fields() {
            debug!(collection = D::collection_name(), field, "declaring unique index");

            self.backend
                .create_index(D::collection_name(), field, true)
                .await?;
        }

        Ok(())
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}
