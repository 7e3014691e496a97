//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON documents in HashMaps keyed by their [`ObjectId`], behind
//! an async-aware read-write lock. Unique indexes are enforced on every write.

use std::{cmp::Ordering, collections::{BTreeSet, HashMap}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};

use pokedex_core::{
    backend::{DeleteOutcome, StoreBackend, StoreBackendBuilder},
    document::{ID_FIELD, REVISION_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type StoreMap = HashMap<String, CollectionState>;


/// Documents and declared unique fields of a single collection.
#[derive(Debug, Default)]
struct CollectionState {
    documents: HashMap<ObjectId, Document>,
    unique_fields: BTreeSet<String>,
}

impl CollectionState {
    /// Fails with `DuplicateKey` if `candidate` shares a unique field value with any
    /// document other than `skip`.
    ///
    /// Documents lacking a unique field, or holding null in it, are not checked.
    fn check_unique(
        &self,
        candidate: &Document,
        skip: Option<&ObjectId>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        for field in &self.unique_fields {
            let value = match candidate.get(field) {
                None | Some(Bson::Null) => continue,
                Some(value) => value,
            };
            let wanted = Comparable::from(value);

            let collides = self
                .documents
                .iter()
                .filter(|(id, _)| Some(*id) != skip)
                .any(|(_, existing)| Comparable::field(existing, field) == wanted);

            if collides {
                return Err(DocumentStoreError::DuplicateKey {
                    collection: collection.to_string(),
                    key: format!("{field}: {value}"),
                });
            }
        }

        Ok(())
    }
}


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones
/// share the same underlying data.
///
/// Queries scan all documents in a collection; unique indexes are checked by scanning
/// as well. This is meant for development, tests and small datasets.
///
/// # Example
///
/// ```ignore
/// use pokedex_memory::InMemoryStore;
/// use pokedex_core::backend::StoreBackend;
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///     store.create_index("pokemons", "no", true).await?;
///
///     let stored = store.insert_one(doc! { "name": "bulbasaur", "no": 1 }, "pokemons").await?;
///     let id = stored.get_object_id("_id")?;
///
///     assert!(store.find_by_id(&id, "pokemons").await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> collection state
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map(|state| state.documents.len())
            .unwrap_or(0)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<Document> {
        let id = ObjectId::new();

        let mut stored = Document::new();
        stored.insert(ID_FIELD, id);
        for (key, value) in document {
            if key != ID_FIELD {
                stored.insert(key, value);
            }
        }
        stored.insert(REVISION_FIELD, 0_i32);

        let mut store = self.store.write().await;
        let state = store
            .entry(collection.to_string())
            .or_default();

        state.check_unique(&stored, None, collection)?;
        state.documents.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        let store = self.store.read().await;
        let state = match store.get(collection) {
            Some(state) => state,
            None => return Ok(None),
        };

        Ok(
            state.documents
                .values()
                .find(|doc| DocumentEvaluator::matches(doc, &filter))
                .cloned()
        )
    }

    async fn find_by_id(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|state| state.documents.get(id))
                .cloned()
        )
    }

    async fn find(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let state = match store.get(collection) {
            Some(state) => state,
            None => return Ok(vec![]),
        };

        // Apply filter expressions if present
        let mut documents = state.documents
            .values()
            .filter(|doc| match &query.filter {
                Some(filter) => DocumentEvaluator::matches(doc, filter),
                None => true,
            })
            .collect::<Vec<_>>();

        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| {
                let left = Comparable::field(a, &sort.field);
                let right = Comparable::field(b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        // Apply offset and limit, then the projection
        Ok(
            documents
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .map(|doc| {
                    let mut doc = doc.clone();
                    for field in &query.exclude {
                        doc.remove(field);
                    }
                    doc
                })
                .collect()
        )
    }

    async fn update_one(
        &self,
        id: &ObjectId,
        patch: Document,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        let mut store = self.store.write().await;
        let state = match store.get_mut(collection) {
            Some(state) => state,
            None => return Ok(None),
        };

        let mut updated = match state.documents.get(id) {
            Some(existing) => existing.clone(),
            None => return Ok(None),
        };

        for (key, value) in patch {
            if key != ID_FIELD {
                updated.insert(key, value);
            }
        }

        state.check_unique(&updated, Some(id), collection)?;
        state.documents.insert(*id, updated.clone());

        Ok(Some(updated))
    }

    async fn delete_one(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<DeleteOutcome> {
        let mut store = self.store.write().await;

        let removed = store
            .get_mut(collection)
            .and_then(|state| state.documents.remove(id));

        Ok(DeleteOutcome {
            deleted_count: if removed.is_some() { 1 } else { 0 },
        })
    }

    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        // Non-unique indexes would only speed up scans, which this store doesn't optimize
        if !unique {
            return Ok(());
        }

        let mut store = self.store.write().await;
        let state = store
            .entry(collection.to_string())
            .or_default();

        if state.unique_fields.contains(field) {
            return Ok(());
        }

        // Existing documents must already satisfy the constraint
        let mut validated = CollectionState {
            documents: HashMap::new(),
            unique_fields: BTreeSet::from([field.to_string()]),
        };
        for (id, document) in &state.documents {
            validated.check_unique(document, None, collection)?;
            validated.documents.insert(*id, document.clone());
        }

        state.unique_fields.insert(field.to_string());

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// ```ignore
/// use pokedex_memory::InMemoryStore;
/// use pokedex_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
