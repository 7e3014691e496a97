//! The Pokemon service.
//!
//! [`PokemonResolver`] sits between request handlers and the `pokemons` collection. It
//! normalizes names, resolves free-form lookup terms and turns store failures into
//! [`ResolverError`]s.
//!
//! # Term resolution
//!
//! A term is tried, in order and stopping at the first hit, as:
//!
//! 1. an ordinal, when it reads as a number (`"25"`);
//! 2. a store identifier, when it is 24 hexadecimal digits;
//! 3. an exact name (`"pikachu"`), without changing its case.
//!
//! So a numeric term always reaches `no` first, even when it also spells an identifier.

use bson::oid::ObjectId;
use tracing::{debug, error, info, instrument, warn};

use pokedex_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::{DocumentExt, REVISION_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    page::PaginationParams,
    query::{Filter, Query, Sort},
    store::DocumentStore,
};

use crate::{
    config::ResolverConfig,
    error::{ResolverError, ResolverResult},
    identifier::Term,
    pokemon::{CreatePokemon, Pokemon, UpdatePokemon},
};

/// Create, list, look up, patch and delete Pokemon records.
///
/// # Example
///
/// ```ignore
/// let resolver = PokemonResolver::new(DocumentStore::new(InMemoryStore::new()), ResolverConfig::default());
/// resolver.ensure_indexes().await?;
///
/// resolver.create(CreatePokemon::new("Pikachu", 25)).await?;
/// let by_no = resolver.find_one("25").await?;
/// let by_name = resolver.find_one("pikachu").await?;
/// assert_eq!(by_no.id, by_name.id);
/// ```
#[derive(Debug)]
pub struct PokemonResolver<B: StoreBackend> {
    store: DocumentStore<B>,
    config: ResolverConfig,
}

impl<B: StoreBackend> PokemonResolver<B> {
    pub fn new(store: DocumentStore<B>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Declares the unique indexes on `no` and `name`.
    ///
    /// Must run once before serving writes; without it duplicates are not rejected.
    pub async fn ensure_indexes(&self) -> DocumentStoreResult<()> {
        self.store.ensure_indexes::<Pokemon>().await
    }

    fn pokemons(&self) -> TypedCollection<'_, B, Pokemon> {
        self.store.typed_collection::<Pokemon>()
    }

    /// Stores a new Pokemon with its name lowercased.
    ///
    /// # Errors
    ///
    /// [`ResolverError::DuplicateEntry`] when `no` or `name` is taken,
    /// [`ResolverError::StorageFailure`] for anything else the store reports.
    #[instrument(skip(self, input), fields(name = %input.name, no = input.no))]
    pub async fn create(&self, input: CreatePokemon) -> ResolverResult<Pokemon> {
        let input = input.normalized();

        let created = self
            .pokemons()
            .insert(&input)
            .await
            .map_err(|e| classify(e, "create"))?;

        info!(id = %created.id, "created pokemon");

        Ok(created)
    }

    /// Lists Pokemon by ascending `no`, one page at a time.
    ///
    /// The page size falls back to [`ResolverConfig::default_limit`]. Records come back
    /// without their revision.
    #[instrument(skip(self))]
    pub async fn find_all(&self, pagination: PaginationParams) -> ResolverResult<Vec<Pokemon>> {
        let query = pagination
            .apply(Query::builder(), self.config.default_limit)
            .sort(Sort::asc("no"))
            .exclude(REVISION_FIELD)
            .build();

        self.pokemons()
            .find(query)
            .await
            .map_err(|e| classify(e, "list"))
    }

    /// Resolves `term` to a single Pokemon.
    ///
    /// # Errors
    ///
    /// [`ResolverError::NotFound`] naming `term` when no interpretation matches.
    #[instrument(skip(self))]
    pub async fn find_one(&self, term: &str) -> ResolverResult<Pokemon> {
        self.resolve(&Term::parse(term))
            .await?
            .ok_or_else(|| ResolverError::not_found(term))
    }

    async fn resolve(&self, term: &Term<'_>) -> ResolverResult<Option<Pokemon>> {
        let pokemons = self.pokemons();

        if let Some(no) = term.ordinal() {
            let found = pokemons
                .find_one(Filter::eq("no", no.clone()))
                .await
                .map_err(|e| classify(e, "find"))?;

            if found.is_some() {
                debug!("matched by no");
                return Ok(found);
            }
        }

        if let Some(id) = term.store_id() {
            let found = pokemons
                .find_by_id(id)
                .await
                .map_err(|e| classify(e, "find"))?;

            if found.is_some() {
                debug!("matched by id");
                return Ok(found);
            }
        }

        let found = pokemons
            .find_one(Filter::eq("name", term.as_str()))
            .await
            .map_err(|e| classify(e, "find"))?;

        if found.is_some() {
            debug!("matched by name");
        }

        Ok(found)
    }

    /// Resolves `term` and merges `patch` into that record.
    ///
    /// Returns the record as it was resolved with the patch laid over it; fields the
    /// store changes on its own are not re-read.
    ///
    /// # Errors
    ///
    /// [`ResolverError::NotFound`] exactly as [`find_one`](Self::find_one) reports it,
    /// [`ResolverError::DuplicateEntry`] when the patch takes another record's `no` or
    /// `name`, [`ResolverError::StorageFailure`] otherwise.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, term: &str, patch: UpdatePokemon) -> ResolverResult<Pokemon> {
        let found = self.find_one(term).await?;
        let fields = patch.normalized().to_fields();

        // The patched record must still read back before anything is written
        let mut merged = found.to_document().map_err(|e| classify(e, "update"))?;
        for (key, value) in &fields {
            merged.insert(key.clone(), value.clone());
        }
        let updated = Pokemon::from_document(merged).map_err(|e| classify(e, "update"))?;

        self.pokemons()
            .update_one(&found.id, &fields)
            .await
            .map_err(|e| classify(e, "update"))?
            .ok_or_else(|| ResolverError::not_found(term))?;

        info!(id = %updated.id, "updated pokemon");

        Ok(updated)
    }

    /// Deletes the Pokemon with the given store identifier.
    ///
    /// # Errors
    ///
    /// [`ResolverError::NotFound`] when nothing was deleted.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove(&self, id: &ObjectId) -> ResolverResult<()> {
        let outcome = self
            .pokemons()
            .delete_one(id)
            .await
            .map_err(|e| classify(e, "delete"))?;

        if outcome.deleted_count == 0 {
            return Err(ResolverError::not_found(id.to_hex()));
        }

        info!("removed pokemon");

        Ok(())
    }

    /// Shuts down the underlying store.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.store.shutdown().await
    }
}

/// Turns a store failure into the caller-facing error, logging what the caller won't see.
fn classify(err: DocumentStoreError, operation: &'static str) -> ResolverError {
    let classified = ResolverError::from_store(&err, operation);

    match &classified {
        ResolverError::DuplicateEntry { key } => warn!(%key, operation, "unique index violation"),
        _ => error!(error = %err, operation, "store operation failed"),
    }

    classified
}
