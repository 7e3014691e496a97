//! Convenient re-exports of commonly used types from pokedex.
//!
//! ```ignore
//! use pokedex::prelude::*;
//! ```

pub use pokedex_core::{
    store::DocumentStore,
    document::{Document, DocumentExt},
    backend::{StoreBackend, StoreBackendBuilder},
    page::PaginationParams,
    query::{Query, Filter, Sort, SortDirection},
    error::{DocumentStoreError, DocumentStoreResult},
};

pub use crate::{
    config::{AppConfig, ResolverConfig},
    error::{ErrorClass, ResolverError, ResolverResult},
    identifier::parse_store_id,
    pokemon::{CreatePokemon, Pokemon, UpdatePokemon},
    resolver::PokemonResolver,
};
