//! Pokemon resource service over a pluggable document store.
//!
//! This crate is the entry point of the pokedex workspace. It holds the `Pokemon`
//! model and the [`PokemonResolver`](resolver::PokemonResolver) service, and re-exports
//! the store abstraction and its backends.
//!
//! # Features
//!
//! - **Normalized writes** - Names are stored lowercase on create and update
//! - **Flexible lookup** - One term finds a Pokemon by ordinal, store identifier or name
//! - **Uniform errors** - Store failures surface as a small [`ResolverError`](error::ResolverError) taxonomy
//! - **Multiple backends** - In-memory storage, and MongoDB behind the `mongodb` feature
//!
//! # Quick Start
//!
//! ```ignore
//! use pokedex::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!
//!     let resolver = PokemonResolver::new(store, config.resolver());
//!     resolver.ensure_indexes().await?;
//!
//!     let pikachu = resolver.create(CreatePokemon::new("Pikachu", 25)).await?;
//!     assert_eq!(pikachu.name, "pikachu");
//!
//!     let first_page = resolver.find_all(PaginationParams::default()).await?;
//!     println!("{}", first_page.len());
//!
//!     resolver.update("25", UpdatePokemon::new().with_field("type", "electric")).await?;
//!     resolver.remove(&pikachu.id).await?;
//!
//!     resolver.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - Persistent MongoDB backend (requires `mongodb` feature)

pub mod config;
pub mod error;
pub mod identifier;
pub mod pokemon;
pub mod prelude;
pub mod resolver;

pub use pokedex_core::{backend, collection, document, page, query, store};

/// Errors raised by the store layer.
pub use pokedex_core::error as store_error;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use pokedex_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use pokedex_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
