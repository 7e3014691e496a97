//! In-memory document storage backend for pokedex.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-assigned identifiers** - Every insert receives a fresh `ObjectId` and a `__v` revision
//! - **Unique indexes** - Writes colliding on a unique field fail with `DuplicateKey`
//! - **Query support** - Equality filters, sorting, pagination and field exclusion
//!
//! # Quick Start
//!
//! ```ignore
//! use pokedex::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let resolver = PokemonResolver::new(store, ResolverConfig::default());
//!     resolver.ensure_indexes().await?;
//!
//!     resolver.create(CreatePokemon::new("Bulbasaur", 1)).await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pokedex_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
