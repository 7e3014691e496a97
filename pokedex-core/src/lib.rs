//! Core of the pokedex document layer: a unified interface over document stores.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing records
//! - **Store backend abstraction** ([`backend`]) - The capability every storage engine implements
//! - **Query and filtering API** ([`query`]) - Type-safe query construction and filtering
//! - **Collections interface** ([`collection`]) - Typed access to one collection
//! - **Document store** ([`store`]) - Owner of a backend, index bootstrap and shutdown
//! - **Error handling** ([`error`]) - Error and result types
//! - **Pagination** ([`page`]) - Limit/offset parameters for list queries
//!
//! # Example
//!
//! ```ignore
//! use pokedex_core::document::Document;
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Trainer {
//!     #[serde(rename = "_id")]
//!     pub id: ObjectId,
//!     pub name: String,
//! }
//!
//! impl Document for Trainer {
//!     fn id(&self) -> &ObjectId {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "trainers"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pokedex_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
pub mod page;
