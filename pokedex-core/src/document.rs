//! Core traits and types for document representation and serialization.
//!
//! This module provides the trait every stored record implements, the reserved field
//! names the backends manage on their own, and helpers for converting records between
//! BSON and JSON.

use bson::{
    Bson, Document as BsonDocument,
    de::deserialize_from_document,
    oid::ObjectId,
    ser::{serialize_to_bson, serialize_to_document},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Field holding the store-assigned identifier of every document.
pub const ID_FIELD: &str = "_id";

/// Field holding the store-managed revision counter of every document.
pub const REVISION_FIELD: &str = "__v";

/// Core trait that all records read from a document store must implement.
///
/// Unlike the payloads written into a collection, a record always carries the
/// identifier the store assigned to it at insert time.
///
/// # Example
///
/// ```ignore
/// use pokedex_core::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Trainer {
///     #[serde(rename = "_id")]
///     pub id: ObjectId,
///     pub name: String,
/// }
///
/// impl Document for Trainer {
///     fn id(&self) -> &ObjectId {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "trainers"
///     }
///
///     fn unique_fields() -> &'static [&'static str] {
///         &["name"]
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's store identifier.
    fn id(&self) -> &ObjectId;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;

    /// Fields that must hold a distinct value in every document of the collection.
    ///
    /// [`DocumentStore::ensure_indexes`](crate::store::DocumentStore::ensure_indexes)
    /// declares a unique index for each of them.
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Converts this document to a BSON document (a map of fields).
    fn to_document(&self) -> DocumentStoreResult<BsonDocument>;

    /// Creates a document from a BSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or required fields are missing.
    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self>;

    /// Converts this document to a JSON value, e.g. for a response body.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn to_document(&self) -> DocumentStoreResult<BsonDocument> {
        Ok(serialize_to_document(self)?)
    }

    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_document(document)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Serializes a caller payload (an insert body or an update patch) into a BSON document.
///
/// The reserved [`ID_FIELD`] and [`REVISION_FIELD`] are stripped: they belong to the
/// store and a payload can never set them.
pub fn payload_to_document<P>(payload: &P) -> DocumentStoreResult<BsonDocument>
where
    P: Serialize + ?Sized,
{
    match serialize_to_bson(payload)? {
        Bson::Document(mut document) => {
            document.remove(ID_FIELD);
            document.remove(REVISION_FIELD);

            Ok(document)
        }
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document payload, got {:?}",
            other.element_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn payload_to_document_strips_reserved_fields() {
        let payload = doc! { "_id": "forged", "__v": 9, "name": "eevee", "no": 133 };

        let document = payload_to_document(&payload).unwrap();

        assert_eq!(document, doc! { "name": "eevee", "no": 133 });
    }

    #[test]
    fn payload_to_document_rejects_scalars() {
        let err = payload_to_document(&42_i32).unwrap_err();

        assert!(matches!(err, DocumentStoreError::InvalidDocument(_)));
    }

    #[test]
    fn payload_to_document_accepts_maps() {
        let mut payload = BTreeMap::new();
        payload.insert("name", "mew");

        let document = payload_to_document(&payload).unwrap();

        assert_eq!(document.get_str("name").unwrap(), "mew");
    }
}
