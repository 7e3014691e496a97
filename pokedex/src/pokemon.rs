//! The Pokemon record and the payloads used to create and patch it.
//!
//! Only `no` and `name` carry meaning for the service; every other field a caller
//! sends travels in `extra` and is stored as-is.

use bson::{Document as BsonDocument, oid::ObjectId};
use serde::{Deserialize, Serialize};

use pokedex_core::document::{Document, ID_FIELD, REVISION_FIELD};

/// Name of the collection holding Pokemon records.
pub const COLLECTION: &str = "pokemons";

/// Keys with a meaning of their own; `extra` never carries them.
const RESERVED_FIELDS: [&str; 4] = [ID_FIELD, REVISION_FIELD, "name", "no"];

fn strip_reserved(extra: &mut BsonDocument) {
    for key in RESERVED_FIELDS {
        extra.remove(key);
    }
}

/// A stored Pokemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Store identifier, assigned at insert and never changed.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Ordinal, unique across the collection.
    pub no: i64,
    /// Lowercase name, unique across the collection.
    pub name: String,
    /// Store revision; absent from list results.
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Caller-supplied descriptive fields.
    #[serde(flatten)]
    pub extra: BsonDocument,
}

impl Document for Pokemon {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn collection_name() -> &'static str {
        COLLECTION
    }

    fn unique_fields() -> &'static [&'static str] {
        &["no", "name"]
    }
}

/// Payload for [`PokemonResolver::create`](crate::resolver::PokemonResolver::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePokemon {
    pub name: String,
    pub no: i64,
    #[serde(flatten)]
    pub extra: BsonDocument,
}

impl CreatePokemon {
    pub fn new(name: impl Into<String>, no: i64) -> Self {
        Self {
            name: name.into(),
            no,
            extra: BsonDocument::new(),
        }
    }

    /// Adds an opaque descriptive field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<bson::Bson>) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Applies the stored-name rule (names are kept lowercase) and drops reserved keys
    /// from `extra` so they cannot shadow the typed fields.
    pub(crate) fn normalized(mut self) -> Self {
        self.name = self.name.to_lowercase();
        strip_reserved(&mut self.extra);
        self
    }
}

/// Partial update for [`PokemonResolver::update`](crate::resolver::PokemonResolver::update).
///
/// Absent fields are left untouched in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePokemon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,
    #[serde(flatten)]
    pub extra: BsonDocument,
}

impl UpdatePokemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_no(mut self, no: i64) -> Self {
        self.no = Some(no);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<bson::Bson>) -> Self {
        self.extra.insert(key, value);
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.name = self.name.map(|name| name.to_lowercase());
        strip_reserved(&mut self.extra);
        self
    }

    /// The fields this patch writes. `name` and `no` only come from the typed fields.
    pub(crate) fn to_fields(&self) -> BsonDocument {
        let mut fields = self.extra.clone();
        strip_reserved(&mut fields);

        if let Some(name) = &self.name {
            fields.insert("name", name.as_str());
        }
        if let Some(no) = self.no {
            fields.insert("no", no);
        }

        fields
    }
}
