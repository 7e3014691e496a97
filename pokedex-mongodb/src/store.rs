use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, oid::ObjectId, doc};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions, ReturnDocument},
};
use pokedex_core::{
    backend::{DeleteOutcome, StoreBackend, StoreBackendBuilder},
    document::{ID_FIELD, REVISION_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, QueryVisitor, SortDirection},
};

use crate::query::MongoQueryTranslator;

/// Server error code for unique index violations (E11000).
const DUPLICATE_KEY_CODE: i32 = 11000;


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Classifies a driver error, turning E11000 into `DuplicateKey`.
///
/// Plain writes report the violation as a write error, `findAndModify` as a command error.
fn classify_error(err: MongoError, collection: &str) -> DocumentStoreError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE => {
            Some(write_error.message.as_str())
        },
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_CODE => {
            Some(command_error.message.as_str())
        },
        _ => None,
    };

    match duplicate {
        Some(message) => DocumentStoreError::DuplicateKey {
            collection: collection.to_string(),
            key: duplicate_key_description(message),
        },
        None => DocumentStoreError::Backend(err.to_string()),
    }
}

/// Extracts `name: "pikachu"` out of
/// `E11000 duplicate key error collection: db.pokemons index: name_1 dup key: { name: "pikachu" }`.
fn duplicate_key_description(message: &str) -> String {
    match message.split_once("dup key:") {
        Some((_, key)) => key
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim()
            .to_string(),
        None => message.to_string(),
    }
}

/// Builds the cursor options for `query`, or `None` when the query asks for nothing.
///
/// The server reads a limit of 0 as "no limit", so an empty page never reaches it.
fn find_options(query: &Query) -> Option<FindOptions> {
    let mut options = FindOptions::default();

    match query.limit {
        Some(0) => return None,
        Some(limit) => options.limit = Some(limit as i64),
        None => {}
    }
    if let Some(skip) = query.offset {
        options.skip = Some(skip as u64);
    }
    if let Some(sort) = &query.sort {
        options.sort = Some(doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        })
    }
    if !query.exclude.is_empty() {
        options.projection = Some(
            query.exclude
                .iter()
                .map(|field| (field.clone(), Bson::Int32(0)))
                .collect::<Document>()
        );
    }

    Some(options)
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<Document> {
        let mut stored = doc! { ID_FIELD: ObjectId::new() };
        for (key, value) in document {
            if key != ID_FIELD {
                stored.insert(key, value);
            }
        }
        stored.insert(REVISION_FIELD, 0_i32);

        self.get_collection(collection)
            .insert_one(&stored)
            .await
            .map_err(|e| classify_error(e, collection))?;

        Ok(stored)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(MongoQueryTranslator.visit_expr(&filter)?)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn find_by_id(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(doc! { ID_FIELD: *id })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn find(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let Some(options) = find_options(&query) else {
            return Ok(vec![]);
        };

        self.get_collection(collection)
            .find(
                if let Some(expr) = &query.filter {
                    MongoQueryTranslator.visit_expr(expr)?
                } else {
                    doc! {}
                },
            )
            .with_options(options)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn update_one(
        &self,
        id: &ObjectId,
        mut patch: Document,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        patch.remove(ID_FIELD);

        // The server rejects an empty `$set`, and there is nothing to write anyway
        if patch.is_empty() {
            return self.find_by_id(id, collection).await;
        }

        self.get_collection(collection)
            .find_one_and_update(doc! { ID_FIELD: *id }, doc! { "$set": patch })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| classify_error(e, collection))
    }

    async fn delete_one(&self, id: &ObjectId, collection: &str) -> DocumentStoreResult<DeleteOutcome> {
        let result = self.get_collection(collection)
            .delete_one(doc! { ID_FIELD: *id })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(DeleteOutcome { deleted_count: result.deleted_count })
    }

    async fn create_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| classify_error(e, collection))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
