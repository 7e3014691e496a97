//! Query translation from the pokedex filter AST to MongoDB query syntax.

use bson::{Document, Bson, doc};

use pokedex_core::{
    query::QueryVisitor,
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! { field: { "$eq": value } })
    }
}
