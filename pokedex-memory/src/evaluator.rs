//! Query expression evaluation for in-memory document filtering.
//!
//! This module provides the evaluation engine for query expressions and the value
//! ordering used for sorting and unique index checks.

use std::{cmp::Ordering, collections::HashMap};
use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};

use pokedex_core::{
    query::{QueryVisitor, Expr},
    error::DocumentStoreError,
};


/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to `f64`, so an `Int32` ordinal stored by one caller
/// equals an `Int64` or `Double` filter value sent by another.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Store identifier
    ObjectId(ObjectId),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> Comparable<'a> {
    /// Reads `field` from `document`, treating a missing field as null.
    pub(crate) fn field(document: &'a Document, field: &str) -> Self {
        document
            .get(field)
            .map(Comparable::from)
            .unwrap_or(Comparable::Null)
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Some(Ordering::Equal),
            // Missing values sort first, as MongoDB does for ascending sorts.
            (Comparable::Null, _) => Some(Ordering::Less),
            (_, Comparable::Null) => Some(Ordering::Greater),
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<bool, DocumentStoreError> {
        self.visit_expr(expr)
    }

    /// Returns `true` when `document` satisfies `expr`.
    pub fn matches(document: &'a Document, expr: &Expr) -> bool {
        DocumentEvaluator::new(document)
            .evaluate(expr)
            .unwrap_or(false)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        match self.document.get(field) {
            Some(field_value) => Ok(Comparable::from(field_value) == Comparable::from(value)),
            // A missing field only equals null
            None => Ok(matches!(value, Bson::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pokedex_core::query::Filter;

    #[test]
    fn numbers_compare_across_bson_types() {
        let document = doc! { "no": 25_i32 };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("no", 25_i64)));
        assert!(DocumentEvaluator::matches(&document, &Filter::eq("no", 25.0_f64)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("no", 25.5_f64)));
    }

    #[test]
    fn strings_match_exactly() {
        let document = doc! { "name": "pikachu" };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("name", "pikachu")));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("name", "Pikachu")));
    }

    #[test]
    fn object_ids_match_by_value() {
        let id = ObjectId::new();
        let document = doc! { "_id": id };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("_id", id)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("_id", ObjectId::new())));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("_id", id.to_hex())));
    }

    #[test]
    fn missing_fields_equal_null_only() {
        let document = doc! { "name": "missingno" };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("no", Bson::Null)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("no", 0)));
    }

    #[test]
    fn null_sorts_before_values() {
        let missing = doc! {};
        let present = doc! { "no": 1 };

        assert_eq!(
            Comparable::field(&missing, "no").partial_cmp(&Comparable::field(&present, "no")),
            Some(Ordering::Less)
        );
    }
}
