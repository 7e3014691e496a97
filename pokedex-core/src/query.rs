//! Query construction and filtering API for document stores.
//!
//! Queries are built with [`QueryBuilder`] and executed by backends through the
//! [`QueryVisitor`] trait, which each backend implements to either evaluate a filter
//! in place or translate it into a native query language.
//!
//! ```ignore
//! use pokedex_core::query::{Query, Filter, Sort};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("type", "electric"))
//!     .sort(Sort::asc("no"))
//!     .limit(10)
//!     .offset(0)
//!     .exclude("__v")
//!     .build();
//! ```

use bson::Bson;

use crate::error::DocumentStoreError;

/// Order in which a sorted field is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Orders results by a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }
}

/// A filter over the documents of one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `field == value`. A missing field reads as null.
    ///
    /// Numbers compare by value whatever their BSON width, so `Int32(25)`, `Int64(25)`
    /// and `Double(25.0)` are all equal.
    Eq {
        field: String,
        value: Bson,
    },
}

/// Everything a backend needs to answer a list request.
///
/// Backends apply the parts in a fixed order: filter, sort, `offset`, `limit`, and
/// finally the `exclude` projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Expr>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Option<Sort>,
    /// Fields stripped from every returned document.
    pub exclude: Vec<String>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Shorthands for building [`Expr`]s.
///
/// ```ignore
/// use pokedex_core::query::Filter;
///
/// let by_no = Filter::eq("no", 25_i64);
/// let by_name = Filter::eq("name", "pikachu");
/// ```
pub struct Filter;

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq { field: field.into(), value: value.into() }
    }
}

/// Fluent construction of a [`Query`]; see the module docs.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.query.sort = Some(sort);
        self
    }

    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.query.exclude.push(field.into());
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks an [`Expr`] tree.
///
/// The memory backend evaluates filters with it, the MongoDB backend translates them
/// into query documents.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn eq_converts_field_and_value() {
        assert_eq!(
            Filter::eq("no", 25_i64),
            Expr::Eq { field: "no".to_string(), value: Bson::Int64(25) }
        );
    }

    #[test]
    fn builder_collects_every_option() {
        let query = Query::builder()
            .filter(Filter::eq("no", 25))
            .limit(2)
            .offset(4)
            .sort(Sort::asc("no"))
            .exclude("__v")
            .build();

        assert_eq!(query.limit, Some(2));
        assert_eq!(query.offset, Some(4));
        assert_eq!(
            query.sort,
            Some(Sort { field: "no".to_string(), direction: SortDirection::Asc })
        );
        assert_eq!(query.exclude, vec!["__v".to_string()]);
        assert_eq!(query.filter, Some(Filter::eq("no", 25)));
    }
}
