//! Pagination parameters for list queries.
//!
//! [`PaginationParams`] mirrors what a caller may send: both the page size and the
//! number of skipped items are optional, and the consumer decides the defaults.

use serde::{Deserialize, Serialize};

use crate::query::QueryBuilder;

/// Parameters for paginating through large result sets with limit/offset semantics.
///
/// # Example
///
/// ```ignore
/// use pokedex_core::page::PaginationParams;
///
/// let params = PaginationParams::builder().with_offset(20).build();
/// assert_eq!(params.limit_or(7), 7);
/// assert_eq!(params.offset(), 20);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Maximum number of items to return, if the caller chose one.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of items to skip, if the caller chose one.
    #[serde(default)]
    pub offset: Option<usize>,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    /// Creates a new builder for constructing pagination parameters.
    pub fn builder() -> PaginationParamsBuilder {
        PaginationParamsBuilder::new()
    }

    /// Returns the requested limit, falling back to `default_limit`.
    pub fn limit_or(&self, default_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit)
    }

    /// Returns the requested offset, `0` when absent.
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Applies these parameters to a query builder.
    pub fn apply(&self, builder: QueryBuilder, default_limit: usize) -> QueryBuilder {
        builder
            .limit(self.limit_or(default_limit))
            .offset(self.offset())
    }
}

/// Builder for constructing [`PaginationParams`] instances.
#[derive(Default)]
pub struct PaginationParamsBuilder {
    limit: Option<usize>,
    offset: Option<usize>,
}

impl PaginationParamsBuilder {
    /// Creates a new builder with no parameters set.
    pub fn new() -> Self {
        Self { limit: None, offset: None }
    }

    /// Sets the number of items per page.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of items to skip.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds and returns the [`PaginationParams`].
    pub fn build(self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let params = PaginationParams::default();

        assert_eq!(params.limit_or(7), 7);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let params = PaginationParams::builder()
            .with_limit(2)
            .with_offset(3)
            .build();

        let query = params.apply(Query::builder(), 7).build();

        assert_eq!(query.limit, Some(2));
        assert_eq!(query.offset, Some(3));
    }

    #[test]
    fn deserializes_partial_input() {
        let params: PaginationParams = serde_json::from_str(r#"{ "offset": 10 }"#).unwrap();

        assert_eq!(params, PaginationParams::new(None, Some(10)));
    }
}
