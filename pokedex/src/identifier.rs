//! Classification of lookup terms and store identifiers.
//!
//! A term is whatever string a caller uses to point at a single Pokemon. It may read
//! as an ordinal, as a store identifier, both, or neither; it is always usable as a
//! name.

use bson::{Bson, oid::ObjectId};

use crate::error::{ResolverError, ResolverResult};

/// 2^63, the first integral value past `i64::MAX`.
const INT64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A lookup term with its possible interpretations precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Term<'a> {
    raw: &'a str,
    ordinal: Option<Bson>,
    store_id: Option<ObjectId>,
}

impl<'a> Term<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            ordinal: parse_ordinal(raw),
            store_id: ObjectId::parse_str(raw).ok(),
        }
    }

    /// The term exactly as the caller sent it.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// The numeric value of the term, if it reads as a number.
    pub fn ordinal(&self) -> Option<&Bson> {
        self.ordinal.as_ref()
    }

    /// The store identifier spelled by the term, if it is one.
    pub fn store_id(&self) -> Option<&ObjectId> {
        self.store_id.as_ref()
    }
}

/// Reads `raw` as a number.
///
/// Surrounding whitespace is ignored; blank input and NaN are not numbers. Integral
/// values that fit an `i64` become `Int64` so they compare as ordinals, anything else
/// stays a `Double` (and therefore never equals a stored ordinal).
fn parse_ordinal(raw: &str) -> Option<Bson> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(Bson::Int64(value));
    }

    let value = trimmed.parse::<f64>().ok()?;
    if value.is_nan() {
        return None;
    }

    if value.fract() == 0.0 && value >= -INT64_BOUND && value < INT64_BOUND {
        Some(Bson::Int64(value as i64))
    } else {
        Some(Bson::Double(value))
    }
}

/// Validates a caller-supplied store identifier before it reaches
/// [`PokemonResolver::remove`](crate::resolver::PokemonResolver::remove).
///
/// # Errors
///
/// Returns [`ResolverError::InvalidId`] unless `value` is 24 hexadecimal digits.
pub fn parse_store_id(value: &str) -> ResolverResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| ResolverError::InvalidId {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("25", Some(Bson::Int64(25)))]
    #[case(" 7 ", Some(Bson::Int64(7)))]
    #[case("-0", Some(Bson::Int64(0)))]
    #[case("1e3", Some(Bson::Int64(1000)))]
    #[case("2.5", Some(Bson::Double(2.5)))]
    #[case("9223372036854775807", Some(Bson::Int64(i64::MAX)))]
    #[case("9223372036854775808", Some(Bson::Double(9_223_372_036_854_775_808.0)))]
    #[case("-9223372036854775808", Some(Bson::Int64(i64::MIN)))]
    #[case("pikachu", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("NaN", None)]
    #[case("25abc", None)]
    fn ordinal_interpretation(#[case] raw: &str, #[case] expected: Option<Bson>) {
        assert_eq!(Term::parse(raw).ordinal(), expected.as_ref());
    }

    #[rstest]
    #[case("64b7f0c2a1b2c3d4e5f60718", true)]
    #[case("64B7F0C2A1B2C3D4E5F60718", true)]
    #[case("64b7f0c2a1b2c3d4e5f6071", false)]
    #[case("zzb7f0c2a1b2c3d4e5f60718", false)]
    #[case("bulbasaur", false)]
    fn store_id_interpretation(#[case] raw: &str, #[case] is_id: bool) {
        assert_eq!(Term::parse(raw).store_id().is_some(), is_id);
    }

    #[test]
    fn all_digit_identifier_reads_both_ways() {
        let term = Term::parse("123456789012345678901234");

        assert!(term.ordinal().is_some());
        assert!(term.store_id().is_some());
        assert_eq!(term.as_str(), "123456789012345678901234");
    }

    #[test]
    fn parse_store_id_rejects_malformed_values() {
        let err = parse_store_id("not-an-id").unwrap_err();

        assert_eq!(err.to_string(), "not-an-id is not a valid store identifier");
        assert!(parse_store_id(&ObjectId::new().to_hex()).is_ok());
    }
}
