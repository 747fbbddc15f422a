use docmap_core::{Error, Result};

use bson::{Bson, Decimal128};
use regex::Regex;
use std::{str::FromStr, sync::LazyLock};

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid numeric pattern")
});

/// Converts a numeric string (or an array of them) to `Decimal128`.
///
/// Strings that are not numeric-lexical fail with a format error. Values
/// that are already `Decimal128`, and non-string values, pass through.
pub fn coerce_decimal128(value: Bson) -> Result<Bson> {
    match value {
        Bson::String(s) => parse(&s).map(Bson::Decimal128),
        Bson::Array(items) => items
            .into_iter()
            .map(coerce_decimal128)
            .collect::<Result<Vec<_>>>()
            .map(Bson::Array),
        value => Ok(value),
    }
}

/// Renders stored decimals back to their canonical string.
pub(super) fn decimal128_to_string(value: Bson) -> Bson {
    match value {
        Bson::Decimal128(d) => Bson::String(d.to_string()),
        Bson::Array(items) => Bson::Array(items.into_iter().map(decimal128_to_string).collect()),
        value => value,
    }
}

fn parse(value: &str) -> Result<Decimal128> {
    let trimmed = value.trim();

    if !NUMERIC.is_match(trimmed) {
        return Err(Error::invalid_format(format!(
            "{value} is not a valid Decimal128 string"
        )));
    }

    Decimal128::from_str(trimmed)
        .map_err(|_| Error::invalid_format(format!("{value} is not a valid Decimal128 string")))
}
