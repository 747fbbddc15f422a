//! Conversions between caller values and their storage representation.

mod decimal;
pub use decimal::coerce_decimal128;

mod document;
pub use document::{from_database, to_database};

pub(crate) mod geo;

mod id;
pub use id::{coerce_id, coerce_to_object_id, is_object_id_string};

use bson::Bson;

/// Values the coercion pass leaves alone: `null`, zero, `false` and the
/// empty string.
fn is_falsy(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => true,
        Bson::Boolean(b) => !b,
        Bson::Int32(n) => *n == 0,
        Bson::Int64(n) => *n == 0,
        Bson::Double(n) => *n == 0.0 || n.is_nan(),
        Bson::String(s) => s.is_empty(),
        _ => false,
    }
}
