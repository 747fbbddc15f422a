use docmap_core::{
    schema::{Model, Property, PropertyType, ScalarType},
    Error, Policy, Result,
};

use bson::{oid::ObjectId, Bson};

/// Returns `true` when `value` is exactly 24 hexadecimal characters.
pub fn is_object_id_string(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Converts `value` to an `ObjectId` when the property (or, failing that, the
/// value itself) calls for it.
///
/// * Properties stored as `ObjectId` require a 24-hex string and fail with a
///   format error otherwise.
/// * In strict mode nothing else is converted.
/// * Otherwise any 24-hex string is converted.
///
/// Arrays of a property stored as `ObjectId` are converted element-wise.
/// Non-string values pass through unchanged.
pub fn coerce_to_object_id(
    property: Option<&Property>,
    value: Bson,
    policy: &Policy,
) -> Result<Bson> {
    let stored_as_object_id = property.is_some_and(Property::is_stored_as_object_id);

    match value {
        Bson::String(s) if stored_as_object_id => parse(&s),
        Bson::String(s) if !policy.strict_object_id_coercion && is_object_id_string(&s) => {
            parse(&s)
        }
        Bson::Array(items) if stored_as_object_id => items
            .into_iter()
            .map(|item| coerce_to_object_id(property, item, policy))
            .collect::<Result<Vec<_>>>()
            .map(Bson::Array),
        value => Ok(value),
    }
}

/// Coerces an identifier value to the model's id representation.
///
/// Numeric ids parse numeric strings (values that do not parse are left as
/// they are), string ids render `ObjectId`s as hex, and the result then goes
/// through [`coerce_to_object_id`]. A model without a declared id property
/// uses the connector's default `ObjectId` id and converts 24-hex strings
/// regardless of strict mode.
pub fn coerce_id(model: &Model, id: Bson, policy: &Policy) -> Result<Bson> {
    let Some(property) = model.id_property() else {
        return match id {
            Bson::String(s) if is_object_id_string(&s) => parse(&s),
            id => Ok(id),
        };
    };

    let id = match (&property.ty, id) {
        (PropertyType::Scalar(ScalarType::Number), Bson::String(s)) => parse_number(&s)
            .unwrap_or(Bson::String(s)),
        (PropertyType::Scalar(ScalarType::String), Bson::ObjectId(oid)) => {
            Bson::String(oid.to_hex())
        }
        (_, id) => id,
    };

    coerce_to_object_id(Some(property), id, policy)
}

fn parse(value: &str) -> Result<Bson> {
    ObjectId::parse_str(value)
        .map(Bson::ObjectId)
        .map_err(|_| Error::invalid_format(format!("{value} is not an ObjectID string")))
}

fn parse_number(value: &str) -> Option<Bson> {
    let value = value.trim();

    if let Ok(n) = value.parse::<i64>() {
        return Some(Bson::Int64(n));
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Bson::Double)
}
