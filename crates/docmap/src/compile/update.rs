use docmap_core::Policy;

use bson::{Bson, Document};

/// Update operators passed through when extended operators are allowed.
const EXTENDED_OPERATORS: &[&str] = &[
    // Field operators
    "$currentDate",
    "$inc",
    "$max",
    "$min",
    "$mul",
    "$rename",
    "$setOnInsert",
    "$set",
    "$unset",
    // Array operators
    "$addToSet",
    "$pop",
    "$pullAll",
    "$pull",
    "$push",
    // Bitwise operators
    "$bit",
];

/// Parses an update payload into a native update document.
///
/// With extended operators allowed, recognized operator keys are passed
/// through and every other key is dropped; a payload with no operator keys
/// is wrapped in `$set`. Without them the payload is always wrapped in
/// `$set`. An empty payload yields an empty update.
pub fn parse_update_data(data: Document, policy: &Policy) -> Document {
    let mut update = Document::new();

    if data.is_empty() {
        return update;
    }

    if policy.allow_extended_operators {
        for operator in EXTENDED_OPERATORS {
            if let Some(value) = data.get(*operator).filter(|value| is_present(value)) {
                update.insert(*operator, value.clone());
            }
        }

        if !update.is_empty() {
            return update;
        }
    }

    update.insert("$set", data);
    update
}

fn is_present(value: &Bson) -> bool {
    !matches!(value, Bson::Null | Bson::Undefined | Bson::Boolean(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    fn extended() -> Policy {
        Policy {
            allow_extended_operators: true,
            ..Default::default()
        }
    }

    #[test]
    fn wraps_in_set_by_default() {
        assert_eq!(
            parse_update_data(doc! { "$inc": { "age": 1 }, "name": "x" }, &Policy::default()),
            doc! { "$set": { "$inc": { "age": 1 }, "name": "x" } }
        );
    }

    #[test]
    fn passes_operators_through_when_allowed() {
        assert_eq!(
            parse_update_data(
                doc! { "$inc": { "age": 1 }, "$push": { "tags": "a" }, "name": "x" },
                &extended(),
            ),
            doc! { "$inc": { "age": 1 }, "$push": { "tags": "a" } }
        );
    }

    #[test]
    fn plain_payload_wrapped_even_when_allowed() {
        assert_eq!(
            parse_update_data(doc! { "name": "x" }, &extended()),
            doc! { "$set": { "name": "x" } }
        );
    }

    #[test]
    fn empty_payload() {
        assert_eq!(parse_update_data(doc! {}, &extended()), doc! {});
        assert_eq!(parse_update_data(doc! {}, &Policy::default()), doc! {});
    }
}
