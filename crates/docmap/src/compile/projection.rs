use docmap_core::{filter::Fields, schema::Model};

use bson::{Bson, Document};

/// A compiled field selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Native projection, `None` to return every field
    pub document: Option<Document>,

    /// Whether the identifier is part of the result
    pub id_included: bool,
}

/// Compiles a `fields` selection into a native projection.
pub fn build_projection(model: &Model, fields: Option<&Fields>) -> Projection {
    let id_name = model.id_name();

    let Some(fields) = fields else {
        return Projection {
            document: None,
            id_included: true,
        };
    };

    let id_included = id_included(fields, id_name);
    let mut document = Document::new();

    match fields {
        Fields::List(names) => {
            for name in names {
                document.insert(field_name(model, name), 1);
            }

            if !id_included {
                document.insert("_id", 0);
            }
        }
        Fields::Map(flags) => {
            for (name, flag) in flags {
                document.insert(field_name(model, name), if is_truthy(flag) { 1 } else { 0 });
            }
        }
    }

    Projection {
        document: (!document.is_empty()).then_some(document),
        id_included,
    }
}

/// The identifier is returned when listed, when explicitly included, or when
/// the selection only excludes other fields.
fn id_included(fields: &Fields, id_name: &str) -> bool {
    match fields {
        Fields::List(names) => names.is_empty() || names.iter().any(|name| name == id_name),
        Fields::Map(flags) => match flags.get(id_name) {
            Some(flag) => is_truthy(flag),
            None => flags.values().next().map_or(true, |flag| !is_truthy(flag)),
        },
    }
}

fn field_name<'a>(model: &'a Model, name: &'a str) -> &'a str {
    if name == model.id_name() {
        "_id"
    } else {
        model.column_name(name)
    }
}

fn is_truthy(flag: &Bson) -> bool {
    match flag {
        Bson::Boolean(b) => *b,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0,
        Bson::Null | Bson::Undefined => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use docmap_core::schema::{Property, ScalarType};
    use pretty_assertions::assert_eq;

    fn model() -> Model {
        Model::builder("Person")
            .property("name", Property::new(ScalarType::String).field_name("full_name"))
            .property("age", ScalarType::Number)
            .build()
    }

    #[test]
    fn no_fields() {
        assert_eq!(
            build_projection(&model(), None),
            Projection {
                document: None,
                id_included: true,
            }
        );
    }

    #[test]
    fn list_without_id_excludes_id() {
        let projection = build_projection(&model(), Some(&Fields::from(vec!["name"])));
        assert_eq!(projection.document, Some(doc! { "full_name": 1, "_id": 0 }));
        assert!(!projection.id_included);
    }

    #[test]
    fn list_with_id() {
        let projection = build_projection(&model(), Some(&Fields::from(vec!["id", "age"])));
        assert_eq!(projection.document, Some(doc! { "_id": 1, "age": 1 }));
        assert!(projection.id_included);
    }

    #[test]
    fn map_exclusion_keeps_id() {
        let projection = build_projection(&model(), Some(&Fields::Map(doc! { "age": false })));
        assert_eq!(projection.document, Some(doc! { "age": 0 }));
        assert!(projection.id_included);
    }

    #[test]
    fn map_inclusion_drops_id() {
        let projection = build_projection(&model(), Some(&Fields::Map(doc! { "name": true })));
        assert_eq!(projection.document, Some(doc! { "full_name": 1 }));
        assert!(!projection.id_included);
    }

    #[test]
    fn map_explicit_id_exclusion() {
        let projection = build_projection(
            &model(),
            Some(&Fields::Map(doc! { "id": false, "age": false })),
        );
        assert_eq!(projection.document, Some(doc! { "_id": 0, "age": 0 }));
        assert!(!projection.id_included);
    }
}
