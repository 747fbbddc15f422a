use super::{coerce_decimal128, coerce_to_object_id, decimal::decimal128_to_string, geo, is_falsy};

use docmap_core::{
    schema::{Model, Property, PropertyType, ScalarType},
    Policy, Result, Schema,
};

use bson::{Bson, Document};
use indexmap::IndexMap;

/// Converts a caller document into its storage form.
///
/// Every value is coerced against its property definition, recursing into
/// nested objects and arrays of nested objects. Top-level property names are
/// renamed to their storage field names.
pub fn to_database(
    schema: &Schema,
    model: &Model,
    data: Document,
    policy: &Policy,
) -> Result<Document> {
    let data = Visitor { schema, policy }.visit_properties(&model.properties, data)?;

    Ok(data
        .into_iter()
        .map(|(name, value)| (model.column_name(&name).to_string(), value))
        .collect())
}

/// Reshapes a stored document for the caller: storage field names back to
/// property names, decimals back to strings and (with geo indexing) GeoJSON
/// points back to `{lat, lng}`.
pub fn from_database(model: &Model, data: Document, policy: &Policy) -> Document {
    data.into_iter()
        .map(|(column, value)| {
            let name = model
                .property_name_for_column(&column)
                .map(str::to_string)
                .unwrap_or(column);

            let value = match model.property(&name) {
                Some(property) if property.is_decimal128() => decimal128_to_string(value),
                Some(property) if policy.enable_geo_indexing && is_geo_point(property) => {
                    geo::from_geojson(value)
                }
                _ => value,
            };

            (name, value)
        })
        .collect()
}

struct Visitor<'a> {
    schema: &'a Schema,
    policy: &'a Policy,
}

impl Visitor<'_> {
    fn visit_properties(
        &self,
        properties: &IndexMap<String, Property>,
        mut data: Document,
    ) -> Result<Document> {
        for (name, value) in data.iter_mut() {
            if is_falsy(value) {
                continue;
            }

            let coerced = self.visit_value(properties.get(name), std::mem::take(value))?;
            *value = coerced;
        }

        Ok(data)
    }

    fn visit_value(&self, property: Option<&Property>, value: Bson) -> Result<Bson> {
        let Some(property) = property else {
            return coerce_to_object_id(None, value, self.policy);
        };

        if let Some(nested) = self.schema.nested_properties(&property.ty) {
            return self.visit_nested(nested, value);
        }

        if property.is_decimal128() {
            return coerce_decimal128(value);
        }

        if self.policy.enable_geo_indexing && is_geo_point(property) {
            return Ok(geo::to_geojson(value));
        }

        coerce_to_object_id(Some(property), value, self.policy)
    }

    fn visit_nested(&self, nested: &IndexMap<String, Property>, value: Bson) -> Result<Bson> {
        match value {
            Bson::Document(doc) => self.visit_properties(nested, doc).map(Bson::Document),
            Bson::Array(items) => items
                .into_iter()
                .map(|item| self.visit_nested(nested, item))
                .collect::<Result<Vec<_>>>()
                .map(Bson::Array),
            value => Ok(value),
        }
    }
}

fn is_geo_point(property: &Property) -> bool {
    property.ty == PropertyType::Scalar(ScalarType::GeoPoint)
}
