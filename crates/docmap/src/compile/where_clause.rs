use crate::coerce::{self, geo};

use docmap_core::{schema::Model, schema::Property, Error, Policy, Result};

use bson::{doc, Bson, Document, Regex};

/// Keys stripped from every level of a where clause before compilation.
const SANITIZED_KEYS: &[&str] = &["$where", "mapReduce"];

/// Modifier key that may accompany an operator tag, e.g. regex flags for
/// `like`.
const OPTIONS_KEY: &str = "options";

/// Keys that may accompany `near`.
const NEAR_KEYS: &[&str] = &["near", "maxDistance", "minDistance", "unit", OPTIONS_KEY];

/// BSON type number for `null`.
const BSON_TYPE_NULL: i32 = 10;

/// Compiles an abstract where clause into a native query document.
///
/// `None` compiles to the empty query. The input is only borrowed, so the
/// caller's filter is never modified.
pub fn build_where(model: &Model, where_: Option<&Document>, policy: &Policy) -> Result<Document> {
    match where_ {
        Some(where_) => Compiler { model, policy }.compile(where_),
        None => Ok(Document::new()),
    }
}

/// Returns `true` when any condition of the where clause is a geo-proximity
/// query. Such results are already ordered by distance.
pub fn has_near_filter(where_: Option<&Document>) -> bool {
    where_.is_some_and(contains_near)
}

/// Looks for a `near` spec at any depth, including inside `and`/`or`/`nor`
/// branches.
fn contains_near(where_: &Document) -> bool {
    where_.values().any(|cond| match cond {
        Bson::Document(spec) => spec.contains_key("near") || contains_near(spec),
        Bson::Array(items) => items
            .iter()
            .filter_map(Bson::as_document)
            .any(contains_near),
        _ => false,
    })
}

struct Compiler<'a> {
    model: &'a Model,
    policy: &'a Policy,
}

/// The role a where-clause key plays once resolved against the model.
struct Target<'a> {
    field: String,
    property: Option<&'a Property>,
    is_id: bool,
}

impl Compiler<'_> {
    fn compile(&self, where_: &Document) -> Result<Document> {
        let mut query = Document::new();

        for (key, cond) in where_ {
            if SANITIZED_KEYS.contains(&key.as_str()) {
                continue;
            }

            if let "and" | "or" | "nor" = key.as_str() {
                query.insert(format!("${key}"), self.compile_combinator(key, cond)?);
                continue;
            }

            let target = self.resolve(key);
            let cond = self.compile_condition(&target, cond)?;
            query.insert(target.field, cond);
        }

        Ok(query)
    }

    /// A lone document is treated as a one-element branch list.
    fn compile_combinator(&self, key: &str, cond: &Bson) -> Result<Bson> {
        let children = match cond {
            Bson::Array(children) => children.as_slice(),
            Bson::Document(_) => std::slice::from_ref(cond),
            other => {
                return Err(Error::invalid_format(format!(
                    "`{key}` expects an array of conditions, got {other}"
                )))
            }
        };

        children
            .iter()
            .map(|child| match child {
                Bson::Document(child) => self.compile(child).map(Bson::Document),
                _ => Ok(Bson::Document(Document::new())),
            })
            .collect::<Result<Vec<_>>>()
            .map(Bson::Array)
    }

    fn resolve<'m>(&'m self, key: &str) -> Target<'m> {
        if key == self.model.id_name() {
            Target {
                field: "_id".to_string(),
                property: self.model.id_property(),
                is_id: true,
            }
        } else {
            Target {
                field: self.model.column_name(key).to_string(),
                property: self.model.property(key),
                is_id: false,
            }
        }
    }

    fn compile_condition(&self, target: &Target<'_>, cond: &Bson) -> Result<Bson> {
        match cond {
            Bson::Null if self.policy.null_matches_absent => Ok(Bson::Null),
            Bson::Null => Ok(Bson::Document(doc! { "$type": BSON_TYPE_NULL })),
            Bson::Document(spec) if is_near_spec(spec) => Ok(self.compile_near(spec)),
            Bson::Document(spec) => match operator_of(spec, target.property) {
                Some((tag, operand)) => self.compile_operator(target, tag, operand, spec),
                None => Ok(cond.clone()),
            },
            _ => self.coerce(target, cond.clone()),
        }
    }

    fn compile_operator(
        &self,
        target: &Target<'_>,
        tag: &str,
        operand: &Bson,
        spec: &Document,
    ) -> Result<Bson> {
        let compiled = match tag {
            "between" => {
                let (from, to) = match operand {
                    Bson::Array(bounds) => (
                        bounds.first().cloned().unwrap_or(Bson::Null),
                        bounds.get(1).cloned().unwrap_or(Bson::Null),
                    ),
                    _ => (Bson::Null, Bson::Null),
                };
                doc! {
                    "$gte": self.coerce(target, from)?,
                    "$lte": self.coerce(target, to)?,
                }
            }
            "inq" | "in" => doc! { "$in": self.coerce_each(target, operand)? },
            "nin" => doc! { "$nin": self.coerce_each(target, operand)? },
            "like" => doc! { "$regex": like_pattern(operand, spec) },
            "nlike" => doc! { "$not": like_pattern(operand, spec) },
            "neq" | "ne" => doc! { "$ne": self.coerce(target, operand.clone())? },
            "regexp" => doc! { "$regex": regexp_pattern(operand) },
            "gt" | "gte" | "lt" | "lte" | "eq" => {
                let mut compiled = Document::new();
                compiled.insert(format!("${tag}"), self.coerce(target, operand.clone())?);
                compiled
            }
            _ => {
                let mut compiled = Document::new();
                compiled.insert(format!("${tag}"), operand.clone());
                compiled
            }
        };

        Ok(Bson::Document(compiled))
    }

    fn compile_near(&self, spec: &Document) -> Bson {
        let Some((lat, lng)) = spec.get("near").and_then(geo::lat_lng_of) else {
            return Bson::Document(doc! { "$near": spec.get("near").cloned().unwrap_or(Bson::Null) });
        };

        let scale = spec
            .get_str("unit")
            .map(meters_per_unit)
            .unwrap_or(1.0);
        let max = spec.get("maxDistance").and_then(geo::number).map(|d| d * scale);
        let min = spec.get("minDistance").and_then(geo::number).map(|d| d * scale);

        if self.policy.enable_geo_indexing {
            let mut near = doc! { "$geometry": geo::point_document(lat, lng) };
            if let Some(max) = max {
                near.insert("$maxDistance", max);
            }
            if let Some(min) = min {
                near.insert("$minDistance", min);
            }
            Bson::Document(doc! { "$near": near })
        } else {
            let mut near = doc! { "$near": [lng, lat] };
            if let Some(max) = max {
                near.insert("$maxDistance", max);
            }
            Bson::Document(near)
        }
    }

    /// Converts a single operand to its storage representation.
    fn coerce(&self, target: &Target<'_>, value: Bson) -> Result<Bson> {
        if target.is_id {
            return coerce::coerce_id(self.model, value, self.policy);
        }

        match target.property {
            Some(property) if property.is_decimal128() => coerce::coerce_decimal128(value),
            property => coerce::coerce_to_object_id(property, value, self.policy),
        }
    }

    fn coerce_each(&self, target: &Target<'_>, operand: &Bson) -> Result<Bson> {
        let items = match operand {
            Bson::Array(items) => items.clone(),
            Bson::Null => vec![],
            other => vec![other.clone()],
        };

        items
            .into_iter()
            .map(|item| self.coerce(target, item))
            .collect::<Result<Vec<_>>>()
            .map(Bson::Array)
    }
}

/// Decides whether `spec` is an operator spec and, if so, returns its tag
/// (with any leading `$` removed) and operand.
///
/// A document with exactly one key besides `options` is an operator spec,
/// unless the property is declared object-shaped, in which case it is a
/// literal value. This misreads a legitimate single-key literal on a
/// property that is not declared object-shaped.
fn operator_of<'a>(spec: &'a Document, property: Option<&Property>) -> Option<(&'a str, &'a Bson)> {
    if property.is_some_and(Property::is_nested) {
        return None;
    }

    let mut keys = spec.iter().filter(|(key, _)| key.as_str() != OPTIONS_KEY);

    match (keys.next(), keys.next()) {
        (Some((tag, operand)), None) => Some((tag.trim_start_matches('$'), operand)),
        _ => None,
    }
}

fn is_near_spec(spec: &Document) -> bool {
    spec.contains_key("near") && spec.keys().all(|key| NEAR_KEYS.contains(&key.as_str()))
}

fn like_pattern(operand: &Bson, spec: &Document) -> Bson {
    match operand {
        Bson::RegularExpression(_) => operand.clone(),
        Bson::String(pattern) => Bson::RegularExpression(Regex {
            pattern: pattern.clone(),
            options: sorted_flags(spec.get_str(OPTIONS_KEY).unwrap_or_default()),
        }),
        other => Bson::RegularExpression(Regex {
            pattern: other.to_string(),
            options: sorted_flags(spec.get_str(OPTIONS_KEY).unwrap_or_default()),
        }),
    }
}

/// `regexp` accepts a native regex or a `/pattern/flags` string. The global
/// flag has no server equivalent and is dropped.
fn regexp_pattern(operand: &Bson) -> Bson {
    let (pattern, flags) = match operand {
        Bson::RegularExpression(regex) => (regex.pattern.clone(), regex.options.clone()),
        Bson::String(s) => match split_regex_literal(s) {
            Some((pattern, flags)) => (pattern.to_string(), flags.to_string()),
            None => (s.clone(), String::new()),
        },
        other => return other.clone(),
    };

    if flags.contains('g') {
        tracing::warn!(%pattern, "MongoDB regex syntax does not respect the `g` flag");
    }

    Bson::RegularExpression(Regex {
        pattern,
        options: sorted_flags(&flags.replace('g', "")),
    })
}

fn split_regex_literal(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (pattern, flags) = (&rest[..end], &rest[end + 1..]);

    flags
        .chars()
        .all(|c| c.is_ascii_alphabetic())
        .then_some((pattern, flags))
}

/// The server expects regex flags in alphabetical order.
fn sorted_flags(flags: &str) -> String {
    let mut flags: Vec<char> = flags.chars().collect();
    flags.sort_unstable();
    flags.dedup();
    flags.into_iter().collect()
}

fn meters_per_unit(unit: &str) -> f64 {
    match unit {
        "kilometers" => 1000.0,
        "miles" => 1609.344,
        "feet" => 0.3048,
        _ => 1.0,
    }
}
