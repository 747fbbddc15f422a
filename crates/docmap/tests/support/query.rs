//! Evaluation of the native query and update subset the connector emits.

use docmap::bson::{Bson, Document};

use regex::RegexBuilder;
use std::cmp::Ordering;

pub fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, cond)| match key.as_str() {
        "$and" => children(cond).all(|child| matches(document, child)),
        "$or" => children(cond).any(|child| matches(document, child)),
        "$nor" => !children(cond).any(|child| matches(document, child)),
        _ => field_matches(lookup(document, key), cond),
    })
}

/// Builds the base of an upserted document from the filter's equality
/// conditions.
pub fn seed_from_filter(filter: &Document) -> Document {
    filter
        .iter()
        .filter(|(key, _)| !key.starts_with('$'))
        .filter(|(_, cond)| !matches!(cond, Bson::Document(ops) if is_operator_document(ops)))
        .filter(|(_, cond)| !matches!(cond, Bson::RegularExpression(_)))
        .map(|(key, cond)| (key.clone(), cond.clone()))
        .collect()
}

pub fn apply_update(document: &mut Document, update: &Document, inserting: bool) {
    for (operator, fields) in update {
        let Some(fields) = fields.as_document() else {
            continue;
        };

        for (path, value) in fields {
            match operator.as_str() {
                "$set" => set_path(document, path, value.clone()),
                "$setOnInsert" => {
                    if inserting {
                        set_path(document, path, value.clone());
                    }
                }
                "$unset" => {
                    document.remove(path);
                }
                "$inc" => {
                    let sum = add(lookup(document, path), value);
                    set_path(document, path, sum);
                }
                "$push" => match document.get_mut(path) {
                    Some(Bson::Array(items)) => items.push(value.clone()),
                    _ => set_path(document, path, Bson::Array(vec![value.clone()])),
                },
                other => panic!("unsupported update operator {other}"),
            }
        }
    }
}

pub fn sort_documents(documents: &mut [Document], sort: &Document) {
    documents.sort_by(|a, b| {
        for (key, direction) in sort {
            let ordering = sort_order(lookup(a, key), lookup(b, key));
            let ordering = if direction.as_i32() == Some(-1) {
                ordering.reverse()
            } else {
                ordering
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

pub fn project(document: Document, projection: Option<&Document>) -> Document {
    let Some(projection) = projection else {
        return document;
    };

    let inclusive = projection
        .iter()
        .any(|(key, flag)| key != "_id" && truthy(flag));
    let id_excluded = projection.get("_id").is_some_and(|flag| !truthy(flag));

    document
        .into_iter()
        .filter(|(key, _)| {
            if key == "_id" {
                return !id_excluded;
            }

            match projection.get(key) {
                Some(flag) => truthy(flag),
                None => !inclusive,
            }
        })
        .collect()
}

fn children(cond: &Bson) -> impl Iterator<Item = &Document> {
    cond.as_array()
        .into_iter()
        .flatten()
        .filter_map(Bson::as_document)
}

fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;

    for part in parts {
        current = current.as_document()?.get(part)?;
    }

    Some(current)
}

fn set_path(document: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(document.get(head), Some(Bson::Document(_))) {
                document.insert(head, Document::new());
            }
            if let Some(Bson::Document(nested)) = document.get_mut(head) {
                set_path(nested, rest, value);
            }
        }
    }
}

fn is_operator_document(document: &Document) -> bool {
    document.keys().next().is_some_and(|key| key.starts_with('$'))
}

fn field_matches(value: Option<&Bson>, cond: &Bson) -> bool {
    match cond {
        Bson::Document(ops) if is_operator_document(ops) => ops
            .iter()
            .all(|(op, arg)| operator_matches(value, op, arg, ops)),
        Bson::RegularExpression(regex) => {
            any_candidate(value, |v| regex_matches(v, &regex.pattern, &regex.options))
        }
        _ => equals(value, cond),
    }
}

fn operator_matches(value: Option<&Bson>, op: &str, arg: &Bson, ops: &Document) -> bool {
    match op {
        "$eq" => equals(value, arg),
        "$ne" => !equals(value, arg),
        "$gt" => any_candidate(value, |v| compare(v, arg) == Some(Ordering::Greater)),
        "$gte" => any_candidate(value, |v| {
            matches!(compare(v, arg), Some(Ordering::Greater | Ordering::Equal))
        }),
        "$lt" => any_candidate(value, |v| compare(v, arg) == Some(Ordering::Less)),
        "$lte" => any_candidate(value, |v| {
            matches!(compare(v, arg), Some(Ordering::Less | Ordering::Equal))
        }),
        "$in" => arg
            .as_array()
            .is_some_and(|items| items.iter().any(|item| equals(value, item))),
        "$nin" => !arg
            .as_array()
            .is_some_and(|items| items.iter().any(|item| equals(value, item))),
        "$regex" => {
            let (pattern, options) = match arg {
                Bson::RegularExpression(regex) => (regex.pattern.clone(), regex.options.clone()),
                Bson::String(pattern) => (
                    pattern.clone(),
                    ops.get_str("$options").unwrap_or_default().to_string(),
                ),
                _ => return false,
            };
            any_candidate(value, |v| regex_matches(v, &pattern, &options))
        }
        "$not" => !field_matches(value, arg),
        "$type" => match arg {
            Bson::Int32(10) | Bson::Int64(10) => matches!(value, Some(Bson::Null)),
            Bson::String(name) if name == "null" => matches!(value, Some(Bson::Null)),
            other => panic!("unsupported $type {other}"),
        },
        "$exists" => value.is_some() == arg.as_bool().unwrap_or(true),
        "$options" | "$near" | "$maxDistance" | "$minDistance" => true,
        other => panic!("unsupported query operator {other}"),
    }
}

/// Applies `f` to the value, or to each element when it is an array.
fn any_candidate(value: Option<&Bson>, f: impl Fn(&Bson) -> bool) -> bool {
    match value {
        Some(Bson::Array(items)) => items.iter().any(&f),
        Some(value) => f(value),
        None => false,
    }
}

fn equals(value: Option<&Bson>, cond: &Bson) -> bool {
    match (value, cond) {
        (None, Bson::Null) => true,
        (None, _) => false,
        (Some(Bson::Array(items)), cond) if !matches!(cond, Bson::Array(_)) => {
            items.iter().any(|item| bson_eq(item, cond))
        }
        (Some(value), cond) => bson_eq(value, cond),
    }
}

fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (number(a), number(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (number(a), number(b)) {
        return a.partial_cmp(&b);
    }

    match (a, b) {
        (Bson::Decimal128(a), Bson::Decimal128(b)) => {
            let a: f64 = a.to_string().parse().ok()?;
            let b: f64 = b.to_string().parse().ok()?;
            a.partial_cmp(&b)
        }
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => Some(a.bytes().cmp(&b.bytes())),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Missing and `null` sort before every other value.
fn sort_order(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let a = a.filter(|v| !matches!(v, Bson::Null));
    let b = b.filter(|v| !matches!(v, Bson::Null));

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn add(current: Option<&Bson>, by: &Bson) -> Bson {
    match (current, by) {
        (None, by) => by.clone(),
        (Some(Bson::Int32(a)), Bson::Int32(b)) => Bson::Int32(a + b),
        (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a + b),
        (Some(Bson::Int32(a)), Bson::Int64(b)) => Bson::Int64(i64::from(*a) + b),
        (Some(Bson::Int64(a)), Bson::Int32(b)) => Bson::Int64(a + i64::from(*b)),
        (Some(a), b) => Bson::Double(number(a).unwrap_or(0.0) + number(b).unwrap_or(0.0)),
    }
}

fn truthy(flag: &Bson) -> bool {
    match flag {
        Bson::Boolean(b) => *b,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0,
        _ => true,
    }
}

fn regex_matches(value: &Bson, pattern: &str, options: &str) -> bool {
    let Bson::String(value) = value else {
        return false;
    };

    RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .multi_line(options.contains('m'))
        .dot_matches_new_line(options.contains('s'))
        .build()
        .is_ok_and(|regex| regex.is_match(value))
}
