use docmap_core::{filter::Order, schema::Model, Policy};

use bson::Document;
use regex::Regex;
use std::sync::LazyLock;

static DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(A|DE)SC$").expect("valid direction pattern"));

/// Compiles an ordering into a native sort document.
///
/// Without an explicit order the identifier properties sort ascending,
/// unless default sorting is disabled, in which case the result is empty
/// and the engine's natural order applies.
pub fn build_sort(model: &Model, order: Option<&Order>, policy: &Policy) -> Document {
    let entries = match order {
        Some(order) => order.entries(),
        None if policy.disable_default_sort => return Document::new(),
        None => model.id_names(),
    };

    let mut sort = Document::new();

    for entry in entries {
        let entry = entry.trim();

        let (name, direction) = match DIRECTION.captures(entry) {
            Some(captures) => {
                let descending = captures[1].eq_ignore_ascii_case("DE");
                let name = entry[..captures.get(0).map_or(entry.len(), |m| m.start())].trim();
                (name, if descending { -1 } else { 1 })
            }
            None => (entry, 1),
        };

        if name.is_empty() {
            continue;
        }

        let field = if name == model.id_name() {
            "_id"
        } else {
            model.column_name(name)
        };

        sort.insert(field, direction);
    }

    sort
}
