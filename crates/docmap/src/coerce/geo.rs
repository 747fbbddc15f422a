use bson::{doc, Bson, Document};

/// `{lat, lng}` to a GeoJSON point. Anything else passes through.
pub(super) fn to_geojson(value: Bson) -> Bson {
    match &value {
        Bson::Document(point) => match lat_lng(point) {
            Some((lat, lng)) => Bson::Document(point_document(lat, lng)),
            None => value,
        },
        _ => value,
    }
}

/// GeoJSON point back to `{lat, lng}`. Anything else passes through.
pub(super) fn from_geojson(value: Bson) -> Bson {
    let Bson::Document(point) = &value else {
        return value;
    };

    if point.get_str("type").ok() != Some("Point") {
        return value;
    }

    match point.get_array("coordinates").ok().map(Vec::as_slice) {
        Some([lng, lat]) => match (number(lng), number(lat)) {
            (Some(lng), Some(lat)) => Bson::Document(doc! { "lat": lat, "lng": lng }),
            _ => value,
        },
        _ => value,
    }
}

pub(crate) fn point_document(lat: f64, lng: f64) -> Document {
    doc! {
        "type": "Point",
        "coordinates": [lng, lat],
    }
}

/// Reads a point given as `{lat, lng}`, `[lat, lng]` or `"lat,lng"`.
pub(crate) fn lat_lng_of(value: &Bson) -> Option<(f64, f64)> {
    match value {
        Bson::Document(point) => lat_lng(point),
        Bson::Array(items) => match items.as_slice() {
            [lat, lng] => Some((number(lat)?, number(lng)?)),
            _ => None,
        },
        Bson::String(s) => {
            let (lat, lng) = s.split_once(',')?;
            Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
        }
        _ => None,
    }
}

fn lat_lng(point: &Document) -> Option<(f64, f64)> {
    Some((number(point.get("lat")?)?, number(point.get("lng")?)?))
}

pub(crate) fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(n) => Some(*n),
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        _ => None,
    }
}
