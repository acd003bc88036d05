// Ids go out as hex strings and dates as RFC 3339, never as {"$oid": ...} wrappers.

use chrono::{SecondsFormat, TimeZone, Utc};
use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use crate::id;

pub fn document_to_json(doc: Document) -> Value {
    let mut object = Map::with_capacity(doc.len());
    for (key, value) in doc {
        object.insert(key, to_json(value));
    }
    Value::Object(object)
}

pub fn documents_to_json(docs: Vec<Document>) -> Value {
    Value::Array(docs.into_iter().map(document_to_json).collect())
}

pub fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(id::encode(&oid)),
        Bson::DateTime(dt) => match Utc.timestamp_millis_opt(dt.timestamp_millis()).single() {
            Some(at) => Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => Value::Null,
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(n) => Number::from_f64(n).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};
    use serde_json::json;

    #[test]
    fn renders_ids_and_dates_as_strings() {
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let at = DateTime::from_millis(1_700_000_000_123);
        let doc = doc! {
            "_id": id,
            "submittedAt": at,
            "tags": ["a", 1_i32],
            "nested": { "price": 20.5 },
            "missing": Bson::Null,
        };

        assert_eq!(
            document_to_json(doc),
            json!({
                "_id": "507f1f77bcf86cd799439011",
                "submittedAt": "2023-11-14T22:13:20.123Z",
                "tags": ["a", 1],
                "nested": { "price": 20.5 },
                "missing": null,
            })
        );
    }

    #[test]
    fn non_finite_doubles_become_null() {
        assert_eq!(to_json(Bson::Double(f64::NAN)), Value::Null);
    }
}
