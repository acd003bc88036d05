// In-process store: top-level equality filters (null also matches a missing field),
// single-field sorts, $set updates and single deletes.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::store::{DocumentCollection, DocumentStore, Sort, StoreError, StoreResult, UpdateCounts};

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Arc<MemoryCollection>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections.entry(name.to_string()).or_default().clone()
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: Document, sort: Option<Sort>) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<Document> = documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect();
        if let Some(sort) = sort {
            found.sort_by(|a, b| {
                let ordering = compare_fields(a.get(sort.field), b.get(sort.field));
                if sort.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        Ok(found)
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.iter().find(|doc| matches(doc, &filter)).cloned())
    }

    async fn insert_one(&self, doc: Document) -> StoreResult<ObjectId> {
        let id = match doc.get("_id") {
            None => ObjectId::new(),
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => return Err(StoreError::UnexpectedId(other.to_string())),
        };
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }

        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored);
        Ok(id)
    }

    async fn update_one(&self, filter: Document, set: Document) -> StoreResult<UpdateCounts> {
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        let Some(doc) = documents.iter_mut().find(|doc| matches(doc, &filter)) else {
            return Ok(UpdateCounts::default());
        };
        let mut modified = false;
        for (key, value) in set {
            if doc.get(&key) != Some(&value) {
                modified = true;
                doc.insert(key, value);
            }
        }
        Ok(UpdateCounts {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        match documents.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match doc.get(key) {
        Some(actual) => values_equal(actual, expected),
        None => matches!(expected, Bson::Null),
    })
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

// Missing fields sort before everything else, as in MongoDB.
fn compare_fields(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.timestamp_millis().cmp(&y.timestamp_millis()),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        _ => 12,
    }
}
