use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ordering applied to a listing; `descending` is MongoDB's `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub descending: bool,
}

impl Sort {
    pub const fn descending(field: &'static str) -> Self {
        Sort { field, descending: true }
    }

    pub fn to_document(self) -> Document {
        let mut order = Document::new();
        order.insert(self.field, if self.descending { -1 } else { 1 });
        order
    }
}

/// Counts reported by a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentCollection: Send + Sync + 'static {
    /// Every document matching `filter`, in store order unless `sort` is given.
    async fn find(&self, filter: Document, sort: Option<Sort>) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>>;

    /// Inserts `doc`, assigning an `_id` when it has none, and returns that id.
    async fn insert_one(&self, doc: Document) -> StoreResult<ObjectId>;

    /// Applies `set` (a `$set` body) to the first document matching `filter`.
    async fn update_one(&self, filter: Document, set: Document) -> StoreResult<UpdateCounts>;

    /// Removes the first document matching `filter`; returns how many were removed.
    async fn delete_one(&self, filter: Document) -> StoreResult<u64>;
}

/// A database handle that hands out collections by name.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;

    /// Round-trips to the backend to prove it is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
