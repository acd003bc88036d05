use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use serde::Serialize;

use crate::models::{CompareItem, Message, Order, Product, Review, User, WishlistItem};
use crate::store::{DocumentCollection, DocumentStore, Sort, StoreResult, UpdateCounts};

pub trait Resource: Serialize + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Order applied to every listing of this resource.
    const LIST_ORDER: Option<Sort> = None;

    /// Stamps computed fields onto a document about to be inserted.
    fn prepare(_doc: &mut Document) {}
}

/// A resource that is inserted only when no document shares its uniqueness key.
pub trait Unique: Resource {
    const DUPLICATE_MESSAGE: &'static str;

    fn uniqueness(&self) -> FieldEquality;
}

/// An allow-listed set of fields that may be written to documents of `R`.
pub trait FieldSet<R: Resource> {
    /// The `$set` body; fields the caller left out are not included.
    fn into_set(self) -> Document;
}

/// Equality filter on one or more top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEquality(Document);

impl FieldEquality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.0.insert(field, value);
        self
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub inserted_id: ObjectId,
}

/// Body returned in place of an [`InsertResult`] when a duplicate was detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateNotice {
    pub message: &'static str,
    pub inserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(InsertResult),
    AlreadyExists(DuplicateNotice),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl From<UpdateCounts> for UpdateResult {
    fn from(counts: UpdateCounts) -> Self {
        UpdateResult {
            acknowledged: true,
            matched_count: counts.matched,
            modified_count: counts.modified,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

pub struct Repository<R> {
    collection: Arc<dyn DocumentCollection>,
    resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(store: &dyn DocumentStore) -> Self {
        Repository {
            collection: store.collection(R::COLLECTION),
            resource: PhantomData,
        }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Document>> {
        self.collection.find(Document::new(), R::LIST_ORDER).await
    }

    pub async fn list_by_filter(&self, filter: FieldEquality) -> StoreResult<Vec<Document>> {
        self.collection
            .find(filter.into_document(), R::LIST_ORDER)
            .await
    }

    pub async fn get_by_id(&self, id: ObjectId) -> StoreResult<Option<Document>> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    pub async fn get_by_filter(&self, filter: FieldEquality) -> StoreResult<Option<Document>> {
        self.collection.find_one(filter.into_document()).await
    }

    pub async fn insert(&self, record: &R) -> StoreResult<InsertResult> {
        let mut doc = bson::to_document(record)?;
        // Identifiers are always assigned by the store.
        doc.remove("_id");
        R::prepare(&mut doc);

        let inserted_id = self.collection.insert_one(doc).await?;
        log::debug!("inserted {} into {}", inserted_id, R::COLLECTION);
        Ok(InsertResult {
            acknowledged: true,
            inserted_id,
        })
    }

    pub async fn update_fields<P: FieldSet<R>>(
        &self,
        id: ObjectId,
        patch: P,
    ) -> StoreResult<UpdateResult> {
        let set = patch.into_set();
        let filter = doc! { "_id": id };
        let counts = if set.is_empty() {
            // An empty $set is rejected by MongoDB; report the match without writing.
            let matched = self.collection.find_one(filter).await?.is_some();
            UpdateCounts {
                matched: u64::from(matched),
                modified: 0,
            }
        } else {
            self.collection.update_one(filter, set).await?
        };
        Ok(counts.into())
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> StoreResult<DeleteResult> {
        let deleted_count = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}

impl<R: Unique> Repository<R> {
    /// Check-then-insert. Not atomic: two concurrent submissions of the same key can both
    /// pass the lookup.
    pub async fn insert_if_absent(&self, record: &R) -> StoreResult<InsertOutcome> {
        let existing = self
            .collection
            .find_one(record.uniqueness().into_document())
            .await?;
        if existing.is_some() {
            return Ok(InsertOutcome::AlreadyExists(DuplicateNotice {
                message: R::DUPLICATE_MESSAGE,
                inserted_id: None,
            }));
        }
        self.insert(record).await.map(InsertOutcome::Inserted)
    }
}

/// Every repository the route layer serves, built once at startup.
pub struct Repositories {
    pub products: Repository<Product>,
    pub orders: Repository<Order>,
    pub users: Repository<User>,
    pub reviews: Repository<Review>,
    pub wishlist: Repository<WishlistItem>,
    pub compare: Repository<CompareItem>,
    pub messages: Repository<Message>,
}

impl Repositories {
    pub fn new(store: &dyn DocumentStore) -> Self {
        Repositories {
            products: Repository::new(store),
            orders: Repository::new(store),
            users: Repository::new(store),
            reviews: Repository::new(store),
            wishlist: Repository::new(store),
            compare: Repository::new(store),
            messages: Repository::new(store),
        }
    }
}
