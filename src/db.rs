use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection, Database};

use crate::store::{DocumentCollection, DocumentStore, Sort, StoreError, StoreResult, UpdateCounts};

/// MongoDB-backed store. The driver pools connections internally, so one handle is shared by
/// every worker.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        // Parse the connection string into client options
        let client_options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(database);
        Ok(MongoStore { client, db })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection(self.db.collection::<Document>(name)))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

struct MongoCollection(Collection<Document>);

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: Document, sort: Option<Sort>) -> StoreResult<Vec<Document>> {
        let options = sort.map(|sort| FindOptions::builder().sort(sort.to_document()).build());
        let mut cursor = self.0.find(filter, options).await?;
        let mut documents = vec![];
        while let Some(result) = cursor.next().await {
            documents.push(result?);
        }
        Ok(documents)
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.0.find_one(filter, None).await?)
    }

    async fn insert_one(&self, doc: Document) -> StoreResult<ObjectId> {
        let result = self.0.insert_one(doc, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn update_one(&self, filter: Document, set: Document) -> StoreResult<UpdateCounts> {
        let result = self.0.update_one(filter, doc! { "$set": set }, None).await?;
        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = self.0.delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }
}
