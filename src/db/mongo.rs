use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Database,
};
use std::sync::Arc;
use std::time::Duration;

use super::store::{is_server_timestamp, DocumentStore, StoreError};

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("The API may still work, but trip persistence might be impaired");
        }
    }

    Ok(Arc::new(client))
}

/// `DocumentStore` over one MongoDB database.
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        let collection = self.database.collection::<Document>(collection);
        let id = ObjectId::new();

        collection
            .update_one(doc! { "_id": id }, upsert_update(fields)?)
            .upsert(true)
            .await?;

        Ok(id.to_hex())
    }

    async fn find_by_user(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let collection = self.database.collection::<Document>(collection);

        let cursor = collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|err| StoreError::Read(err.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|err| StoreError::Read(err.to_string()))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.database
            .collection::<Document>(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|err| StoreError::Read(err.to_string()))
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        self.database
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, upsert_update(fields)?)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn recent_by_user(
        &self,
        collection: &str,
        user_id: &str,
        order_by: &str,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let mut sort = Document::new();
        sort.insert(order_by, -1);

        let cursor = self
            .database
            .collection::<Document>(collection)
            .find(doc! { "user_id": user_id })
            .sort(sort)
            .limit(limit)
            .await
            .map_err(|err| StoreError::Read(err.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|err| StoreError::Read(err.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! {"ping": 1})
            .await
            .map(|_| ())
            .map_err(|err| StoreError::Read(err.to_string()))
    }
}

/// Update document for an upsert of `fields`.
///
/// Sentinel fields become `$currentDate` so the server clock stamps them.
fn upsert_update(fields: Document) -> Result<Document, StoreError> {
    let mut set = Document::new();
    let mut current_date = Document::new();
    for (key, value) in fields {
        if is_server_timestamp(&value) {
            current_date.insert(key, doc! { "$type": "date" });
        } else {
            set.insert(key, value);
        }
    }

    let mut update = Document::new();
    if !set.is_empty() {
        update.insert("$set", set);
    }
    if !current_date.is_empty() {
        update.insert("$currentDate", current_date);
    }
    if update.is_empty() {
        return Err(StoreError::Malformed("document has no fields".to_string()));
    }
    Ok(update)
}
