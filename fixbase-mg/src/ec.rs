//! MongoDB Executor
//!
//! Connection lifecycle and simple retrieval over a document database. One
//! client per executor instance, connected on [`MongoExecutor::connect`] and
//! released on [`MongoExecutor::close`].

use std::time::Duration;

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::Collection;
use tracing::{debug, info};

use crate::{MgError, MgResult};

/// unconditional settle delay before a one-shot query, allowing eventual
/// consistency in the target cluster to catch up (a fixed pause, not a
/// timeout)
const SETTLE_DELAY: Duration = Duration::from_secs(2);

pub struct MongoExecutor {
    uri: String,
    pub database: String,
    client: Option<mongodb::Client>,
}

impl MongoExecutor {
    /// Create a new executor. The connection is opened separately via
    /// [`MongoExecutor::connect`].
    pub fn new<U, T>(uri: U, database: T) -> Self
    where
        U: Into<String>,
        T: Into<String>,
    {
        MongoExecutor {
            uri: uri.into(),
            database: database.into(),
            client: None,
        }
    }

    /// open the client connection from the connection URI
    pub async fn connect(&mut self) -> MgResult<()> {
        let co = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| MgError::Connection(format!("cannot parse client uri: {e}")))?;
        let client = mongodb::Client::with_options(co)
            .map_err(|e| MgError::Connection(format!("cannot build client: {e}")))?;

        info!("connected to document store, database {}", self.database);
        self.client = Some(client);
        Ok(())
    }

    /// Release the connection. Fails if the connection was never opened or
    /// has already been closed.
    pub fn close(&mut self) -> MgResult<()> {
        match self.client.take() {
            Some(_) => {
                info!("closing document store connection");
                Ok(())
            }
            None => Err(MgError::ConnectionNotEstablished),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub(crate) fn client(&self) -> MgResult<&mongodb::Client> {
        self.client.as_ref().ok_or(MgError::ConnectionNotEstablished)
    }

    /// handle to a named collection for direct use
    pub fn collection(&self, name: &str) -> MgResult<Collection<Document>> {
        Ok(self.client()?.database(&self.database).collection(name))
    }

    /// One-shot query: waits out the settle delay, connects if needed,
    /// returns the first matching document (or `None`).
    ///
    /// Side effect: the connection is **closed** before returning, unlike
    /// every other operation. Callers must not assume the connection
    /// persists afterwards.
    pub async fn find_one_by_query(
        &mut self,
        collection_name: &str,
        query: Document,
    ) -> MgResult<Option<Document>> {
        tokio::time::sleep(SETTLE_DELAY).await;

        if self.client.is_none() {
            self.connect().await?;
        }
        let collection = self.collection(collection_name)?;

        debug!("query -> {}", query);
        let found = collection.find_one(query, None).await?;
        if let Some(doc) = found.as_ref() {
            debug!("response -> {}", doc);
        }

        self.close()?;
        Ok(found)
    }

    /// enumerate and log every document in a collection, diagnostic only
    pub async fn list_all(&self, collection: &Collection<Document>) -> MgResult<()> {
        let mut cursor = collection.find(None, None).await?;
        while let Some(document) = cursor.try_next().await? {
            info!("{}", document);
        }
        Ok(())
    }

    /// diagnostic listing by collection name
    pub async fn list_all_by_name(&self, name: &str) -> MgResult<()> {
        info!("listing collection: {}", name);
        let collection = self.collection(name)?;
        self.list_all(&collection).await
    }

    /// remove the document whose `_id` equals `id`; no-op when absent
    pub async fn delete_by_id(
        &self,
        collection: &Collection<Document>,
        id: impl Into<Bson>,
    ) -> MgResult<()> {
        collection.delete_one(doc! { "_id": id.into() }, None).await?;
        Ok(())
    }

    /// fetch the document whose `_id` equals `id`
    pub async fn get_by_id(
        &self,
        collection: &Collection<Document>,
        id: impl Into<Bson>,
    ) -> MgResult<Option<Document>> {
        Ok(collection.find_one(doc! { "_id": id.into() }, None).await?)
    }
}
