//! Persistence Gateway
//!
//! A single MongoDB connection shared across all requests for the process
//! lifetime. The first `ensure_connected` call establishes the connection;
//! later calls return the cached handle.

use mongodb::{Client, Database};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{ContentError, Result};

pub struct Gateway {
    mongo_url: String,
    mongo_db: String,
    client: OnceCell<Client>,
}

impl Gateway {
    pub fn new(mongo_url: impl Into<String>, mongo_db: impl Into<String>) -> Self {
        Self {
            mongo_url: mongo_url.into(),
            mongo_db: mongo_db.into(),
            client: OnceCell::new(),
        }
    }

    /// Returns the database handle, connecting on first use.
    ///
    /// Concurrent first calls race on the connect; OnceCell keeps exactly one
    /// winning client. No automatic retry: a failed connect surfaces as a
    /// `Connection` error and the next call starts over.
    pub async fn ensure_connected(&self) -> Result<Database> {
        if self.mongo_url.is_empty() {
            return Err(ContentError::connection("store connection string is not set"));
        }

        let client = self
            .client
            .get_or_try_init(|| async {
                info!("Connecting to MongoDB: {}/{}", self.mongo_url, self.mongo_db);
                Client::with_uri_str(&self.mongo_url).await
            })
            .await
            .map_err(|e| ContentError::connection(format!("store unreachable: {}", e)))?;

        Ok(client.database(&self.mongo_db))
    }
}
