//! Subscriber Repository

use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::domain::Subscriber;
use crate::error::Result;

pub struct SubscriberRepository {
    collection: Collection<Subscriber>,
}

impl SubscriberRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("subscribers"),
        }
    }

    pub async fn insert(&self, subscriber: &Subscriber) -> Result<()> {
        self.collection.insert_one(subscriber).await?;
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        let email = email.trim().to_lowercase();
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    pub async fn find_active(&self) -> Result<Vec<Subscriber>> {
        let cursor = self.collection.find(doc! { "status": "active" }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Subscriber>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, subscriber: &Subscriber) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &subscriber.id }, subscriber)
            .await?;
        Ok(())
    }

    pub async fn count_active(&self) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "status": "active" })
            .await?)
    }
}
