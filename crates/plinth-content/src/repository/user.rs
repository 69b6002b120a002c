//! User Account Repository

use bson::doc;
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::domain::UserAccount;
use crate::error::Result;

pub struct UserRepository {
    collection: Collection<UserAccount>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    pub async fn insert(&self, user: &UserAccount) -> Result<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let email = email.trim().to_lowercase();
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let email = email.trim().to_lowercase();
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    pub async fn find_all(&self) -> Result<Vec<UserAccount>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, user: &UserAccount) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &user.id }, user)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
