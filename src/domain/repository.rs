use async_trait::async_trait;
use uuid::Uuid;

use super::entity::{
    iam::User,
    product::{Product, ProductFilter, ProductKey, ProductUpdate},
};
use crate::error::persistence::PersistenceError;

/// Sole writer of the product table.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all_products(&self) -> Result<Vec<Product>, PersistenceError>;

    async fn get_product_by_key(&self, key: &ProductKey)
        -> Result<Option<Product>, PersistenceError>;

    async fn add_product(&self, product: &Product) -> Result<(), PersistenceError>;

    /// Persists the mutable fields of `update` over `existing`.
    ///
    /// Returns `None` when the row is gone by the time of the write.
    async fn update_product(
        &self,
        existing: Product,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, PersistenceError>;

    /// Returns whether a row was removed.
    async fn delete_product(&self, product: &Product) -> Result<bool, PersistenceError>;

    async fn get_filtered_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, PersistenceError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), PersistenceError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError>;

    async fn email_exists(&self, email: &str) -> Result<bool, PersistenceError>;
}
