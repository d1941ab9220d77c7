//! Process-local stores, used when no database is configured and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{
        entity::{
            iam::User,
            product::{Product, ProductFilter, ProductKey, ProductUpdate},
            Entity,
        },
        repository::{ProductRepository, UserRepository},
    },
    error::persistence::PersistenceError,
};

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_all_products(&self) -> Result<Vec<Product>, PersistenceError> {
        Ok(self.products.read().await.clone())
    }

    async fn get_product_by_key(
        &self,
        key: &ProductKey,
    ) -> Result<Option<Product>, PersistenceError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.key() == key).cloned())
    }

    async fn add_product(&self, product: &Product) -> Result<(), PersistenceError> {
        let mut products = self.products.write().await;
        if products.iter().any(|stored| stored.key() == product.key()) {
            return Err(PersistenceError::Database(Some("23505".into())));
        }
        products.push(product.clone());
        Ok(())
    }

    async fn update_product(
        &self,
        existing: Product,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, PersistenceError> {
        let mut products = self.products.write().await;
        let stored = match products
            .iter_mut()
            .find(|product| product.key() == existing.key())
        {
            Some(stored) => stored,
            None => return Ok(None),
        };

        *stored = existing.with_update(update);
        Ok(Some(stored.clone()))
    }

    async fn delete_product(&self, product: &Product) -> Result<bool, PersistenceError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|stored| stored.key() != product.key());
        Ok(products.len() < before)
    }

    async fn get_filtered_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, PersistenceError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert_user(&self, user: &User) -> Result<(), PersistenceError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|stored| stored.email().eq_ignore_ascii_case(user.email()))
        {
            return Err(PersistenceError::Database(Some("23505".into())));
        }
        users.insert(user.ident(), user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, PersistenceError> {
        Ok(self.find_user_by_email(email).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::datatype::timestamp_now;

    fn lamp() -> Product {
        Product::new(
            ProductKey::new(timestamp_now(), "maker@example.com".into()),
            "Lamp".into(),
            None,
            true,
        )
    }

    #[tokio::test]
    async fn update_of_a_removed_product_is_none() {
        let repo = InMemoryProductRepository::new();
        let product = lamp();
        repo.add_product(&product).await.unwrap();
        assert!(repo.delete_product(&product).await.unwrap());

        let update = ProductUpdate {
            name: "Desk lamp".into(),
            is_available: false,
        };
        assert_eq!(repo.update_product(product, &update).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_keys_are_rejected() {
        let repo = InMemoryProductRepository::new();
        let product = lamp();
        repo.add_product(&product).await.unwrap();

        assert!(matches!(
            repo.add_product(&product).await,
            Err(PersistenceError::Database(Some(code))) if code == "23505"
        ));
        assert_eq!(repo.get_all_products().await.unwrap(), vec![product]);
    }
}
