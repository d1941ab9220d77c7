use pretty_assertions::assert_eq;
use serial_test::serial;

use product_catalog::{
    domain::{
        datatype::timestamp_now,
        entity::{
            iam::User,
            product::{Product, ProductFilter, ProductKey, ProductUpdate},
            Entity,
        },
        repository::{ProductRepository, UserRepository},
        service::PasswordHashService,
    },
    error::persistence::PersistenceError,
    infra::{
        database::repository::{PgProductRepository, PgUserRepository},
        service::Argon2HashService,
    },
};

use crate::setup::setup_database;

mod setup;

fn product(email: &str, name: &str) -> Product {
    Product::new(
        ProductKey::new(timestamp_now(), email.into()),
        name.into(),
        Some("01234567890".into()),
        true,
    )
}

#[tokio::test]
#[serial]
async fn postgres_products_round_trip() {
    let pool = match setup_database().await {
        Some(pool) => pool,
        None => return,
    };
    let repo = PgProductRepository::new(pool);

    let lamp = product("maker@example.com", "Lamp");
    let desk = product("other@example.com", "Desk");
    repo.add_product(&lamp).await.unwrap();
    repo.add_product(&desk).await.unwrap();

    let stored = repo.get_product_by_key(lamp.key()).await.unwrap();
    assert_eq!(stored.as_ref(), Some(&lamp));

    assert!(matches!(
        repo.add_product(&lamp).await,
        Err(PersistenceError::Database(Some(code))) if code == "23505"
    ));

    let by_name = repo
        .get_filtered_products(&ProductFilter::by_name("Desk"))
        .await
        .unwrap();
    assert_eq!(by_name, vec![desk.clone()]);

    let by_email_and_availability = repo
        .get_filtered_products(&ProductFilter {
            is_available: Some(true),
            ..ProductFilter::by_manufacture_email("maker@example.com")
        })
        .await
        .unwrap();
    assert_eq!(by_email_and_availability, vec![lamp.clone()]);
    assert_eq!(repo.get_all_products().await.unwrap().len(), 2);

    let update = ProductUpdate {
        name: "Desk lamp".into(),
        is_available: false,
    };
    let updated = repo
        .update_product(lamp.clone(), &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name(), "Desk lamp");
    assert!(!updated.is_available());
    assert_eq!(
        repo.get_product_by_key(lamp.key()).await.unwrap(),
        Some(updated.clone())
    );

    assert!(repo.delete_product(&updated).await.unwrap());
    assert!(!repo.delete_product(&updated).await.unwrap());
    assert_eq!(repo.get_product_by_key(lamp.key()).await.unwrap(), None);
    assert_eq!(repo.update_product(updated, &update).await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn postgres_users_round_trip() {
    let pool = match setup_database().await {
        Some(pool) => pool,
        None => return,
    };
    let repo = PgUserRepository::new(pool);
    let hash = Argon2HashService::new().hash_password("secret").unwrap();

    let user = User::new(
        "user@example.com".into(),
        Some("01234567890".into()),
        Some("Jane".into()),
        hash.clone(),
    );
    repo.insert_user(&user).await.unwrap();

    assert_eq!(
        repo.find_user_by_id(user.ident()).await.unwrap(),
        Some(user.clone())
    );
    assert_eq!(
        repo.find_user_by_email("User@Example.com").await.unwrap(),
        Some(user.clone())
    );
    assert!(repo.email_exists("USER@example.com").await.unwrap());
    assert!(!repo.email_exists("nobody@example.com").await.unwrap());

    let shouting = User::new("USER@EXAMPLE.COM".into(), None, None, hash);
    assert!(matches!(
        repo.insert_user(&shouting).await,
        Err(PersistenceError::Database(Some(code))) if code == "23505"
    ));
}
