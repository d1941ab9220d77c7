pub mod connection {
    use std::time::Duration;

    use sqlx::PgPool;

    use crate::{config::env_var::DatabaseSettings, error::persistence::PersistenceError};

    const SCHEMA: &str = include_str!("../../dbschema.sql");

    pub async fn create_sqlx_pool(settings: &DatabaseSettings) -> sqlx::PgPool {
        sqlx::postgres::PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .acquire_timeout(Duration::from_millis(1000))
            .idle_timeout(Duration::from_millis(1000 * 30))
            .max_lifetime(Duration::from_millis(1000 * 10))
            .connect(&settings.url)
            .await
            .expect("Expect to create a database pool with a open connection")
    }

    /// Creates the catalog schema when missing; every statement is idempotent.
    pub async fn apply_schema(pool: &PgPool) -> Result<(), PersistenceError> {
        let mut trx = pool.begin().await?;
        for sttm in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(sttm).execute(&mut trx).await?;
        }
        trx.commit().await?;
        Ok(())
    }
}

pub mod sql {
    use sqlx::{Postgres, QueryBuilder};

    use crate::domain::entity::product::ProductFilter;

    pub const PRODUCT_COLUMNS: &str =
        "produce_date, manufacture_email, name, manufacture_phone, is_available";

    pub const USER_COLUMNS: &str =
        "id, created, updated, version, email, phone_number, person_name, password_hash";

    pub fn push_product_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
        if filter.is_empty() {
            return;
        }

        qb.push(" WHERE ");
        let mut sep = qb.separated(" AND ");
        if let Some(name) = &filter.name {
            sep.push("name = ");
            sep.push_bind_unseparated(name.clone());
        }
        if let Some(email) = &filter.manufacture_email {
            sep.push("manufacture_email = ");
            sep.push_bind_unseparated(email.clone());
        }
        if let Some(available) = filter.is_available {
            sep.push("is_available = ");
            sep.push_bind_unseparated(available);
        }
    }

    #[cfg(test)]
    mod tests {
        use pretty_assertions::assert_eq;

        use super::*;

        fn render(filter: &ProductFilter) -> String {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM catalog.product");
            push_product_filter(&mut qb, filter);
            qb.sql().to_string()
        }

        #[test]
        fn empty_filter_has_no_where_clause() {
            assert_eq!(
                render(&ProductFilter::default()),
                "SELECT * FROM catalog.product"
            );
        }

        #[test]
        fn single_filter_binds_one_column() {
            assert_eq!(
                render(&ProductFilter::by_name("Lamp")),
                "SELECT * FROM catalog.product WHERE name = $1"
            );
            assert_eq!(
                render(&ProductFilter::by_manufacture_email("maker@example.com")),
                "SELECT * FROM catalog.product WHERE manufacture_email = $1"
            );
        }

        #[test]
        fn combined_filter_joins_with_and() {
            let filter = ProductFilter {
                name: Some("Lamp".into()),
                manufacture_email: Some("maker@example.com".into()),
                is_available: Some(true),
            };
            assert_eq!(
                render(&filter),
                "SELECT * FROM catalog.product WHERE name = $1 AND manufacture_email = $2 AND is_available = $3"
            );

            let filter = ProductFilter {
                is_available: Some(false),
                ..ProductFilter::by_manufacture_email("maker@example.com")
            };
            assert_eq!(
                render(&filter),
                "SELECT * FROM catalog.product WHERE manufacture_email = $1 AND is_available = $2"
            );
        }
    }
}

mod transform {
    use sqlx::{postgres::PgRow, Row};

    use crate::domain::{
        datatype::security::PasswordHash,
        entity::{
            iam::{User, UserState},
            product::{Product, ProductKey},
            EntityData,
        },
    };

    pub fn product(row: &PgRow) -> Result<Product, sqlx::Error> {
        Ok(Product::new(
            ProductKey::new(row.try_get("produce_date")?, row.try_get("manufacture_email")?),
            row.try_get("name")?,
            row.try_get("manufacture_phone")?,
            row.try_get("is_available")?,
        ))
    }

    pub fn user(row: &PgRow) -> Result<User, sqlx::Error> {
        let version: i64 = row.try_get("version")?;
        let password_hash: String = row.try_get("password_hash")?;
        let password_hash: PasswordHash = password_hash.parse().map_err(|err| sqlx::Error::ColumnDecode {
            index: "password_hash".into(),
            source: Box::new(err),
        })?;

        Ok(User::restore(
            EntityData::restore(
                row.try_get("id")?,
                row.try_get("created")?,
                row.try_get("updated")?,
                version as u32,
            ),
            UserState::new(
                row.try_get("email")?,
                row.try_get("phone_number")?,
                row.try_get("person_name")?,
                password_hash,
            ),
        ))
    }
}

pub mod repository {
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use sqlx::{PgPool, QueryBuilder};
    use uuid::Uuid;

    use super::{sql, transform};
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

    pub struct PgProductRepository {
        pool: PgPool,
    }

    impl PgProductRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl ProductRepository for PgProductRepository {
        async fn get_all_products(&self) -> Result<Vec<Product>, PersistenceError> {
            self.get_filtered_products(&ProductFilter::default()).await
        }

        async fn get_product_by_key(
            &self,
            key: &ProductKey,
        ) -> Result<Option<Product>, PersistenceError> {
            let row = sqlx::query(&format!(
                "SELECT {} FROM catalog.product WHERE manufacture_email = $1 AND produce_date = $2",
                sql::PRODUCT_COLUMNS
            ))
            .bind(&key.manufacture_email)
            .bind(key.produce_date)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(transform::product).transpose()?)
        }

        async fn add_product(&self, product: &Product) -> Result<(), PersistenceError> {
            sqlx::query(concat!(
                "INSERT INTO catalog.product ",
                "(produce_date, manufacture_email, name, manufacture_phone, is_available) ",
                "VALUES ($1, $2, $3, $4, $5)",
            ))
            .bind(product.produce_date())
            .bind(product.manufacture_email())
            .bind(product.name())
            .bind(product.manufacture_phone())
            .bind(product.is_available())
            .execute(&self.pool)
            .await?;

            Ok(())
        }

        async fn update_product(
            &self,
            existing: Product,
            update: &ProductUpdate,
        ) -> Result<Option<Product>, PersistenceError> {
            let result = sqlx::query(concat!(
                "UPDATE catalog.product SET name = $1, is_available = $2 ",
                "WHERE manufacture_email = $3 AND produce_date = $4",
            ))
            .bind(&update.name)
            .bind(update.is_available)
            .bind(existing.manufacture_email())
            .bind(existing.produce_date())
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }

            Ok(Some(existing.with_update(update)))
        }

        async fn delete_product(&self, product: &Product) -> Result<bool, PersistenceError> {
            let result = sqlx::query(
                "DELETE FROM catalog.product WHERE manufacture_email = $1 AND produce_date = $2",
            )
            .bind(product.manufacture_email())
            .bind(product.produce_date())
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected() > 0)
        }

        async fn get_filtered_products(
            &self,
            filter: &ProductFilter,
        ) -> Result<Vec<Product>, PersistenceError> {
            let mut qb = QueryBuilder::new(format!(
                "SELECT {} FROM catalog.product",
                sql::PRODUCT_COLUMNS
            ));
            sql::push_product_filter(&mut qb, filter);
            qb.push(" ORDER BY produce_date");

            let mut rows = qb.build().fetch(&self.pool);

            let mut products = Vec::new();
            while let Some(row) = rows.try_next().await? {
                products.push(transform::product(&row)?);
            }

            Ok(products)
        }
    }

    pub struct PgUserRepository {
        pool: PgPool,
    }

    impl PgUserRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl UserRepository for PgUserRepository {
        async fn insert_user(&self, user: &User) -> Result<(), PersistenceError> {
            sqlx::query(concat!(
                "INSERT INTO catalog.app_user ",
                "(id, created, updated, version, email, phone_number, person_name, password_hash) ",
                "VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            ))
            .bind(user.ident())
            .bind(user.created())
            .bind(user.updated())
            .bind(user.version() as i64)
            .bind(user.email())
            .bind(user.phone_number())
            .bind(user.person_name())
            .bind(user.password_hash().as_str())
            .execute(&self.pool)
            .await?;

            Ok(())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
            let row = sqlx::query(&format!(
                "SELECT {} FROM catalog.app_user WHERE id = $1",
                sql::USER_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(transform::user).transpose()?)
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
            let row = sqlx::query(&format!(
                "SELECT {} FROM catalog.app_user WHERE lower(email) = lower($1)",
                sql::USER_COLUMNS
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.as_ref().map(transform::user).transpose()?)
        }

        async fn email_exists(&self, email: &str) -> Result<bool, PersistenceError> {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM catalog.app_user WHERE lower(email) = lower($1))",
            )
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

            Ok(exists)
        }
    }
}
