use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::env_var::JwtSettings,
    domain::repository::{ProductRepository, UserRepository},
};

use self::{
    database::repository::{PgProductRepository, PgUserRepository},
    memory::{InMemoryProductRepository, InMemoryUserRepository},
    service::{Argon2HashService, JWTEncryptionService},
};

pub mod controller;
pub mod database;
pub mod memory;
pub mod service;

/// Shared state handed to every controller.
#[derive(Clone)]
pub struct Dependencies {
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub hash_service: Arc<Argon2HashService>,
    pub token_service: Arc<JWTEncryptionService>,
}

impl Dependencies {
    pub fn postgres(pool: PgPool, jwt: &JwtSettings) -> Self {
        Self {
            products: Arc::new(PgProductRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            hash_service: Arc::new(Argon2HashService::new()),
            token_service: Arc::new(JWTEncryptionService::new(jwt)),
        }
    }

    pub fn in_memory(jwt: &JwtSettings) -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            hash_service: Arc::new(Argon2HashService::new()),
            token_service: Arc::new(JWTEncryptionService::new(jwt)),
        }
    }
}

pub mod router {
    use salvo::{logging::Logger, Router};

    use super::{controller::*, Dependencies};

    pub fn app(deps: Dependencies) -> Router {
        Router::new()
            .get(home)
            .push(
                Router::with_path("api")
                    .push(
                        Router::with_path("Products")
                            .get(ListProductsController::new(deps.clone())),
                    )
                    .push(
                        Router::with_path("Product")
                            .get(GetProductController::new(deps.clone()))
                            .post(CreateProductController::new(deps.clone()))
                            .put(UpdateProductController::new(deps.clone()))
                            .delete(DeleteProductController::new(deps.clone())),
                    )
                    .push(
                        Router::with_path("Account")
                            .push(
                                Router::with_path("register")
                                    .post(RegisterUserController::new(deps.clone())),
                            )
                            .push(
                                Router::with_path("login")
                                    .post(AuthenticateUserController::new(deps)),
                            ),
                    ),
            )
            .hoop(Logger)
    }
}
