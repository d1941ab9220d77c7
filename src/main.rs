use salvo::{listener::TcpListener, Server};
use tracing_subscriber::EnvFilter;

use product_catalog::{
    config::env_var::{self, StorageKind},
    infra::{database::connection, router, Dependencies},
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let env = env_var::get();
    let deps = match &env.storage {
        StorageKind::Postgres(settings) => {
            let pool = connection::create_sqlx_pool(settings).await;
            connection::apply_schema(&pool)
                .await
                .expect("Expect to apply the database schema");
            tracing::info!(host = %settings.host, database = %settings.name, "using postgres storage");
            Dependencies::postgres(pool, &env.jwt)
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage, data is lost on shutdown");
            Dependencies::in_memory(&env.jwt)
        }
    };

    let address = format!("0.0.0.0:{}", env.port);
    tracing::info!("listening on {address}");
    let listener = TcpListener::bind(&address);
    Server::new(listener).serve(router::app(deps)).await;
}
