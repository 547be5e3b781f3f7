use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use data::post_repository::PostRepository;
use data::profile_repository::ProfileRepository;
use data::repositories::memory::{InMemoryPostRepository, InMemoryProfileRepository};
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::profile_repository::PostgresProfileRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::{Settings, StorageBackend};
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level, settings.log_format)?;

    let (posts, profiles) = build_repositories(&settings).await?;
    let post_service = PostService::new(posts, profiles, settings.require_profile);
    let state = AppState::new(
        Arc::new(post_service),
        Arc::new(JwtService::new(&settings.jwt_secret)),
    );

    server::run_http(&settings, state).await
}

async fn build_repositories(
    settings: &Settings,
) -> Result<(Arc<dyn PostRepository>, Arc<dyn ProfileRepository>)> {
    match settings.storage_backend {
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = create_pool(database_url, settings.database_max_connections).await?;
            run_migrations(&pool).await?;
            info!("using postgres storage");
            Ok((
                Arc::new(PostgresPostRepository::new(pool.clone())),
                Arc::new(PostgresProfileRepository::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage, data is lost on restart");
            Ok((
                Arc::new(InMemoryPostRepository::new()),
                Arc::new(InMemoryProfileRepository::new()),
            ))
        }
    }
}
