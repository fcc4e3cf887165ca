use std::sync::Arc;

use actix_web::HttpServer;
use anyhow::Context;

use bookstore_catalog::app_config::build_app;
use bookstore_catalog::app_settings::Settings;
use bookstore_catalog::books_repository::{
    BookRepository, InMemoryBookRepository, MongoBooksRepository,
};
use bookstore_catalog::static_files::StaticAssets;
use bookstore_catalog::telemetry::{init_telemetry, shutdown_telemetry};

async fn init_books_repository(settings: &Settings) -> anyhow::Result<Arc<dyn BookRepository>> {
    if settings.use_in_memory_db {
        tracing::info!("Using in-memory books repository");
        return Ok(Arc::new(InMemoryBookRepository::default()));
    }

    tracing::info!(
        host = %settings.mongo_host,
        port = settings.mongo_port,
        database = %settings.mongo_db,
        "Using MongoDB books repository"
    );
    let repository = MongoBooksRepository::init(settings.mongo_config())
        .await
        .context("Failed to init MongoDB repository")?;

    // Requests keep failing with 500 until the store is reachable, the server starts anyway
    match repository.ping().await {
        Ok(()) => tracing::info!("Successfully connected to MongoDB"),
        Err(err) => tracing::error!("Failed to connect to MongoDB: {}", err),
    }
    Ok(Arc::new(repository))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    init_telemetry(settings.jaeger_enabled)?;

    let books_repository = init_books_repository(&settings).await?;
    let static_assets = StaticAssets::new(&settings.static_dir);

    tracing::info!("starting HTTP server at http://0.0.0.0:8080");
    HttpServer::new(move || build_app(books_repository.clone(), static_assets.clone()))
        .bind(("0.0.0.0", 8080))?
        .run()
        .await?;

    shutdown_telemetry();
    Ok(())
}
