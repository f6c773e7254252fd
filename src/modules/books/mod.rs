pub mod cache_keys;
pub mod handlers;
pub mod models;
mod openapi;
pub mod postgres;
pub mod repository;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_kernel::{InitCtx, Migration, Module};

pub use postgres::PgBookRepository;
pub use repository::BookRepository;
pub use service::{BookCatalog, CatalogError};

/// Books and their reviews
pub struct BooksModule {
    catalog: Arc<BookCatalog>,
}

impl BooksModule {
    pub fn new(catalog: Arc<BookCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            cache_available = self.catalog.cache().is_available(),
            list_ttl_secs = cache_keys::LIST_TTL.as_secs(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route("/{book_id}", get(handlers::get_book))
            .route(
                "/{book_id}/reviews",
                get(handlers::list_reviews).post(handlers::create_review),
            )
            .with_state(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::document())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id BIGSERIAL PRIMARY KEY,
                    title VARCHAR(255) NOT NULL,
                    author VARCHAR(255) NOT NULL,
                    isbn VARCHAR(13),
                    description TEXT,
                    published_year INTEGER,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ
                );
                CREATE UNIQUE INDEX IF NOT EXISTS ix_books_isbn ON books (isbn);
                CREATE INDEX IF NOT EXISTS ix_books_title ON books (title);

                CREATE TABLE IF NOT EXISTS reviews (
                    id BIGSERIAL PRIMARY KEY,
                    book_id BIGINT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
                    reviewer_name VARCHAR(255) NOT NULL,
                    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                    comment TEXT,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ
                );
                CREATE INDEX IF NOT EXISTS idx_reviews_book_id_created_at
                    ON reviews (book_id, created_at);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(catalog: Arc<BookCatalog>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}
