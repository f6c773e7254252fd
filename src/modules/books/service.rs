//! Cache-aside orchestration for the books module.
//!
//! Book listings are read through the cache: a hit is returned as-is, a miss
//! or any cache failure loads the window from the database and writes it back
//! with the list TTL. Creating a book deletes the fixed set of first-page
//! windows from [`cache_keys::INVALIDATED_WINDOWS`]. Cache trouble is logged
//! and never changes a response. Reviews are not cached.

use std::sync::Arc;

use libris_cache::{CacheClient, CacheError, CacheLookup};
use libris_db::DbError;
use thiserror::Error;

use super::cache_keys;
use super::models::{Book, CreateBook, CreateReview, FieldViolation, PageWindow, Review};
use super::repository::{BookRepository, ISBN_CONSTRAINT};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid input")]
    Invalid(Vec<FieldViolation>),
    #[error("Book not found")]
    BookNotFound(i64),
    #[error("A book with this ISBN already exists")]
    DuplicateIsbn,
    #[error("A book with these details already exists")]
    DuplicateBook,
    #[error("failed to {operation}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: DbError,
    },
}

impl CatalogError {
    fn persistence(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Persistence { operation, source }
    }
}

/// Books and reviews over a [`BookRepository`] with a cache in front of book listings.
pub struct BookCatalog {
    repo: Arc<dyn BookRepository>,
    cache: CacheClient,
}

impl BookCatalog {
    pub fn new(repo: Arc<dyn BookRepository>, cache: CacheClient) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &CacheClient {
        &self.cache
    }

    /// One window of books, served from cache when possible.
    pub async fn list_books(&self, window: PageWindow) -> Result<Vec<Book>, CatalogError> {
        let key = cache_keys::list_key(window);

        match self.cache.get::<Vec<Book>>(&key).await {
            CacheLookup::Hit(books) => {
                tracing::info!(%key, count = books.len(), "returning books from cache");
                return Ok(books);
            }
            CacheLookup::Miss => {
                tracing::info!(%key, "cache miss, fetching books from database");
            }
            CacheLookup::Failed(error) => {
                tracing::info!(%key, %error, "cache unusable, fetching books from database");
            }
        }

        let books = self
            .repo
            .list_books(window)
            .await
            .map_err(CatalogError::persistence("list books"))?;

        match self.cache.set(&key, &books, cache_keys::LIST_TTL).await {
            Ok(()) => tracing::info!(%key, count = books.len(), "cached books window"),
            Err(CacheError::Unavailable) => {}
            Err(error) => tracing::warn!(%key, %error, "failed to cache books window"),
        }

        Ok(books)
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, CatalogError> {
        self.repo
            .get_book(id)
            .await
            .map_err(CatalogError::persistence("load book"))?
            .ok_or(CatalogError::BookNotFound(id))
    }

    /// Persist a new book, then drop the commonly requested list windows.
    pub async fn create_book(&self, input: &CreateBook) -> Result<Book, CatalogError> {
        input.validate().map_err(CatalogError::Invalid)?;

        let book = self.repo.create_book(input).await.map_err(|err| match err {
            DbError::Duplicate { constraint } if constraint == ISBN_CONSTRAINT => {
                CatalogError::DuplicateIsbn
            }
            DbError::Duplicate { .. } => CatalogError::DuplicateBook,
            source => CatalogError::Persistence {
                operation: "create book",
                source,
            },
        })?;
        tracing::info!(book_id = book.id, "created book");

        let failed = self.invalidate_lists().await;
        if failed > 0 {
            tracing::warn!(book_id = book.id, failed, "cache invalidation incomplete after book creation");
        }

        Ok(book)
    }

    /// Delete every key in the invalidation policy; returns how many deletions failed.
    ///
    /// A cache that never came up has nothing to invalidate.
    async fn invalidate_lists(&self) -> usize {
        if !self.cache.is_available() {
            return 0;
        }

        let mut failed = 0;
        for key in cache_keys::invalidation_keys() {
            if let Err(error) = self.cache.delete(&key).await {
                tracing::warn!(%key, %error, "cache invalidation failed");
                failed += 1;
            }
        }
        failed
    }

    pub async fn list_reviews(
        &self,
        book_id: i64,
        window: PageWindow,
    ) -> Result<Vec<Review>, CatalogError> {
        self.get_book(book_id).await?;

        self.repo
            .list_reviews(book_id, window)
            .await
            .map_err(CatalogError::persistence("list reviews"))
    }

    pub async fn create_review(
        &self,
        book_id: i64,
        input: &CreateReview,
    ) -> Result<Review, CatalogError> {
        input.validate().map_err(CatalogError::Invalid)?;
        self.get_book(book_id).await?;

        let review = self
            .repo
            .create_review(book_id, input)
            .await
            .map_err(|err| match err {
                // The book went away between the lookup and the insert.
                DbError::ForeignKey { .. } => CatalogError::BookNotFound(book_id),
                source => CatalogError::Persistence {
                    operation: "create review",
                    source,
                },
            })?;
        tracing::info!(book_id, review_id = review.id, "created review");

        Ok(review)
    }
}
