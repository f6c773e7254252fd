//! Persistence gateway for books and reviews.

use async_trait::async_trait;
use libris_db::DbError;

use super::models::{Book, CreateBook, CreateReview, PageWindow, Review};

/// Unique index guarding `books.isbn`.
pub const ISBN_CONSTRAINT: &str = "ix_books_isbn";

/// Source-of-truth access for the books module.
///
/// Writes are atomic: a failed call leaves no partial record behind.
/// Listings are ordered by id so pagination windows are stable.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list_books(&self, window: PageWindow) -> Result<Vec<Book>, DbError>;

    async fn get_book(&self, id: i64) -> Result<Option<Book>, DbError>;

    async fn create_book(&self, input: &CreateBook) -> Result<Book, DbError>;

    async fn list_reviews(&self, book_id: i64, window: PageWindow) -> Result<Vec<Review>, DbError>;

    async fn create_review(&self, book_id: i64, input: &CreateReview) -> Result<Review, DbError>;
}
